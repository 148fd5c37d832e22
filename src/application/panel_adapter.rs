// Presentation adapter: per-panel status, data and stale-result guard
use crate::domain::error::PipelineError;
use crate::domain::panel::{PanelData, PanelId, PanelQuery, PanelSnapshot, PanelState};
use tokio::sync::RwLock;

/// Issued when an invocation starts. Only the latest ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
struct Slot {
    seq: u64,
    request: Option<PanelQuery>,
    state: PanelState,
}

/// Holds what the rendering layer shows for one panel.
///
/// State moves `Idle -> Loading -> Ready | Error`, and back to `Loading` only
/// when a new invocation calls [`PanelAdapter::begin`].
#[derive(Debug)]
pub struct PanelAdapter {
    panel: PanelId,
    slot: RwLock<Slot>,
}

impl PanelAdapter {
    pub fn new(panel: PanelId) -> Self {
        Self {
            panel,
            slot: RwLock::new(Slot {
                seq: 0,
                request: None,
                state: PanelState::Idle,
            }),
        }
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    /// Start a new invocation. Any data from earlier requests is hidden.
    pub async fn begin(&self, request: PanelQuery) -> LoadTicket {
        let mut slot = self.slot.write().await;
        slot.seq += 1;
        slot.request = Some(request);
        slot.state = PanelState::Loading;
        LoadTicket { seq: slot.seq }
    }

    /// Publish an invocation's outcome. Returns `false` when a newer
    /// invocation has started since `ticket` was issued; the result is dropped.
    pub async fn complete(&self, ticket: LoadTicket, result: Result<PanelData, PipelineError>) -> bool {
        let mut slot = self.slot.write().await;
        if slot.seq != ticket.seq {
            tracing::warn!(
                "Discarding stale result for panel {:?} (ticket {}, latest {})",
                self.panel,
                ticket.seq,
                slot.seq
            );
            return false;
        }

        let updated_ms = chrono::Utc::now().timestamp_millis();
        slot.state = match result {
            Ok(data) => PanelState::Ready { data, updated_ms },
            Err(e) => {
                tracing::error!("Panel {:?} failed to load: {}", self.panel, e);
                PanelState::Error {
                    message: e.to_string(),
                    updated_ms,
                }
            }
        };
        true
    }

    /// Pull-based accessor: the current state, read on demand.
    pub async fn snapshot(&self) -> PanelSnapshot {
        let slot = self.slot.read().await;
        PanelSnapshot {
            panel: self.panel,
            seq: slot.seq,
            request: slot.request.clone(),
            state: slot.state.clone(),
        }
    }
}

/// One adapter per panel, indexed by [`PanelId::index`].
#[derive(Debug)]
pub struct PanelBoard {
    adapters: [PanelAdapter; PanelId::COUNT],
}

impl PanelBoard {
    pub fn new() -> Self {
        Self {
            adapters: PanelId::ALL.map(PanelAdapter::new),
        }
    }

    pub fn adapter(&self, panel: PanelId) -> &PanelAdapter {
        &self.adapters[panel.index()]
    }
}

impl Default for PanelBoard {
    fn default() -> Self {
        Self::new()
    }
}
