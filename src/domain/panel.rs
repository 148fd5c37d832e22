// Panel domain models: identities, payloads and presentation state
use super::geo::FeatureCollection;
use super::series::{Series, Table};
use serde::{Deserialize, Serialize};

/// Every chart/map panel the dashboard serves. Each owns one pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelId {
    Emissions,
    TopEmitters,
    EnergyTotals,
    EnergyByMode,
    Co2Map,
    EmissionMarkers,
    Disasters,
    PcaProjection,
    WorldTrend,
}

impl PanelId {
    pub const COUNT: usize = 9;

    pub const ALL: [PanelId; Self::COUNT] = [
        PanelId::Emissions,
        PanelId::TopEmitters,
        PanelId::EnergyTotals,
        PanelId::EnergyByMode,
        PanelId::Co2Map,
        PanelId::EmissionMarkers,
        PanelId::Disasters,
        PanelId::PcaProjection,
        PanelId::WorldTrend,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            PanelId::Emissions => "CO2 Emissions by Country",
            PanelId::TopEmitters => "Global CO2 Emitters",
            PanelId::EnergyTotals => "Total Renewable vs Non-Renewable Energy (TWh)",
            PanelId::EnergyByMode => "Energy by Mode of Generation (TWh)",
            PanelId::Co2Map => "CO2 Emissions Map",
            PanelId::EmissionMarkers => "CO2 Emission Markers",
            PanelId::Disasters => "Plotted Disaster Locations",
            PanelId::PcaProjection => "Energy Mix PCA Projection",
            PanelId::WorldTrend => "World CO2 Trend",
        }
    }
}

/// Filter parameters of one pipeline invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelQuery {
    pub year: Option<String>,
    pub region: Option<String>,
}

impl PanelQuery {
    pub fn year(&self) -> Option<&str> {
        specific(self.year.as_deref())
    }

    pub fn region(&self) -> Option<&str> {
        specific(self.region.as_deref())
    }
}

// "All" and blank mean no filter
fn specific(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// A country marker placed on the emissions map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub country: String,
    pub year: String,
    pub co2: f64,
    pub lat: f64,
    pub lng: f64,
    pub color: String,
}

/// Final output of a panel pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PanelData {
    Series(Series),
    Map(FeatureCollection),
    Markers(Vec<Marker>),
    Table(Table),
}

/// Presentation state. Exactly one status holds at a time, and `Ready` always
/// carries its data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelState {
    Idle,
    Loading,
    Ready { data: PanelData, updated_ms: i64 },
    Error { message: String, updated_ms: i64 },
}

impl PanelState {
    pub fn data(&self) -> Option<&PanelData> {
        match self {
            PanelState::Ready { data, .. } => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub panel: PanelId,
    pub seq: u64,
    pub request: Option<PanelQuery>,
    #[serde(flatten)]
    pub state: PanelState,
}
