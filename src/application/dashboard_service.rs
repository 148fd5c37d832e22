// Dashboard service - Runs panel pipelines and publishes them through their adapters
use crate::application::color_scale::ColorScale;
use crate::application::coords::CountryCoords;
use crate::application::panel_adapter::PanelBoard;
use crate::application::panels;
use crate::application::parser::parse_csv;
use crate::application::source_loader::SourceLoader;
use crate::domain::error::{FetchError, PipelineError};
use crate::domain::panel::{PanelData, PanelId, PanelQuery, PanelSnapshot};
use crate::infrastructure::config::{prepare_uri, PanelsConfig, SourcesConfig};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    loader: Arc<dyn SourceLoader>,
    sources: Arc<SourcesConfig>,
    panels: Arc<PanelsConfig>,
    board: Arc<PanelBoard>,
}

impl DashboardService {
    pub fn new(loader: Arc<dyn SourceLoader>, sources: SourcesConfig, panels: PanelsConfig) -> Self {
        Self {
            loader,
            sources: Arc::new(sources),
            panels: Arc::new(panels),
            board: Arc::new(PanelBoard::new()),
        }
    }

    /// Start a new invocation of a panel's pipeline and wait for it to settle.
    ///
    /// The load runs on its own task, so the panel settles even when the
    /// caller stops waiting. The returned snapshot is the panel's current
    /// state, which belongs to the most recent request even if this one was
    /// superseded while loading.
    pub async fn refresh(&self, panel: PanelId, query: PanelQuery) -> PanelSnapshot {
        let ticket = self.board.adapter(panel).begin(query.clone()).await;
        tracing::info!("Refreshing panel {:?} (ticket {}) with {:?}", panel, ticket.seq(), query);

        let service = self.clone();
        let task = tokio::spawn(async move {
            let result = service.load(panel, &query).await;
            service.board.adapter(panel).complete(ticket, result).await;
        });
        if let Err(e) = task.await {
            tracing::error!("Load task for panel {:?} (ticket {}) failed: {}", panel, ticket.seq(), e);
        }

        self.snapshot(panel).await
    }

    pub async fn snapshot(&self, panel: PanelId) -> PanelSnapshot {
        self.board.adapter(panel).snapshot().await
    }

    /// Run one pipeline end to end without touching adapter state.
    pub async fn load(&self, panel: PanelId, query: &PanelQuery) -> Result<PanelData, PipelineError> {
        let year = self.effective_year(panel, query);
        let mut vars = HashMap::new();
        if let Some(year) = &year {
            vars.insert("year".to_string(), year.clone());
        }
        if let Some(region) = query.region() {
            vars.insert("region".to_string(), region.to_string());
        }
        let year = year.unwrap_or_default();
        let config = &self.panels;

        let data = match panel {
            PanelId::Emissions => {
                let csv = self.fetch(&self.sources.owid_co2, &vars).await?;
                PanelData::Series(panels::emissions_by_country(&csv, &year, &config.target_countries))
            }
            PanelId::TopEmitters => {
                let csv = self.fetch(&self.sources.owid_co2, &vars).await?;
                PanelData::Series(panels::top_emitters(
                    &csv,
                    &year,
                    &config.top_emitter_countries,
                    config.top_n,
                ))
            }
            PanelId::EnergyTotals => {
                let (renewable, non_renewable) = futures::try_join!(
                    self.fetch(&self.sources.renewable, &vars),
                    self.fetch(&self.sources.non_renewable, &vars),
                )?;
                PanelData::Series(panels::energy_totals(&renewable, &non_renewable))
            }
            PanelId::EnergyByMode => {
                let (renewable, non_renewable) = futures::try_join!(
                    self.fetch(&self.sources.renewable, &vars),
                    self.fetch(&self.sources.non_renewable, &vars),
                )?;
                PanelData::Series(panels::energy_by_mode(&renewable, &non_renewable))
            }
            PanelId::Co2Map => {
                let (shapes, csv) = futures::try_join!(
                    self.fetch(&self.sources.country_shapes, &vars),
                    self.fetch(&self.sources.iso_co2, &vars),
                )?;
                PanelData::Map(panels::co2_map(&shapes, &csv, &year)?)
            }
            PanelId::EmissionMarkers => {
                let (emissions, coords_csv) = futures::try_join!(
                    self.fetch(&self.sources.country_emissions, &vars),
                    self.fetch(&self.sources.country_coords, &vars),
                )?;
                let coords = CountryCoords::from_records(&parse_csv(&coords_csv));
                tracing::debug!("Built coordinate lookup with {} countries", coords.len());
                PanelData::Markers(panels::emission_markers(
                    &emissions,
                    &coords,
                    &year,
                    config.marker_window,
                    self.color_scale(),
                ))
            }
            PanelId::Disasters => {
                let csv = self.fetch(&self.sources.disasters, &vars).await?;
                PanelData::Table(panels::disaster_table(
                    &csv,
                    query.year(),
                    query.region(),
                    config.report_rows,
                ))
            }
            PanelId::PcaProjection => {
                let json = self.fetch(&self.sources.pca, &vars).await?;
                PanelData::Series(panels::pca_projection(&json)?)
            }
            PanelId::WorldTrend => {
                let csv = self.fetch(&self.sources.owid_co2, &vars).await?;
                PanelData::Series(panels::world_trend(&csv, config.world_trend_years))
            }
        };

        Ok(data)
    }

    fn effective_year(&self, panel: PanelId, query: &PanelQuery) -> Option<String> {
        let fallback = match panel {
            PanelId::Emissions | PanelId::TopEmitters => &self.panels.default_year,
            PanelId::Co2Map => &self.panels.map_year,
            PanelId::EmissionMarkers => &self.panels.marker_year,
            _ => return query.year().map(str::to_string),
        };
        Some(query.year().unwrap_or(fallback).to_string())
    }

    fn color_scale(&self) -> &ColorScale {
        &self.panels.color_scale
    }

    async fn fetch(&self, uri: &str, vars: &HashMap<String, String>) -> Result<String, FetchError> {
        let uri = prepare_uri(uri, vars);
        tracing::debug!("Loading source {}", uri);
        self.loader.load(&uri).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::panel::PanelState;
    use crate::domain::series::SeriesPoint;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory loader with optional per-URI latency.
    #[derive(Default)]
    pub(crate) struct StaticLoader {
        payloads: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        pub(crate) calls: AtomicUsize,
    }

    impl StaticLoader {
        pub(crate) fn with(mut self, uri: &str, body: &str) -> Self {
            self.payloads.insert(uri.to_string(), body.to_string());
            self
        }

        pub(crate) fn delayed(mut self, uri: &str, delay: Duration) -> Self {
            self.delays.insert(uri.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl SourceLoader for StaticLoader {
        async fn load(&self, uri: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(uri) {
                tokio::time::sleep(*delay).await;
            }
            self.payloads.get(uri).cloned().ok_or_else(|| FetchError::Status {
                uri: uri.to_string(),
                status: 404,
            })
        }
    }

    pub(crate) const OWID: &str = "\
country,year,co2
China,2019,10000
China,2021,11000
India,2021,2800
World,2021,35000
";

    pub(crate) fn test_sources() -> SourcesConfig {
        SourcesConfig {
            owid_co2: "owid.csv".to_string(),
            renewable: "1.csv".to_string(),
            non_renewable: "2.csv".to_string(),
            country_shapes: "countries.geojson".to_string(),
            iso_co2: "co2.csv".to_string(),
            country_coords: "country_coords.csv".to_string(),
            country_emissions: "co2_emissions.csv".to_string(),
            disasters: "disasters.csv".to_string(),
            pca: "pca_result.json".to_string(),
        }
    }

    fn service(loader: StaticLoader) -> (DashboardService, Arc<StaticLoader>) {
        let loader = Arc::new(loader);
        let service = DashboardService::new(loader.clone(), test_sources(), PanelsConfig::default());
        (service, loader)
    }

    fn year(y: &str) -> PanelQuery {
        PanelQuery {
            year: Some(y.to_string()),
            region: None,
        }
    }

    fn series(snapshot: &PanelSnapshot) -> Vec<SeriesPoint> {
        match snapshot.state.data() {
            Some(PanelData::Series(series)) => series.points.clone(),
            other => panic!("expected series, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_emissions() {
        let (service, _) = service(StaticLoader::default().with("owid.csv", OWID));

        let snapshot = service.refresh(PanelId::Emissions, year("2021")).await;
        assert_eq!(
            series(&snapshot),
            vec![
                SeriesPoint::new("China", vec![11000.0]),
                SeriesPoint::new("India", vec![2800.0]),
            ]
        );
    }

    #[tokio::test]
    async fn test_default_year_applies() {
        let (service, _) = service(StaticLoader::default().with("owid.csv", OWID));
        let snapshot = service.refresh(PanelId::Emissions, PanelQuery::default()).await;
        assert_eq!(series(&snapshot).len(), 2);
    }

    #[tokio::test]
    async fn test_every_refresh_fetches_again() {
        let (service, loader) = service(StaticLoader::default().with("owid.csv", OWID));
        service.refresh(PanelId::WorldTrend, PanelQuery::default()).await;
        service.refresh(PanelId::WorldTrend, PanelQuery::default()).await;
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error() {
        let (service, _) = service(StaticLoader::default().with("1.csv", "Mode of Generation,Contribution (TWh)\n"));

        let snapshot = service.refresh(PanelId::EnergyTotals, PanelQuery::default()).await;
        match snapshot.state {
            PanelState::Error { message, .. } => assert_eq!(message, "request to 2.csv returned status 404"),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_sets_error() {
        let (service, _) = service(StaticLoader::default().with("pca_result.json", "<html>oops</html>"));
        let snapshot = service.refresh(PanelId::PcaProjection, PanelQuery::default()).await;
        assert!(matches!(snapshot.state, PanelState::Error { .. }));
    }

    #[tokio::test]
    async fn test_empty_result_is_ready() {
        let (service, _) = service(StaticLoader::default().with("owid.csv", OWID));
        let snapshot = service.refresh(PanelId::Emissions, year("1850")).await;
        assert!(series(&snapshot).is_empty());
    }

    #[tokio::test]
    async fn test_year_placeholder_in_source() {
        let loader = Arc::new(StaticLoader::default().with("owid-2021.csv", OWID));
        let mut sources = test_sources();
        sources.owid_co2 = "owid-${year}.csv".to_string();
        let service = DashboardService::new(loader, sources, PanelsConfig::default());

        let snapshot = service.refresh(PanelId::TopEmitters, year("2021")).await;
        assert_eq!(series(&snapshot)[0].key, "China");
    }

    #[tokio::test]
    async fn test_slow_earlier_request_does_not_overwrite_newer() {
        let loader = Arc::new(
            StaticLoader::default()
                .with("owid-2019.csv", OWID)
                .with("owid-2021.csv", OWID)
                .delayed("owid-2019.csv", Duration::from_millis(200)),
        );
        let mut sources = test_sources();
        sources.owid_co2 = "owid-${year}.csv".to_string();
        let service = DashboardService::new(loader, sources, PanelsConfig::default());

        let (_, _) = tokio::join!(
            service.refresh(PanelId::Emissions, year("2019")),
            service.refresh(PanelId::Emissions, year("2021")),
        );

        let snapshot = service.snapshot(PanelId::Emissions).await;
        assert_eq!(snapshot.request, Some(year("2021")));
        assert_eq!(snapshot.seq, 2);
        assert_eq!(series(&snapshot)[0].values, vec![11000.0]);
    }

    #[tokio::test]
    async fn test_abandoned_refresh_still_settles() {
        let (service, _) = service(
            StaticLoader::default()
                .with("owid.csv", OWID)
                .delayed("owid.csv", Duration::from_millis(100)),
        );

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            service.refresh(PanelId::Emissions, year("2021")),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(service.snapshot(PanelId::Emissions).await.state, PanelState::Loading);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let snapshot = service.snapshot(PanelId::Emissions).await;
        assert_eq!(series(&snapshot)[0], SeriesPoint::new("China", vec![11000.0]));
    }

    #[tokio::test]
    async fn test_markers_use_coordinate_lookup() {
        let (service, _) = service(
            StaticLoader::default()
                .with(
                    "co2_emissions.csv",
                    "Country,Year,CO2 emission (Tons)\nChina,2020,10500000000\nChad,2020,1000\n",
                )
                .with("country_coords.csv", "Country,Latitude,Longitude\nChina,35.86,104.19\n"),
        );

        let snapshot = service.refresh(PanelId::EmissionMarkers, PanelQuery::default()).await;
        match snapshot.state.data() {
            Some(PanelData::Markers(markers)) => {
                assert_eq!(markers.len(), 1);
                assert_eq!(markers[0].country, "China");
            }
            other => panic!("expected markers, got {:?}", other),
        }
    }
}
