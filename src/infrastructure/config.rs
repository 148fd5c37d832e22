use crate::application::color_scale::ColorScale;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub loader: LoaderSettings,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub panels: PanelsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoaderSettings {
    /// Root directory for sources that are not http(s) URLs.
    pub static_dir: String,
    pub timeout_secs: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            static_dir: "data".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Where each dataset lives. Values may contain `${year}` placeholders.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    pub owid_co2: String,
    pub renewable: String,
    pub non_renewable: String,
    pub country_shapes: String,
    pub iso_co2: String,
    pub country_coords: String,
    pub country_emissions: String,
    pub disasters: String,
    pub pca: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            owid_co2: "https://raw.githubusercontent.com/owid/co2-data/master/owid-co2-data.csv".to_string(),
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
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PanelsConfig {
    pub default_year: String,
    pub target_countries: Vec<String>,
    pub top_emitter_countries: Vec<String>,
    pub top_n: usize,
    pub map_year: String,
    pub marker_year: String,
    pub marker_window: (i32, i32),
    pub world_trend_years: usize,
    pub report_rows: usize,
    pub color_scale: ColorScale,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            default_year: "2021".to_string(),
            target_countries: names(&["China", "United States", "India", "Russia", "Japan"]),
            top_emitter_countries: names(&[
                "China",
                "United States",
                "India",
                "Russia",
                "Japan",
                "Germany",
                "Iran",
                "South Korea",
                "Indonesia",
                "Saudi Arabia",
                "Canada",
                "Mexico",
                "Brazil",
                "South Africa",
                "Australia",
                "United Kingdom",
                "Turkey",
                "Italy",
                "France",
                "Thailand",
            ]),
            top_n: 20,
            map_year: "2022".to_string(),
            marker_year: "2020".to_string(),
            marker_window: (2015, 2022),
            world_trend_years: 50,
            report_rows: 20,
            color_scale: ColorScale::default(),
        }
    }
}

/// Load `config/dashboard.{toml,yaml,json}` if present; every section has defaults.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_dashboard_config_from("config/dashboard")
}

pub fn load_dashboard_config_from(path: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a source URI with URL-encoded values
pub fn prepare_uri(uri: &str, vars: &HashMap<String, String>) -> String {
    let mut result = uri.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
