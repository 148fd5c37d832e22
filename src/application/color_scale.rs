// Threshold colour scale for map legends and markers
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorStop {
    pub above: f64,
    pub color: String,
}

/// Buckets a value by the first stop it strictly exceeds, highest stop first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ScaleSettings")]
pub struct ColorScale {
    stops: Vec<ColorStop>,
    floor: String,
}

#[derive(Deserialize)]
struct ScaleSettings {
    stops: Vec<ColorStop>,
    floor: String,
}

impl From<ScaleSettings> for ColorScale {
    fn from(settings: ScaleSettings) -> Self {
        Self::new(settings.stops, settings.floor)
    }
}

impl ColorScale {
    pub fn new(mut stops: Vec<ColorStop>, floor: impl Into<String>) -> Self {
        stops.sort_by(|a, b| b.above.total_cmp(&a.above));
        Self {
            stops,
            floor: floor.into(),
        }
    }

    /// Annual CO2 emissions in tons.
    pub fn co2_tons() -> Self {
        let stops = [
            (1_000_000_000.0, "#800026"),
            (500_000_000.0, "#BD0026"),
            (200_000_000.0, "#E31A1C"),
            (100_000_000.0, "#FC4E2A"),
            (50_000_000.0, "#FD8D3C"),
            (20_000_000.0, "#FEB24C"),
            (10_000_000.0, "#FED976"),
        ]
        .into_iter()
        .map(|(above, color)| ColorStop {
            above,
            color: color.to_string(),
        })
        .collect();
        Self::new(stops, "#FFEDA0")
    }

    pub fn color_for(&self, value: f64) -> &str {
        self.stops
            .iter()
            .find(|stop| value > stop.above)
            .map_or(self.floor.as_str(), |stop| stop.color.as_str())
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::co2_tons()
    }
}
