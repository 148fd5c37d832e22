// Chart-ready series and table models
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

/// One chart data point: a category/year key plus one value per series label.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub key: String,
    pub values: Vec<f64>,
}

impl SeriesPoint {
    pub fn new(key: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// The value a "top N" ordering ranks by.
    pub fn primary(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }
}

/// An ordered set of points sharing the same key label and value labels.
///
/// A series produced by the joined key stage carries two value labels and is
/// what the chart layer calls a joined series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key_label: String,
    pub value_labels: Vec<String>,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(key_label: impl Into<String>, value_labels: Vec<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            key_label: key_label.into(),
            value_labels,
            points,
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Serializes a point as `{key_label: key, label_1: v1, ...}`.
struct PointRow<'a> {
    series: &'a Series,
    point: &'a SeriesPoint,
}

impl Serialize for PointRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.point.values.len()))?;
        map.serialize_entry(&self.series.key_label, &self.point.key)?;
        for (label, value) in self.series.value_labels.iter().zip(&self.point.values) {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<PointRow<'_>> = self
            .points
            .iter()
            .map(|point| PointRow { series: self, point })
            .collect();

        let mut state = serializer.serialize_struct("Series", 3)?;
        state.serialize_field("key_label", &self.key_label)?;
        state.serialize_field("value_labels", &self.value_labels)?;
        state.serialize_field("points", &rows)?;
        state.end()
    }
}

/// Plain string table, used for row listings and exported reports.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }
}
