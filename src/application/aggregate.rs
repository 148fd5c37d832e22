// Aggregation / join stage: totals, keyed series, joins and top-N
use crate::domain::record::FilteredRecord;
use crate::domain::series::{Series, SeriesPoint};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sum a numeric field. Absent or non-numeric values count as 0.
pub fn sum(records: &[FilteredRecord], field: &str) -> f64 {
    records.iter().map(|r| r.number(field).unwrap_or(0.0)).sum()
}

/// One point per labelled scalar, in the given order.
pub fn totals_series(key_label: &str, value_label: &str, totals: &[(&str, f64)]) -> Series {
    let points = totals
        .iter()
        .map(|(label, total)| SeriesPoint::new(*label, vec![*total]))
        .collect();
    Series::new(key_label, vec![value_label.to_string()], points)
}

/// Insertion-ordered accumulator that keeps keys unique.
struct KeyedPoints {
    width: usize,
    index: HashMap<String, usize>,
    points: Vec<SeriesPoint>,
}

impl KeyedPoints {
    fn new(width: usize) -> Self {
        Self {
            width,
            index: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn add(&mut self, key: String, slot: usize, value: f64) {
        let idx = match self.index.get(&key) {
            Some(idx) => *idx,
            None => {
                self.index.insert(key.clone(), self.points.len());
                self.points.push(SeriesPoint::new(key, vec![0.0; self.width]));
                self.points.len() - 1
            }
        };
        self.points[idx].values[slot] += value;
    }

    fn into_points(self) -> Vec<SeriesPoint> {
        self.points
    }
}

/// Build a series keyed by `key_field`, one value column per `value_fields`
/// entry. Repeated keys are summed into the first occurrence.
pub fn keyed_series(records: &[FilteredRecord], key_field: &str, value_fields: &[&str]) -> Series {
    let mut acc = KeyedPoints::new(value_fields.len());
    for record in records {
        let Some(key) = record.key(key_field) else {
            continue;
        };
        let key = key.trim().to_string();
        for (slot, field) in value_fields.iter().enumerate() {
            acc.add(key.clone(), slot, record.number(field).unwrap_or(0.0));
        }
    }

    Series::new(
        key_field,
        value_fields.iter().map(|f| f.to_string()).collect(),
        acc.into_points(),
    )
}

/// Outer join of two record sets on a trimmed, exact-match key.
///
/// Every key from either side appears once, left keys first in first-seen
/// order, then right-only keys. A side missing a key contributes 0; repeated
/// keys on one side are summed.
pub fn join_on_key(
    left: &[FilteredRecord],
    right: &[FilteredRecord],
    key_field: &str,
    value_field: &str,
    labels: (&str, &str),
) -> Series {
    let mut acc = KeyedPoints::new(2);
    for (slot, side) in [left, right].into_iter().enumerate() {
        for record in side {
            let Some(key) = record.key(key_field) else {
                continue;
            };
            acc.add(key.trim().to_string(), slot, record.number(value_field).unwrap_or(0.0));
        }
    }

    Series::new(
        key_field,
        vec![labels.0.to_string(), labels.1.to_string()],
        acc.into_points(),
    )
}

/// Stable descending sort on the primary value; ties keep their input order.
pub fn sort_desc(series: &mut Series) {
    series
        .points
        .sort_by(|a, b| b.primary().partial_cmp(&a.primary()).unwrap_or(Ordering::Equal));
}

/// Drop non-numeric points, sort descending (stable) and keep the first `n`.
pub fn top_n(mut series: Series, n: usize) -> Series {
    series.points.retain(|p| p.primary().is_finite());
    sort_desc(&mut series);
    series.points.truncate(n);
    series
}

/// Keep the last `n` points in their existing order.
pub fn last_n(mut series: Series, n: usize) -> Series {
    let skip = series.points.len().saturating_sub(n);
    series.points.drain(..skip);
    series
}
