// Country coordinate lookup, built once per load and passed to the stages that need it
use crate::application::select::{select, Selection};
use crate::domain::record::{FieldSchema, RawRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Immutable country name -> coordinates table.
#[derive(Debug, Clone, Default)]
pub struct CountryCoords {
    by_country: HashMap<String, LatLng>,
}

impl CountryCoords {
    /// Build from rows carrying `Country`, `Latitude` and `Longitude`.
    /// Rows missing any of the three are skipped.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let schema = FieldSchema::builder()
            .text("Country")
            .required()
            .measure("Latitude")
            .required()
            .measure("Longitude")
            .required()
            .build();

        let by_country = select(records, &Selection::all(), &schema)
            .into_iter()
            .filter_map(|row| {
                let country = row.text("Country")?.trim().to_string();
                let lat = row.number("Latitude")?;
                let lng = row.number("Longitude")?;
                Some((country, LatLng { lat, lng }))
            })
            .collect();

        Self { by_country }
    }

    pub fn get(&self, country: &str) -> Option<LatLng> {
        self.by_country.get(country.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_country.len()
    }
}
