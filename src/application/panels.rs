// Panel pipelines: parse -> filter/select -> aggregate/join for each dashboard panel.
// Everything here is pure; payloads arrive already loaded.
use crate::application::aggregate::{join_on_key, keyed_series, last_n, sum, top_n, totals_series};
use crate::application::color_scale::ColorScale;
use crate::application::coords::CountryCoords;
use crate::application::geo_join::augment;
use crate::application::parser::{parse_csv, parse_feature_collection, parse_json_records};
use crate::application::select::{select, Predicate, Selection};
use crate::domain::error::ParseError;
use crate::domain::geo::FeatureCollection;
use crate::domain::panel::Marker;
use crate::domain::record::{FieldSchema, FilteredRecord, Value};
use crate::domain::series::{Series, SeriesPoint, Table};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

// OWID co2 dataset
const COUNTRY: &str = "country";
const YEAR: &str = "year";
const CO2: &str = "co2";
const ISO_CODE: &str = "iso_code";
const WORLD: &str = "World";

// Energy generation datasets
const MODE_OF_GENERATION: &str = "Mode of Generation";
const CONTRIBUTION: &str = "Contribution (TWh)";
const TOTAL_ROW: &str = "Total";

// Per-country emissions dataset
const EMISSIONS_COUNTRY: &str = "Country";
const EMISSIONS_YEAR: &str = "Year";
const EMISSIONS_CO2: &str = "CO2 emission (Tons)";

// Disasters dataset
const DISASTER_COLUMNS: [(&str, &str); 6] = [
    ("Disaster Type", "Type"),
    ("Country", "Country"),
    ("Region", "Region"),
    ("Start Year", "Year"),
    ("Total Affected", "Affected"),
    ("Total Deaths", "Deaths"),
];
const NOT_AVAILABLE: &str = "N/A";

fn country_rows(csv: &str, year: &str, countries: &[String], drop_non_numeric: bool) -> Vec<FilteredRecord> {
    let selection = Selection::all()
        .with(Predicate::equals(YEAR, year))
        .with(Predicate::one_of(COUNTRY, countries.iter().cloned()));

    let mut schema = FieldSchema::builder().text(COUNTRY).required().measure(CO2);
    if drop_non_numeric {
        schema = schema.required();
    }

    select(&parse_csv(csv), &selection, &schema.build())
}

/// CO2 per target country for one year, in data order.
pub fn emissions_by_country(csv: &str, year: &str, countries: &[String]) -> Series {
    keyed_series(&country_rows(csv, year, countries, false), COUNTRY, &[CO2])
}

/// The `n` largest emitters among the target countries, descending.
pub fn top_emitters(csv: &str, year: &str, countries: &[String], n: usize) -> Series {
    top_n(keyed_series(&country_rows(csv, year, countries, true), COUNTRY, &[CO2]), n)
}

// Every non-"Total" row counts towards totals; only keyed output needs a mode
fn energy_rows(csv: &str, keyed: bool) -> Vec<FilteredRecord> {
    let selection = Selection::all().with(Predicate::not_equals(MODE_OF_GENERATION, TOTAL_ROW));
    let mut schema = FieldSchema::builder().text(MODE_OF_GENERATION).alias("mode");
    if keyed {
        schema = schema.required();
    }
    let schema = schema.measure(CONTRIBUTION).alias("value").build();
    select(&parse_csv(csv), &selection, &schema)
}

/// Two-point comparison of total renewable and non-renewable generation.
pub fn energy_totals(renewable_csv: &str, non_renewable_csv: &str) -> Series {
    let renewable = sum(&energy_rows(renewable_csv, false), "value");
    let non_renewable = sum(&energy_rows(non_renewable_csv, false), "value");
    totals_series(
        "type",
        "value",
        &[("Renewable", renewable), ("Non-Renewable", non_renewable)],
    )
}

/// Renewable and non-renewable contribution per mode of generation.
pub fn energy_by_mode(renewable_csv: &str, non_renewable_csv: &str) -> Series {
    join_on_key(
        &energy_rows(renewable_csv, true),
        &energy_rows(non_renewable_csv, true),
        "mode",
        "value",
        ("Renewable", "NonRenewable"),
    )
}

/// Country shapes with a `co2` property for the given year.
pub fn co2_map(geojson: &str, csv: &str, year: &str) -> Result<FeatureCollection, ParseError> {
    let collection = parse_feature_collection(geojson, "country shapes")?;

    let selection = Selection::all().with(Predicate::equals(YEAR, year));
    let schema = FieldSchema::builder()
        .text(ISO_CODE)
        .required()
        .measure(CO2)
        .required()
        .build();

    let mut by_code = HashMap::new();
    for row in select(&parse_csv(csv), &selection, &schema) {
        if let (Some(code), Some(co2)) = (row.text(ISO_CODE), row.number(CO2)) {
            by_code.insert(code.trim().to_string(), co2);
        }
    }

    tracing::debug!(
        "Joining {} co2 values onto {} features",
        by_code.len(),
        collection.features.len()
    );
    Ok(augment(&collection, &by_code, CO2))
}

/// Coloured markers for countries with both coordinates and a numeric CO2
/// value in `year`. Only years inside `window` are ever shown.
pub fn emission_markers(
    emissions_csv: &str,
    coords: &CountryCoords,
    year: &str,
    window: (i32, i32),
    scale: &ColorScale,
) -> Vec<Marker> {
    let selection = Selection::all()
        .with(Predicate::year_between(EMISSIONS_YEAR, window.0, window.1))
        .with(Predicate::equals(EMISSIONS_YEAR, year));
    let schema = FieldSchema::builder()
        .text(EMISSIONS_COUNTRY)
        .required()
        .text(EMISSIONS_YEAR)
        .measure(EMISSIONS_CO2)
        .required()
        .build();

    select(&parse_csv(emissions_csv), &selection, &schema)
        .into_iter()
        .filter_map(|row| {
            let country = row.text(EMISSIONS_COUNTRY)?.trim().to_string();
            let position = coords.get(&country)?;
            let co2 = row.number(EMISSIONS_CO2)?;
            Some(Marker {
                year: row.key(EMISSIONS_YEAR).unwrap_or_default(),
                color: scale.color_for(co2).to_string(),
                country,
                co2,
                lat: position.lat,
                lng: position.lng,
            })
        })
        .collect()
}

/// Located disasters matching the optional year/region filters, first `limit` rows.
pub fn disaster_table(csv: &str, year: Option<&str>, region: Option<&str>, limit: usize) -> Table {
    let selection = Selection::all()
        .with_optional(year.map(|y| Predicate::equals("Start Year", y)))
        .with_optional(region.map(|r| Predicate::equals("Region", r)))
        .with(Predicate::present("Latitude"))
        .with(Predicate::present("Longitude"));

    let schema = DISASTER_COLUMNS
        .iter()
        .fold(FieldSchema::builder(), |builder, (column, _)| {
            builder
                .text(column)
                .fallback(Value::Text(NOT_AVAILABLE.to_string()))
        })
        .build();

    let rows = select(&parse_csv(csv), &selection, &schema)
        .iter()
        .take(limit)
        .map(|row| row.values().map(ToString::to_string).collect())
        .collect();

    Table::new(
        DISASTER_COLUMNS.iter().map(|(_, label)| label.to_string()).collect(),
        rows,
    )
}

#[derive(Debug, Deserialize)]
struct PcaPoint {
    #[serde(rename = "type", alias = "Mode")]
    label: String,
    #[serde(rename = "PC1")]
    pc1: f64,
    #[serde(rename = "PC2")]
    pc2: f64,
}

/// Projected points from the offline PCA of the energy mix.
pub fn pca_projection(json: &str) -> Result<Series, ParseError> {
    let points: Vec<PcaPoint> = parse_json_records(json, "pca projection")?;

    let mut seen = HashSet::new();
    let points = points
        .into_iter()
        .filter(|p| seen.insert(p.label.clone()))
        .map(|p| SeriesPoint::new(p.label, vec![p.pc1, p.pc2]))
        .collect();

    Ok(Series::new(
        "type",
        vec!["PC1".to_string(), "PC2".to_string()],
        points,
    ))
}

/// World CO2 by year, most recent `window` entries.
pub fn world_trend(csv: &str, window: usize) -> Series {
    let selection = Selection::all().with(Predicate::equals(COUNTRY, WORLD));
    let schema = FieldSchema::builder()
        .year(YEAR)
        .required()
        .measure(CO2)
        .required()
        .build();

    let rows = select(&parse_csv(csv), &selection, &schema);
    last_n(keyed_series(&rows, YEAR, &[CO2]), window)
}
