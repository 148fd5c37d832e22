// Record parser: delimited text -> raw records, JSON payloads -> typed values
use crate::domain::error::ParseError;
use crate::domain::geo::FeatureCollection;
use crate::domain::record::{Header, RawRecord};
use serde::de::DeserializeOwned;
use std::sync::Arc;

const DELIMITER: char = ',';

/// Split comma-separated text into records keyed by the first line's headers.
///
/// Splitting is field-by-field with no quoting support. Rows shorter than the
/// header leave trailing columns absent, extra fields are ignored, and blank
/// lines are skipped. Never fails.
pub fn parse_csv(text: &str) -> Vec<RawRecord> {
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    let header_line = match lines.next() {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Vec::new(),
    };

    let header = Arc::new(Header::new(
        header_line.split(DELIMITER).map(strip_bom).collect(),
    ));
    let width = header.names().len();

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let values = line
                .split(DELIMITER)
                .take(width)
                .map(str::to_string)
                .collect();
            RawRecord::new(header.clone(), values)
        })
        .collect()
}

// Header text is kept as written apart from a leading byte-order mark
fn strip_bom(name: &str) -> String {
    name.trim_start_matches('\u{feff}').to_string()
}

/// Parse a flat JSON array of records.
pub fn parse_json_records<T: DeserializeOwned>(text: &str, what: &str) -> Result<Vec<T>, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError::new(what, e.to_string()))
}

/// Parse a GeoJSON FeatureCollection.
pub fn parse_feature_collection(text: &str, what: &str) -> Result<FeatureCollection, ParseError> {
    let collection: FeatureCollection =
        serde_json::from_str(text).map_err(|e| ParseError::new(what, e.to_string()))?;

    if collection.kind != "FeatureCollection" {
        return Err(ParseError::new(
            what,
            format!("expected a FeatureCollection, found {}", collection.kind),
        ));
    }

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_parse_row_maps_headers_to_values() {
        let records = parse_csv("country,year,co2\nChina,2021,11000\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("country"), Some("China"));
        assert_eq!(records[0].get("year"), Some("2021"));
        assert_eq!(records[0].get("co2"), Some("11000"));
    }

    #[test]
    fn test_short_row_is_tolerated() {
        let records = parse_csv("country,year,co2\nIndia,2021\nJapan\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("year"), Some("2021"));
        assert_eq!(records[0].get("co2"), None);
        assert_eq!(records[1].get("country"), Some("Japan"));
        assert_eq!(records[1].get("year"), None);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\n").is_empty());
        assert!(parse_csv("country,year,co2").is_empty());
        assert!(parse_csv("country,year,co2\n").is_empty());
    }

    #[test]
    fn test_preserves_row_order() {
        let records = parse_csv("k\nc\na\nb");
        let keys: Vec<_> = records.iter().filter_map(|r| r.get("k")).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_crlf_bom_and_extra_fields() {
        let records = parse_csv("\u{feff}Country,Latitude\r\nPeru,-9.19,extra\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Country"), Some("Peru"));
        assert_eq!(records[0].get("Latitude"), Some("-9.19"));
    }

    #[test]
    fn test_header_whitespace_is_kept() {
        let records = parse_csv("a, b ,c\n1,2, 3\n");
        assert_eq!(records[0].get("a"), Some("1"));
        assert_eq!(records[0].get(" b "), Some("2"));
        assert_eq!(records[0].get("c"), Some(" 3"));
        assert_eq!(records[0].get("b"), None);
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let records = parse_csv("name,value\n\"Korea, South\",3\n");
        assert_eq!(records[0].get("name"), Some("\"Korea"));
        assert_eq!(records[0].get("value"), Some(" South\""));
    }

    #[derive(Debug, Deserialize)]
    struct Point {
        #[serde(rename = "PC1")]
        pc1: f64,
    }

    #[test]
    fn test_json_records() {
        let points: Vec<Point> = parse_json_records(r#"[{"PC1": 1.5}, {"PC1": -0.5}]"#, "pca").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].pc1, -0.5);

        let err = parse_json_records::<Point>("{not json", "pca").unwrap_err();
        assert_eq!(err.what, "pca");
    }

    #[test]
    fn test_feature_collection() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"ISO_A3":"FRA"}}
        ]}"#;
        let collection = parse_feature_collection(text, "countries").unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].property_str("ISO_A3"), Some("FRA"));

        assert!(parse_feature_collection(r#"{"type":"Feature","features":[]}"#, "countries").is_err());
        assert!(parse_feature_collection("<html>", "countries").is_err());
    }
}
