// GeoJSON augmentation: attach a looked-up measure to each feature
use crate::domain::geo::{Feature, FeatureCollection};
use std::collections::HashMap;

/// Property names tried, in order, for a feature's ISO-3 code.
pub const ISO_KEYS: [&str; 4] = ["ISO_A3", "ISO_A3_CODE", "iso_a3", "ADMIN_CODE"];

pub fn feature_key(feature: &Feature) -> Option<&str> {
    ISO_KEYS.iter().find_map(|key| feature.property_str(key))
}

/// Copy of the collection with `field` set on every feature's properties.
/// Features whose key is missing from `values` get 0.
pub fn augment(collection: &FeatureCollection, values: &HashMap<String, f64>, field: &str) -> FeatureCollection {
    let features = collection
        .features
        .iter()
        .map(|feature| {
            let value = feature_key(feature)
                .and_then(|key| values.get(key))
                .copied()
                .unwrap_or(0.0);

            let mut feature = feature.clone();
            feature
                .properties
                .insert(field.to_string(), serde_json::Value::from(value));
            feature
        })
        .collect();

    FeatureCollection {
        kind: collection.kind.clone(),
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::parser::parse_feature_collection;

    const COUNTRIES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":null,"properties":{"ISO_A3":"CHN","name":"China"}},
        {"type":"Feature","geometry":null,"properties":{"ISO_A3":"","iso_a3":"IND"}},
        {"type":"Feature","geometry":null,"properties":{"ADMIN_CODE":"ATA"}},
        {"type":"Feature","geometry":null,"properties":{}}
    ]}"#;

    #[test]
    fn test_key_priority() {
        let collection = parse_feature_collection(COUNTRIES, "countries").unwrap();
        let keys: Vec<_> = collection.features.iter().map(feature_key).collect();
        assert_eq!(keys, vec![Some("CHN"), Some("IND"), Some("ATA"), None]);
    }

    #[test]
    fn test_augment_defaults_to_zero() {
        let collection = parse_feature_collection(COUNTRIES, "countries").unwrap();
        let values = HashMap::from([("CHN".to_string(), 11472.0), ("IND".to_string(), 2693.0)]);

        let merged = augment(&collection, &values, "co2");
        let co2: Vec<_> = merged
            .features
            .iter()
            .map(|f| f.properties["co2"].as_f64().unwrap())
            .collect();
        assert_eq!(co2, vec![11472.0, 2693.0, 0.0, 0.0]);
        assert_eq!(merged.features[0].properties["name"], "China");
        assert!(collection.features[0].properties.get("co2").is_none());
    }
}
