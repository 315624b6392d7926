//! Extracts raw features from the upstream map payload.
//!
//! The relevant shape is `{"map": {"features": [{"geometry": …,
//! "properties": {"name": …}}, …]}}`. Anything else in the payload is
//! ignored. A missing key is a structural mismatch, so it is reported as
//! [`SourceError::MalformedPayload`] and never retried.

use frontline_models::RawFeature;

use crate::SourceError;

/// Parses every feature of a map payload.
///
/// # Errors
///
/// Returns [`SourceError::MalformedPayload`] if `map.features` is missing
/// or any feature lacks a geometry or a string `properties.name`.
pub fn parse_payload(payload: &serde_json::Value) -> Result<Vec<RawFeature>, SourceError> {
    let features = payload
        .get("map")
        .and_then(|map| map.get("features"))
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| malformed("missing `map.features` array".to_string()))?;

    let raw = features
        .iter()
        .enumerate()
        .map(|(idx, feature)| parse_feature(idx, feature))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Payload contains {} features", raw.len());

    Ok(raw)
}

fn parse_feature(idx: usize, feature: &serde_json::Value) -> Result<RawFeature, SourceError> {
    let geometry = feature
        .get("geometry")
        .filter(|geometry| !geometry.is_null())
        .ok_or_else(|| malformed(format!("feature {idx} has no geometry")))?;

    let name = feature
        .get("properties")
        .and_then(|props| props.get("name"))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| malformed(format!("feature {idx} has no `properties.name`")))?;

    Ok(RawFeature {
        name: name.to_string(),
        geometry: geometry.clone(),
    })
}

const fn malformed(message: String) -> SourceError {
    SourceError::MalformedPayload { message }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_name_and_geometry() {
        let payload = json!({
            "id": 1234,
            "map": {
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "geometry": {"type": "Point", "coordinates": [30.5, 50.4, 0.0]},
                        "properties": {"name": "Kyiv///Київ///Kyiv", "fill": "#fff"}
                    }
                ]
            }
        });

        let features = parse_payload(&payload).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Kyiv///Київ///Kyiv");
        assert_eq!(features[0].geometry["type"], "Point");
    }

    #[test]
    fn empty_feature_list_is_valid() {
        let features = parse_payload(&json!({"map": {"features": []}})).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn rejects_missing_map() {
        let err = parse_payload(&json!({"features": []})).unwrap_err();
        assert!(matches!(err, SourceError::MalformedPayload { .. }));
    }

    #[test]
    fn rejects_feature_without_name() {
        let payload = json!({
            "map": {"features": [
                {"geometry": {"type": "Point", "coordinates": [0.0, 0.0]}, "properties": {}}
            ]}
        });
        let err = parse_payload(&payload).unwrap_err();
        assert!(err.to_string().contains("feature 0"));
    }

    #[test]
    fn rejects_null_geometry() {
        let payload = json!({
            "map": {"features": [{"geometry": null, "properties": {"name": "a///b"}}]}
        });
        assert!(matches!(
            parse_payload(&payload),
            Err(SourceError::MalformedPayload { .. })
        ));
    }
}
