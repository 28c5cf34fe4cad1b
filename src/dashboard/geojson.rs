use serde_json::{json, Value};

use super::types::RiskZone;

/// Render zones as a GeoJSON FeatureCollection with tier styling properties.
pub fn zones_to_geojson(zones: &[RiskZone]) -> Value {
    let features: Vec<Value> = zones
        .iter()
        .map(|zone| {
            json!({
                "type": "Feature",
                "properties": {
                    "id": zone.id,
                    "name": zone.name,
                    "riskLevel": zone.risk_level.as_str(),
                    "temperature": zone.temperature,
                    "humidity": zone.humidity,
                    "color": zone.risk_level.color_hex(),
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [zone.polygon],
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::types::default_zones;

    #[test]
    fn test_feature_collection_shape() {
        let value = zones_to_geojson(&default_zones());
        assert_eq!(value["type"], "FeatureCollection");

        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);

        let sierra = &features[2];
        assert_eq!(sierra["properties"]["name"], "Sierra Foothills");
        assert_eq!(sierra["properties"]["riskLevel"], "extreme");
        assert_eq!(sierra["properties"]["color"], "#ef4444");
        assert_eq!(sierra["geometry"]["type"], "Polygon");

        // One ring of five [lon, lat] points
        let ring = &sierra["geometry"]["coordinates"][0];
        assert_eq!(ring.as_array().unwrap().len(), 5);
        assert_eq!(ring[0][0], -121.0);
        assert_eq!(ring[0][1], 39.0);
    }

    #[test]
    fn test_empty_collection() {
        let value = zones_to_geojson(&[]);
        assert!(value["features"].as_array().unwrap().is_empty());
    }
}
