//! GeoJSON export of zones for map widgets that consume GeoJSON layers.

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use parkzone_core::models::Zone;

/// Convert a zone into a GeoJSON Polygon feature.
///
/// Properties: `name`, `color` (when assigned), and `anchor` as `[lng, lat]`.
pub fn to_feature(zone: &Zone) -> Feature {
    let ring: Vec<Vec<f64>> = zone.polygon.to_lng_lat().into_iter().map(|c| c.to_vec()).collect();

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), zone.name.clone().into());
    if let Some(color) = zone.color {
        properties.insert("color".to_string(), color.to_string().into());
    }
    properties.insert("anchor".to_string(), serde_json::json!(zone.anchor.to_lng_lat()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: Some(Id::String(zone.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert zones into a FeatureCollection, preserving order
pub fn to_feature_collection<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: zones.into_iter().map(to_feature).collect(),
        foreign_members: None,
    }
}
