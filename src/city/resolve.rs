use serde_json::Value;

use crate::city::{city::ring_center, BoundaryFeature, City};

/// Initial zoom for cities whose source carries none.
pub const DEFAULT_ZOOM: f64 = 10.0;

/// Resolves one optional field from a feature. Resolvers are tried in order; first `Some` wins.
type Resolver<T> = fn(&BoundaryFeature) -> Option<T>;

/// Stringify a scalar property the way it reads in the source (`"06"` stays `"06"`, `31080` becomes `"31080"`).
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric value of a property; numeric strings are accepted.
fn value_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

fn text_property(feature: &BoundaryFeature, key: &str) -> Option<String> {
    feature.property(key).map(value_text)
}

fn feature_id(f: &BoundaryFeature) -> Option<String> {
    f.id.as_ref().filter(|v| !v.is_null()).map(value_text)
}
fn geoid_property(f: &BoundaryFeature) -> Option<String> { text_property(f, "GEOID") }
fn id_property(f: &BoundaryFeature) -> Option<String> { text_property(f, "id") }
fn lower_name_property(f: &BoundaryFeature) -> Option<String> { text_property(f, "name") }
fn upper_name_property(f: &BoundaryFeature) -> Option<String> { text_property(f, "NAME") }

const ID_RESOLVERS: &[Resolver<String>] = &[feature_id, geoid_property, id_property, lower_name_property];

const NAME_RESOLVERS: &[Resolver<String>] = &[upper_name_property, lower_name_property];

fn explicit_center(f: &BoundaryFeature) -> Option<[f64; 2]> {
    let lng = f.property("city_center_lon").and_then(value_number)?;
    let lat = f.property("city_center_lat").and_then(value_number)?;
    Some([lng, lat])
}

const CENTER_RESOLVERS: &[Resolver<[f64; 2]>] = &[explicit_center];

fn zoom_property(f: &BoundaryFeature) -> Option<f64> {
    f.property("zoom").and_then(Value::as_f64).filter(|z| z.is_finite())
}

const ZOOM_RESOLVERS: &[Resolver<f64>] = &[zoom_property];

fn first_match<T>(resolvers: &[Resolver<T>], feature: &BoundaryFeature) -> Option<T> {
    resolvers.iter().find_map(|resolve| resolve(feature))
}

/// Resolve the feature at position `ordinal` of its collection into a `City`.
/// Returns `None` when the feature has no ring with at least one vertex.
pub fn resolve_city(feature: &BoundaryFeature, ordinal: usize) -> Option<City> {
    let rings = feature.exterior_rings();
    if rings.is_empty() { return None }

    let id = first_match(ID_RESOLVERS, feature).unwrap_or_else(|| format!("city-{ordinal}"));
    let name = first_match(NAME_RESOLVERS, feature).unwrap_or_else(|| id.clone());
    let center = first_match(CENTER_RESOLVERS, feature).unwrap_or_else(|| ring_center(&rings[0]));
    let zoom = first_match(ZOOM_RESOLVERS, feature).unwrap_or(DEFAULT_ZOOM);

    Some(City::new(id, name, center, zoom, rings))
}

/// Resolve a boundary collection, preserving feature order and dropping ringless features.
pub fn resolve_cities(features: &[BoundaryFeature]) -> Vec<City> {
    features.iter()
        .enumerate()
        .filter_map(|(i, feature)| resolve_city(feature, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn features(value: serde_json::Value) -> Vec<BoundaryFeature> {
        serde_json::from_value(value).unwrap()
    }

    fn square(x: f64, y: f64) -> serde_json::Value {
        json!({ "type": "Polygon", "coordinates": [[[x, y], [x + 2.0, y], [x + 2.0, y + 2.0], [x, y + 2.0], [x, y]]] })
    }

    #[test]
    fn id_priority_is_first_match() {
        let cities = resolve_cities(&features(json!([
            { "id": 7, "geometry": square(0.0, 0.0), "properties": { "GEOID": "35620", "name": "x" } },
            { "geometry": square(0.0, 0.0), "properties": { "GEOID": "35620", "id": "nyc" } },
            { "geometry": square(0.0, 0.0), "properties": { "id": "nyc", "name": "New York" } },
            { "geometry": square(0.0, 0.0), "properties": { "name": "Boston" } },
            { "geometry": square(0.0, 0.0), "properties": { "GEOID": null } },
        ])));
        let ids: Vec<_> = cities.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "35620", "nyc", "Boston", "city-4"]);
    }

    #[test]
    fn name_falls_back_to_id() {
        let cities = resolve_cities(&features(json!([
            { "geometry": square(0.0, 0.0), "properties": { "GEOID": "1", "NAME": "Upper", "name": "lower" } },
            { "geometry": square(0.0, 0.0), "properties": { "GEOID": "2", "name": "lower" } },
            { "geometry": square(0.0, 0.0), "properties": { "GEOID": "3" } },
        ])));
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Upper", "lower", "3"]);
    }

    #[test]
    fn center_prefers_explicit_properties() {
        let cities = resolve_cities(&features(json!([
            { "geometry": square(0.0, 0.0), "properties": { "city_center_lon": -73.98, "city_center_lat": "40.75" } },
            { "geometry": square(10.0, 20.0), "properties": { "city_center_lon": -73.98 } },
            { "geometry": square(10.0, 20.0), "properties": { "city_center_lon": "abc", "city_center_lat": 1 } },
        ])));
        assert_eq!(cities[0].center, [-73.98, 40.75]);
        assert_eq!(cities[1].center, [11.0, 21.0]);
        assert_eq!(cities[2].center, [11.0, 21.0]);
    }

    #[test]
    fn zoom_must_be_numeric() {
        let cities = resolve_cities(&features(json!([
            { "geometry": square(0.0, 0.0), "properties": { "zoom": 11 } },
            { "geometry": square(0.0, 0.0), "properties": { "zoom": "12" } },
        ])));
        assert_eq!(cities[0].zoom, 11.0);
        assert_eq!(cities[1].zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn ringless_features_are_dropped_but_keep_ordinals() {
        let cities = resolve_cities(&features(json!([
            { "geometry": null, "properties": {} },
            { "geometry": { "type": "Polygon", "coordinates": [[]] } },
            { "geometry": { "type": "MultiPolygon", "coordinates": [
                [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                [[[5, 5], [6, 5], [6, 6], [5, 5]]]
            ]}},
        ])));
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].id, "city-2");
        assert_eq!(cities[0].polygons.len(), 2);
        assert_eq!(cities[0].center, [0.5, 0.5]);
    }
}
