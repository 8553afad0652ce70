use serde::{Deserialize, Serialize};

/// Closed ring of `[lng, lat]` vertices.
pub type Ring = Vec<[f64; 2]>;

/// A selectable city (CBSA) with its boundary rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    /// `[lng, lat]`
    pub center: [f64; 2],
    pub zoom: f64,
    /// First ring of `polygons`, kept for clients that only draw one ring.
    #[serde(default)]
    pub polygon: Ring,
    /// Every part of the boundary (mainland, islands, ...).
    #[serde(default)]
    pub polygons: Vec<Ring>,
}

impl City {
    pub fn new(id: String, name: String, center: [f64; 2], zoom: f64, polygons: Vec<Ring>) -> Self {
        Self {
            id,
            name,
            center,
            zoom,
            polygon: polygons.first().cloned().unwrap_or_default(),
            polygons,
        }
    }

    /// Rings of this city, falling back to `polygon` for single-ring records.
    pub fn rings(&self) -> &[Ring] {
        if self.polygons.is_empty() { std::slice::from_ref(&self.polygon) } else { &self.polygons }
    }
}

/// Center of the bounding box of `ring`, or the origin for an empty ring.
pub(crate) fn ring_center(ring: &[[f64; 2]]) -> [f64; 2] {
    if ring.is_empty() { return [0.0, 0.0] }
    let (mut min_lng, mut max_lng) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
    for &[lng, lat] in ring {
        min_lng = min_lng.min(lng);
        max_lng = max_lng.max(lng);
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
    }
    [(min_lng + max_lng) / 2.0, (min_lat + max_lat) / 2.0]
}
