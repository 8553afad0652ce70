use serde::Deserialize;
use serde_json::{Map, Value};

use crate::city::Ring;

/// One feature of the boundary collection, as found in the source GeoJSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoundaryFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<BoundaryGeometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Polygon or multi-polygon geometry. Positions keep any extra ordinates
/// (e.g. altitude) until rings are extracted.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum BoundaryGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

fn to_ring(positions: &[Vec<f64>]) -> Ring {
    positions.iter()
        .filter(|p| p.len() >= 2)
        .map(|p| [p[0], p[1]])
        .collect()
}

impl BoundaryFeature {
    /// Property value by key, treating JSON `null` as absent.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key).filter(|v| !v.is_null())
    }

    /// Exterior ring of every polygon part, skipping parts with no vertices.
    pub fn exterior_rings(&self) -> Vec<Ring> {
        let rings: Vec<Ring> = match &self.geometry {
            Some(BoundaryGeometry::Polygon { coordinates }) => {
                coordinates.first().map(|ring| to_ring(ring)).into_iter().collect()
            }
            Some(BoundaryGeometry::MultiPolygon { coordinates }) => {
                coordinates.iter()
                    .filter_map(|polygon| polygon.first())
                    .map(|ring| to_ring(ring))
                    .collect()
            }
            Some(BoundaryGeometry::Unsupported) | None => Vec::new(),
        };
        rings.into_iter().filter(|ring| !ring.is_empty()).collect()
    }
}
