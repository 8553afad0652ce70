use anyhow::{Context, Result};
use serde::Deserialize;

use crate::city::BoundaryFeature;

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<BoundaryFeature>,
}

/// Read boundary features from GeoJSON FeatureCollection bytes.
pub(crate) fn read_boundary_bytes(bytes: &[u8]) -> Result<Vec<BoundaryFeature>> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)
        .context("[io::geojson] Failed to parse boundary GeoJSON")?;
    Ok(collection.features)
}
