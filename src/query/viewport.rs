use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Axis-aligned map bounds in lng/lat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Viewport {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Inclusive bounds test. Degenerate rectangles (west > east or south > north) contain nothing.
    #[inline]
    pub fn contains(&self, [lng, lat]: [f64; 2]) -> bool {
        self.west <= lng && lng <= self.east && self.south <= lat && lat <= self.north
    }
}

/// Points inside `viewport`, in input order. No viewport yet means nothing is visible.
pub fn cull<'a, I>(points: I, viewport: Option<&Viewport>) -> Vec<&'a Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    let Some(viewport) = viewport else { return Vec::new() };
    points.into_iter()
        .filter(|point| viewport.contains(point.position))
        .collect()
}
