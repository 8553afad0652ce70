use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with one ring of one city.
#[derive(Debug, Clone)]
pub(super) struct BoundingBox {
    city: usize, // index of the city in the index
    ring: usize, // index of the ring within that city
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(super) fn new(city: usize, ring: usize, bbox: Rect<f64>) -> Self {
        Self { city, ring, bbox }
    }

    #[inline] pub(super) fn city(&self) -> usize { self.city }

    #[inline] pub(super) fn ring(&self) -> usize { self.ring }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}
