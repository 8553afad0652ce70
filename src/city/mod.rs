mod bbox;
mod boundary;
mod city;
mod index;
mod resolve;

pub use boundary::{BoundaryFeature, BoundaryGeometry};
pub use city::{City, Ring};
pub use index::CityIndex;
pub use resolve::{resolve_cities, resolve_city, DEFAULT_ZOOM};
