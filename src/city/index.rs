use ahash::AHashMap;
use anyhow::{Context, Result};
use geo::{BoundingRect, Contains, Coord, LineString, Polygon};
use rstar::{RTree, AABB};
use serde_json::{json, Value};

use crate::city::{bbox::BoundingBox, City};
use crate::io::json::read_json_bytes;
use crate::pack::{PackSource, CITIES_FILE};

/// Resolved cities with lookups by id and by location.
#[derive(Debug, Clone)]
pub struct CityIndex {
    cities: Vec<City>,
    by_id: AHashMap<String, usize>,
    shapes: Vec<Vec<Polygon<f64>>>,
    rtree: RTree<BoundingBox>,
}

fn ring_polygon(ring: &[[f64; 2]]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();
    Polygon::new(LineString(coords), Vec::new()) // geo closes the ring
}

impl CityIndex {
    pub fn new(cities: Vec<City>) -> Self {
        let shapes: Vec<Vec<Polygon<f64>>> = cities.iter()
            .map(|city| city.rings().iter().map(|ring| ring_polygon(ring)).collect())
            .collect();

        let boxes: Vec<BoundingBox> = shapes.iter().enumerate()
            .flat_map(|(c, polygons)| polygons.iter().enumerate()
                .filter_map(move |(r, polygon)| polygon.bounding_rect().map(|rect| BoundingBox::new(c, r, rect))))
            .collect();

        let mut by_id = AHashMap::with_capacity(cities.len());
        for (i, city) in cities.iter().enumerate() {
            by_id.entry(city.id.clone()).or_insert(i);
        }

        Self { cities, by_id, shapes, rtree: RTree::bulk_load(boxes) }
    }

    /// Read `cities.json` from a pack.
    pub fn read_from_pack(src: &dyn PackSource) -> Result<Self> {
        let bytes = src.get(CITIES_FILE)
            .with_context(|| format!("[city::index] Failed to read {CITIES_FILE}"))?;
        let cities: Vec<City> = read_json_bytes(&bytes)
            .with_context(|| format!("[city::index] Failed to parse {CITIES_FILE}"))?;
        Ok(Self::new(cities))
    }

    #[inline] pub fn len(&self) -> usize { self.cities.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.cities.is_empty() }

    #[inline] pub fn cities(&self) -> &[City] { &self.cities }

    /// City with the given id (first one if ids repeat).
    pub fn get(&self, id: &str) -> Option<&City> {
        self.by_id.get(id).map(|&i| &self.cities[i])
    }

    /// First city, in input order, with a ring containing `(lng, lat)`.
    pub fn city_at(&self, lng: f64, lat: f64) -> Option<&City> {
        let point = geo::Point::new(lng, lat);
        let mut hits: Vec<(usize, usize)> = self.rtree
            .locate_in_envelope_intersecting(&AABB::from_point([lng, lat]))
            .map(|b| (b.city(), b.ring()))
            .collect();
        hits.sort_unstable();
        hits.into_iter()
            .find(|&(c, r)| self.shapes[c][r].contains(&point))
            .map(|(c, _)| &self.cities[c])
    }

    /// Boundary layer as a GeoJSON FeatureCollection, one Polygon feature per city.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self.cities.iter().map(|city| json!({
            "type": "Feature",
            "id": city.id,
            "properties": { "name": city.name, "id": city.id },
            "geometry": {
                "type": "Polygon",
                "coordinates": [city.polygon],
            },
        })).collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
