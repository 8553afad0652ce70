use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::city::City;
use crate::io::json::write_json_bytes;
use crate::pack::{is_shard_key, shard_path, FileHash, Manifest, PackSink, CITIES_FILE, MANIFEST_FILE};
use crate::point::Point;

/// Points grouped into one shard per city id, plus the city index they are served with.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    cities: Vec<City>,
    shards: BTreeMap<String, Vec<Point>>,
    unassigned: usize,
}

impl Partition {
    /// Group `points` by city id, preserving input order within each shard.
    /// Points without a usable city id belong to no shard and are only counted.
    pub fn new(points: Vec<Point>, cities: Vec<City>) -> Self {
        let mut shards: BTreeMap<String, Vec<Point>> = BTreeMap::new();
        let mut unassigned = 0;
        let mut rejected_keys = 0;

        for point in points {
            match point.city_id().map(str::to_string) {
                Some(id) if is_shard_key(&id) => shards.entry(id).or_default().push(point),
                Some(id) => {
                    debug!(city = %id, "[pack::partition] city id cannot name a shard file");
                    rejected_keys += 1;
                    unassigned += 1;
                }
                None => unassigned += 1,
            }
        }

        if rejected_keys > 0 {
            warn!(points = rejected_keys, "[pack::partition] dropped points whose city id is not a valid shard name");
        }

        Self { cities, shards, unassigned }
    }

    #[inline] pub fn cities(&self) -> &[City] { &self.cities }

    /// Shards keyed by city id, in ascending id order.
    #[inline] pub fn shards(&self) -> &BTreeMap<String, Vec<Point>> { &self.shards }

    pub fn shard(&self, city_id: &str) -> Option<&[Point]> {
        self.shards.get(city_id).map(Vec::as_slice)
    }

    /// Points that belong to no shard.
    #[inline] pub fn unassigned(&self) -> usize { self.unassigned }

    /// Sorted ids of every city that received a shard.
    pub fn city_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.shards.keys().map(String::as_str)
    }

    /// Serialize every artifact, then write them to `sink`: shards first,
    /// the manifest after the shards it lists, the city index last.
    pub fn write_to(&self, sink: &mut dyn PackSink) -> Result<Manifest> {
        let cities = write_json_bytes(&self.cities).context("[pack::partition] encode city index")?;

        let mut encoded = Vec::with_capacity(self.shards.len());
        for (city_id, points) in &self.shards {
            let bytes = write_json_bytes(points)
                .with_context(|| format!("[pack::partition] encode shard {city_id}"))?;
            encoded.push((city_id, shard_path(city_id), bytes));
        }

        let counts = self.shards.iter().map(|(id, points)| (id.clone(), points.len())).collect();
        let files = encoded.iter().map(|(_, rel, bytes)| (rel.clone(), FileHash::of(bytes))).collect();
        let manifest = Manifest::new(counts, files);
        let manifest_bytes = write_json_bytes(&manifest).context("[pack::partition] encode manifest")?;

        for (city_id, rel, bytes) in &encoded {
            sink.put(rel, bytes).with_context(|| format!("[pack::partition] write shard {city_id}"))?;
        }
        sink.put(MANIFEST_FILE, &manifest_bytes).context("[pack::partition] write manifest")?;
        sink.put(CITIES_FILE, &cities).context("[pack::partition] write city index")?;

        Ok(manifest)
    }
}
