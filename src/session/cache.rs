use std::sync::Arc;

use ahash::AHashMap;

use crate::point::Point;

/// Loaded shards for one session. Entries are inserted once and never replaced or evicted.
#[derive(Debug, Default)]
pub struct ShardCache {
    shards: AHashMap<String, Arc<[Point]>>,
}

impl ShardCache {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, city_id: &str) -> Option<Arc<[Point]>> {
        self.shards.get(city_id).cloned()
    }

    /// Insert a freshly loaded shard; an existing entry wins and is returned instead.
    pub fn insert(&mut self, city_id: &str, points: Vec<Point>) -> Arc<[Point]> {
        self.shards.entry(city_id.to_string())
            .or_insert_with(|| Arc::from(points))
            .clone()
    }

    #[inline] pub fn len(&self) -> usize { self.shards.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.shards.is_empty() }
}
