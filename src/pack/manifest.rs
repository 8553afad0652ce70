use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::io::json::read_json_bytes;
use crate::pack::{PackSource, MANIFEST_FILE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    pub sha256: String,
}

impl FileHash {
    pub fn of(bytes: &[u8]) -> Self {
        Self { sha256: hex::encode(Sha256::digest(bytes)) }
    }
}

/// City ids that have a shard, sorted ascending, with per-shard counts and hashes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    city_ids: Vec<String>,
    #[serde(default)]
    counts: BTreeMap<String, usize>,
    #[serde(default)]
    files: BTreeMap<String, FileHash>,
}

impl Manifest {
    pub(crate) fn new(counts: BTreeMap<String, usize>, files: BTreeMap<String, FileHash>) -> Self {
        Self { city_ids: counts.keys().cloned().collect(), counts, files }
    }

    #[inline] pub fn city_ids(&self) -> &[String] { &self.city_ids }

    /// Whether `city_id` has a shard. `city_ids` is sorted, so this is a binary search.
    pub fn contains(&self, city_id: &str) -> bool {
        self.city_ids.binary_search_by(|id| id.as_str().cmp(city_id)).is_ok()
    }

    /// Number of points in the shard for `city_id`, if recorded.
    pub fn count(&self, city_id: &str) -> Option<usize> {
        self.counts.get(city_id).copied()
    }

    #[inline] pub fn files(&self) -> &BTreeMap<String, FileHash> { &self.files }

    /// Read the manifest from a pack. `Ok(None)` when the pack has none.
    pub fn read_from_pack(src: &dyn PackSource) -> Result<Option<Self>> {
        let Some(bytes) = src.fetch(MANIFEST_FILE)
            .with_context(|| format!("[pack::manifest] Failed to read {MANIFEST_FILE}"))? else {
            return Ok(None);
        };
        let mut manifest: Manifest = read_json_bytes(&bytes)
            .with_context(|| format!("[pack::manifest] Failed to parse {MANIFEST_FILE}"))?;
        manifest.city_ids.sort_unstable();
        manifest.city_ids.dedup();
        Ok(Some(manifest))
    }
}
