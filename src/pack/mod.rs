//! Pack layout: `cities.json`, `points/<cityId>.json` and `points/manifest.json`.

mod build;
mod manifest;
mod partition;
mod source;

pub use build::{build_pack, BuildReport, SourceReport};
pub use manifest::{FileHash, Manifest};
pub use partition::Partition;
pub use source::{DiskPack, MemPack, PackSink, PackSource};

#[cfg(feature = "download")]
pub use source::HttpPack;

/// City index artifact.
pub const CITIES_FILE: &str = "cities.json";

/// Directory holding the shards and their manifest.
pub(crate) const SHARD_DIR: &str = "points";

/// Manifest of city ids that have a shard.
pub const MANIFEST_FILE: &str = "points/manifest.json";

/// Pack-relative path of the shard for `city_id`.
pub fn shard_path(city_id: &str) -> String {
    format!("{SHARD_DIR}/{city_id}.json")
}

/// Whether `city_id` can name a shard file without escaping `points/`.
pub(crate) fn is_shard_key(city_id: &str) -> bool {
    !city_id.is_empty()
        && !city_id.starts_with('.')
        && !city_id.contains(['/', '\\'])
        && city_id != "manifest"
}
