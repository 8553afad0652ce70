use tracing::debug;

use crate::io::json::read_json_bytes;
use crate::pack::{shard_path, Manifest, PackSource};
use crate::point::Point;
use crate::session::LoadError;

/// Resolves city ids to point arrays from a pack.
pub struct ShardLoader<S> {
    source: S,
    manifest: Option<Manifest>,
}

impl<S: PackSource> ShardLoader<S> {
    /// Loader that requests every id it is asked for.
    pub fn new(source: S) -> Self {
        Self { source, manifest: None }
    }

    /// Loader that consults the pack manifest first, skipping requests for ids
    /// without a shard. A pack without a manifest behaves like `new`.
    pub fn with_manifest(source: S) -> anyhow::Result<Self> {
        let manifest = Manifest::read_from_pack(&source)?;
        Ok(Self { source, manifest })
    }

    #[inline] pub fn source(&self) -> &S { &self.source }

    #[inline] pub fn manifest(&self) -> Option<&Manifest> { self.manifest.as_ref() }

    /// Fetch and decode the shard for `city_id`. A missing shard is an empty set.
    pub fn fetch(&self, city_id: &str) -> Result<Vec<Point>, LoadError> {
        if self.manifest.as_ref().is_some_and(|m| !m.contains(city_id)) {
            debug!(city = city_id, "[session::loader] not in manifest");
            return Ok(Vec::new());
        }

        let rel = shard_path(city_id);
        let bytes = self.source.fetch(&rel).map_err(|e| LoadError::Fetch {
            city_id: city_id.to_string(),
            message: format!("{e:#}"),
        })?;

        let Some(bytes) = bytes else {
            debug!(city = city_id, "[session::loader] no shard");
            return Ok(Vec::new());
        };

        read_json_bytes::<Vec<Point>>(&bytes).map_err(|e| LoadError::Parse {
            city_id: city_id.to_string(),
            message: format!("{e:#}"),
        })
    }
}
