use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};

use crate::common::write_atomic;

/// Read-only access to pack files by pack-relative path, e.g.
/// "cities.json", "points/35620.json", "points/manifest.json".
pub trait PackSource: Send + Sync {
    fn get(&self, rel: &str) -> Result<Arc<[u8]>>;
    fn has(&self, rel: &str) -> bool;

    /// Like `get`, but a missing file is `Ok(None)` rather than an error.
    /// `Err` is reserved for storage or transport failures.
    fn fetch(&self, rel: &str) -> Result<Option<Arc<[u8]>>> {
        if !self.has(rel) { return Ok(None) }
        self.get(rel).map(Some)
    }
}

/// Write access to pack files by pack-relative path.
pub trait PackSink: Send + Sync {
    fn put(&mut self, rel: &str, bytes: &[u8]) -> Result<()>;
}

/// Directory-backed pack. Writes are atomic per file.
pub struct DiskPack {
    root: PathBuf,
}

impl DiskPack {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn full(&self, rel: &str) -> PathBuf { self.root.join(rel) }
}

impl PackSource for DiskPack {
    fn get(&self, rel: &str) -> Result<Arc<[u8]>> {
        let path = self.full(rel);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("[pack::source] Failed to read {}", path.display()))?;
        Ok(Arc::from(bytes))
    }

    fn has(&self, rel: &str) -> bool { self.full(rel).is_file() }

    fn fetch(&self, rel: &str) -> Result<Option<Arc<[u8]>>> {
        let path = self.full(rel);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(Arc::from(bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("[pack::source] Failed to read {}", path.display())),
        }
    }
}

impl PackSink for DiskPack {
    fn put(&mut self, rel: &str, bytes: &[u8]) -> Result<()> {
        write_atomic(&self.full(rel), bytes)
    }
}

/// Simple in-memory pack.
/// Keys are pack-relative paths, e.g. "points/35620.json".
#[derive(Default, Clone)]
pub struct MemPack {
    pub(crate) files: HashMap<String, Arc<[u8]>>,
}

impl MemPack {
    pub fn new(files: HashMap<String, Arc<[u8]>>) -> Self { Self { files } }

    /// Pack-relative paths currently stored, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.files.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl PackSource for MemPack {
    fn get(&self, rel: &str) -> Result<Arc<[u8]>> {
        self.files.get(rel).cloned()
            .ok_or_else(|| anyhow!("[pack::source] missing pack file: {rel}"))
    }

    fn has(&self, rel: &str) -> bool { self.files.contains_key(rel) }
}

impl PackSink for MemPack {
    fn put(&mut self, rel: &str, bytes: &[u8]) -> Result<()> {
        self.files.insert(rel.to_string(), Arc::from(bytes.to_vec()));
        Ok(())
    }
}

#[cfg(feature = "download")]
pub use http::HttpPack;

#[cfg(feature = "download")]
mod http {
    use std::{sync::Arc, time::Duration};

    use anyhow::{anyhow, Context, Result};
    use reqwest::{blocking::Client, redirect::Policy, StatusCode};

    use super::PackSource;

    /// Pack served over HTTP, e.g. the static `data/` directory of the map client.
    pub struct HttpPack {
        base_url: String,
        client: Client,
    }

    impl HttpPack {
        pub fn new(base_url: impl Into<String>) -> Result<Self> {
            let client = Client::builder()
                .user_agent(concat!("mixatlas/", env!("CARGO_PKG_VERSION")))
                .redirect(Policy::limited(10))
                .timeout(Duration::from_secs(30))
                .build()
                .context("[pack::source] Failed to build HTTP client")?;
            Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), client })
        }

        fn url(&self, rel: &str) -> String { format!("{}/{}", self.base_url, rel) }
    }

    impl PackSource for HttpPack {
        fn get(&self, rel: &str) -> Result<Arc<[u8]>> {
            self.fetch(rel)?.ok_or_else(|| anyhow!("[pack::source] missing pack file: {}", self.url(rel)))
        }

        fn has(&self, rel: &str) -> bool {
            self.client.head(self.url(rel)).send()
                .map(|resp| resp.status().is_success())
                .unwrap_or(false)
        }

        fn fetch(&self, rel: &str) -> Result<Option<Arc<[u8]>>> {
            let url = self.url(rel);
            let resp = self.client.get(&url).send()
                .with_context(|| format!("[pack::source] GET {url}"))?;
            if matches!(resp.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
                return Ok(None);
            }
            let bytes = resp.error_for_status()
                .with_context(|| format!("[pack::source] GET {url} returned error status"))?
                .bytes()
                .with_context(|| format!("[pack::source] GET {url} body"))?;
            Ok(Some(Arc::from(bytes.as_ref())))
        }
    }

}
