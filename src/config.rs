use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::io::json::read_json_bytes;

/// Settings for the offline conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Directory holding the boundary file and the tabular sources.
    pub input_dir: PathBuf,
    /// Pack root; receives `cities.json` and `points/`.
    pub out_dir: PathBuf,
    /// Boundary file name, relative to `input_dir`.
    pub boundary_file: String,
    /// Every file in `input_dir` ending with this suffix is a tabular source.
    pub source_suffix: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("public/data"),
            out_dir: PathBuf::from("public/data"),
            boundary_file: "cbsas_2017.geojson".to_string(),
            source_suffix: ".csv.gz".to_string(),
        }
    }
}

impl ConvertConfig {
    pub fn new(input_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self { input_dir: input_dir.into(), out_dir: out_dir.into(), ..Self::default() }
    }

    pub fn boundary_path(&self) -> PathBuf {
        self.input_dir.join(&self.boundary_file)
    }

    /// Load a config from JSON; fields left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        read_json_bytes(&bytes)
            .with_context(|| format!("[config] Failed to parse config file: {}", path.display()))
    }
}

/// Settings for an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on points handed to the renderer per frame.
    pub max_points: usize,
}

impl Default for SessionConfig {
    fn default() -> Self { Self { max_points: 50_000 } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("convert.json");
        std::fs::write(&path, r#"{ "input_dir": "raw", "boundary_file": "cbsa.geojson" }"#).unwrap();

        let config = ConvertConfig::from_json_file(&path).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("raw"));
        assert_eq!(config.boundary_path(), PathBuf::from("raw/cbsa.geojson"));
        assert_eq!(config.source_suffix, ".csv.gz");
        assert_eq!(config.out_dir, PathBuf::from("public/data"));
    }
}
