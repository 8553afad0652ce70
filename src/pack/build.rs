use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use tracing::info;

use crate::city::resolve_cities;
use crate::common::{ensure_dir_exists, list_files_with_suffix, require_dir_exists, require_file_exists};
use crate::config::ConvertConfig;
use crate::io::{csv::read_points_csv, geojson::read_boundary_bytes, gzip::decompress_gzip};
use crate::pack::{DiskPack, Manifest, Partition, MANIFEST_FILE, SHARD_DIR};
use crate::point::{NormalizeStats, Point};

/// Row counts for one tabular source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub file: String,
    pub stats: NormalizeStats,
}

/// Outcome of a conversion run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub sources: Vec<SourceReport>,
    pub cities: usize,
    pub unassigned: usize,
    pub manifest: Manifest,
}

impl BuildReport {
    /// Row counts summed over every source.
    pub fn totals(&self) -> NormalizeStats {
        let mut total = NormalizeStats::default();
        for source in &self.sources { total.merge(source.stats) }
        total
    }

    #[inline] pub fn shards(&self) -> usize { self.manifest.city_ids().len() }
}

fn read_source(path: &Path) -> Result<(Vec<Point>, NormalizeStats)> {
    let raw = fs::read(path)
        .with_context(|| format!("[pack::build] Failed to read {}", path.display()))?;
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let text = if gzipped {
        decompress_gzip(&raw).with_context(|| format!("[pack::build] Failed to decompress {}", path.display()))?
    } else {
        raw
    };
    read_points_csv(&text).with_context(|| format!("[pack::build] Failed to parse {}", path.display()))
}

/// Delete `points/*.json` files the freshly written manifest does not list.
fn remove_stale_shards(out_dir: &Path, manifest: &Manifest) -> Result<usize> {
    let points_dir = out_dir.join(SHARD_DIR);
    if !points_dir.is_dir() { return Ok(0) }

    let mut removed = 0;
    for path in list_files_with_suffix(&points_dir, ".json")? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        let rel = format!("{SHARD_DIR}/{name}");
        if rel == MANIFEST_FILE || manifest.files().contains_key(&rel) { continue }
        fs::remove_file(&path)
            .with_context(|| format!("[pack::build] Failed to remove stale shard {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}

/// End-to-end: boundary file + tabular sources → city index, shards and manifest.
///
/// Every input is read and normalized before anything is written, so a missing
/// or unreadable input aborts the run with no output.
pub fn build_pack(config: &ConvertConfig) -> Result<BuildReport> {
    require_dir_exists(&config.input_dir)?;
    let boundary_path = config.boundary_path();
    require_file_exists(&boundary_path).context("[pack::build] The boundary input is required")?;

    let sources = list_files_with_suffix(&config.input_dir, &config.source_suffix)?;
    ensure!(
        !sources.is_empty(),
        "[pack::build] No {} files found in {}",
        config.source_suffix,
        config.input_dir.display()
    );

    let mut points = Vec::new();
    let mut reports = Vec::with_capacity(sources.len());
    for path in &sources {
        let (source_points, stats) = read_source(path)?;
        let file = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        info!(source = %file, rows = stats.rows, kept = stats.kept, skipped = stats.skipped, "[pack::build] normalized source");
        points.extend(source_points);
        reports.push(SourceReport { file, stats });
    }

    let boundary = fs::read(&boundary_path)
        .with_context(|| format!("[pack::build] Failed to read {}", boundary_path.display()))?;
    let features = read_boundary_bytes(&boundary)
        .with_context(|| format!("[pack::build] Failed to parse {}", boundary_path.display()))?;
    let cities = resolve_cities(&features);
    info!(features = features.len(), cities = cities.len(), "[pack::build] resolved cities");

    let partition = Partition::new(points, cities);

    ensure_dir_exists(&config.out_dir)?;
    let manifest = partition.write_to(&mut DiskPack::new(&config.out_dir))?;
    let removed = remove_stale_shards(&config.out_dir, &manifest)?;
    if removed > 0 {
        info!(removed, "[pack::build] removed shards left over from an earlier run");
    }
    info!(
        shards = manifest.city_ids().len(),
        unassigned = partition.unassigned(),
        out = %config.out_dir.display(),
        "[pack::build] wrote pack"
    );

    Ok(BuildReport {
        sources: reports,
        cities: partition.cities().len(),
        unassigned: partition.unassigned(),
        manifest,
    })
}
