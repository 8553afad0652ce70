use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Create the directory if it doesn't exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("[common::fs] Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("[common::fs] Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Error unless the directory already exists.
pub(crate) fn require_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("[common::fs] Directory does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("[common::fs] Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Error unless `path` is an existing regular file.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("[common::fs] Missing input file: {}", path.display());
    }
    Ok(())
}

/// Files directly inside `dir` whose name ends with `suffix`, sorted by file name.
pub(crate) fn list_files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("[common::fs] Failed to list {}", dir.display()))?;
        if !entry.file_type().is_file() { continue }
        if entry.file_name().to_str().is_some_and(|name| name.ends_with(suffix)) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Write-then-rename wrapper for atomic outputs.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temp file next to `target`, creating parent directories as needed.
    pub(crate) fn open(target: &Path) -> Result<Self> {
        let parent = target.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("[common::fs] create dir {}", parent.display()))?;
        let tmp = NamedTempFile::new_in(parent).context("[common::fs] create temp file")?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Flush, fsync and move the temp file over the target.
    pub(crate) fn finalize(mut self) -> Result<()> {
        self.tmp.flush().context("[common::fs] flush temp file")?;
        self.tmp.as_file().sync_all().ok(); // best-effort fsync file
        self.tmp.persist(&self.target)
            .with_context(|| format!("[common::fs] rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }
    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

/// Atomically replace `target` with `bytes`.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let mut pending = PendingWrite::open(target)?;
    pending.write_all(bytes)
        .with_context(|| format!("[common::fs] write {}", target.display()))?;
    pending.finalize()
}
