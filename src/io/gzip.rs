use std::io::Read;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

/// Decompress a whole gzip stream (concatenated members included).
pub(crate) fn decompress_gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(4));
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut out)
        .context("[io::gzip] Failed to decompress gzip stream")?;
    Ok(out)
}
