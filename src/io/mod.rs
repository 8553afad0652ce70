//! IO module for format-specific reading and writing operations.
//!
//! - `gzip` - decompression of the tabular point sources
//! - `csv` - point rows from delimited text
//! - `geojson` - boundary features
//! - `json` - pack artifacts (cities, shards, manifest)

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod gzip;
pub(crate) mod json;
