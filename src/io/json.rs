use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Serialize a pack artifact to compact JSON bytes.
pub(crate) fn write_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).context("[io::json] Failed to serialize JSON")
}

/// Deserialize a pack artifact from JSON bytes.
pub(crate) fn read_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).context("[io::json] Failed to parse JSON")
}
