//! Error type for shard loads.

use std::fmt;

/// A shard could not be loaded. "City has no shard" is not an error; it loads as an empty set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Storage or transport failure; retrying may succeed.
    Fetch { city_id: String, message: String },

    /// The shard was found but is not a valid point array.
    Parse { city_id: String, message: String },
}

impl LoadError {
    pub fn city_id(&self) -> &str {
        match self {
            LoadError::Fetch { city_id, .. } | LoadError::Parse { city_id, .. } => city_id,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch { city_id, message } => {
                write!(f, "failed to fetch points for city {}: {}", city_id, message)
            }
            LoadError::Parse { city_id, message } => {
                write!(f, "invalid points shard for city {}: {}", city_id, message)
            }
        }
    }
}

impl std::error::Error for LoadError {}
