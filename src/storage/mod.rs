//! Plan and Parcel Storage
//!
//! Persists generated regeneration plans and registered land parcels to
//! Sled DB. Plans use big-endian id keys so iteration is chronological.

mod plans;

pub use plans::PlanStorage;

/// Error type for storage operations
#[derive(Debug)]
pub enum StorageError {
    DatabaseError(String),
    SerializationError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            StorageError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}
