//! JSON snapshot codec for cached entities.
//!
//! Cache values are plain JSON so they can be inspected with `redis-cli`.

use thiserror::Error;

use crate::blog::Entity;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes an entity snapshot to JSON bytes.
pub fn serialize_entity<E: Entity>(entity: &E) -> Result<Vec<u8>> {
    serde_json::to_vec(entity).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to an entity snapshot.
pub fn deserialize_entity<E: Entity>(bytes: &[u8]) -> Result<E> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
