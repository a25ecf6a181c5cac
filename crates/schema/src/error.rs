use thiserror::Error;

/// An entity name that does not match any known collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity type: {0}")]
pub struct UnknownEntity(pub String);
