//! Error taxonomy for backend calls.

use bistro_schema::{DecodeError, EntityType, FieldErrors};
use thiserror::Error;

/// Failure of a fetch or mutation.
///
/// Every variant is recoverable at the page boundary; none is fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
	/// Transport failure, no response received.
	#[error("network error: {0}")]
	Network(String),

	/// Non-2xx response without field detail.
	#[error("server responded with status {status}: {body}")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Response body, possibly empty.
		body: String,
	},

	/// Single-record request for a missing identifier.
	#[error("{entity} {id} not found")]
	NotFound {
		/// Entity that was requested.
		entity: EntityType,
		/// Missing identifier.
		id: String,
	},

	/// Per-field messages, from the server or the local schema.
	#[error("validation failed: {}", summarize(.0))]
	Validation(FieldErrors),

	/// Response body does not match the entity schema.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}

impl ApiError {
	/// Field messages for validation failures.
	pub const fn field_errors(&self) -> Option<&FieldErrors> {
		match self {
			Self::Validation(errors) => Some(errors),
			_ => None,
		}
	}

	/// True when the requested record does not exist.
	pub const fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}

fn summarize(errors: &FieldErrors) -> String {
	errors
		.iter()
		.map(|(field, message)| format!("{field}: {message}"))
		.collect::<Vec<_>>()
		.join("; ")
}

/// Result type for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;
