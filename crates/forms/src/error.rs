use bistro_client::ApiError;
use bistro_schema::FieldErrors;
use thiserror::Error;

/// Why a submit did not complete.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
	/// Local validation failed; the action was not called.
	#[error("form has {} invalid field(s)", .0.len())]
	Invalid(FieldErrors),

	/// Another submit on the same form is still in flight.
	#[error("a submit is already in progress")]
	InProgress,

	/// The action ran and failed.
	#[error(transparent)]
	Action(#[from] ApiError),
}
