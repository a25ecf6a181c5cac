use bistro_forms::SubmitError;
use bistro_schema::InputError;
use thiserror::Error;

/// Failure of a page-level user action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
	/// The page has no form to act on (still loading or the fetch failed).
	#[error("the form is not available")]
	NotReady,

	/// The field has no relation selector.
	#[error("{0} is not a relation field")]
	NotARelation(String),

	/// Typed input could not be read as the field's kind.
	#[error("{field}: {source}")]
	Input {
		/// Field the input was meant for.
		field: String,
		/// Parse failure.
		source: InputError,
	},

	/// Submit was rejected or the action failed.
	#[error(transparent)]
	Submit(#[from] SubmitError),
}
