//! Form state for the admin create and edit pages.
//!
//! * [`FormController`]: values, per-field errors, touched flags and the
//!   `editing → submitting → {submitted, submit-failed}` lifecycle
//! * [`RelationSelector`]: async option list bound to one relation field,
//!   where only the most recently issued query may apply its result

#![warn(missing_docs)]

mod controller;
mod error;
mod relation;
mod token;

pub use controller::{FormController, FormPhase, SubmitTicket};
pub use error::SubmitError;
pub use relation::{RelationOption, RelationSelector};
pub use token::{QueryClock, QueryToken};
