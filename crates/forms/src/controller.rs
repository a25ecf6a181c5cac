//! Form state and submit lifecycle.
//!
//! A [`FormController`] owns the field values of one create or edit form.
//! Local validation runs synchronously on every mutation, so
//! [`is_valid`](FormController::is_valid) is never stale. Server-side field
//! messages from a failed submit are kept apart from local ones and do not
//! affect validity; editing a field clears its server message.

use std::collections::HashSet;
use std::future::Future;

use bistro_client::ApiError;
use bistro_schema::validate::validate_field;
use bistro_schema::{EntitySchema, FieldErrors, FieldValue, FieldValues};

use crate::error::SubmitError;

/// Form-level lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
	/// Accepting edits; no submit in flight.
	#[default]
	Editing,
	/// Action in flight.
	Submitting,
	/// Last submit succeeded; the form was reset.
	Submitted,
	/// Last submit failed; values were kept.
	SubmitFailed,
}

/// Proof that a submit was started. Carries the values handed to the action.
#[derive(Debug)]
#[must_use = "a started submit must be finished"]
pub struct SubmitTicket {
	values: FieldValues,
}

impl SubmitTicket {
	/// Full field-value mapping to send.
	pub fn values(&self) -> &FieldValues {
		&self.values
	}
}

/// Field values, validation and submit state for one entity form.
#[derive(Debug, Clone)]
pub struct FormController {
	schema: &'static EntitySchema,
	initial: FieldValues,
	values: FieldValues,
	errors: FieldErrors,
	server_errors: FieldErrors,
	touched: HashSet<String>,
	submit_attempted: bool,
	phase: FormPhase,
	last_error: Option<ApiError>,
}

impl FormController {
	/// Form over `schema` starting from `initial`; every field is validated
	/// up front.
	pub fn new(schema: &'static EntitySchema, initial: FieldValues) -> Self {
		let errors = schema.validate(&initial);
		Self {
			schema,
			values: initial.clone(),
			initial,
			errors,
			server_errors: FieldErrors::new(),
			touched: HashSet::new(),
			submit_attempted: false,
			phase: FormPhase::Editing,
			last_error: None,
		}
	}

	/// Schema the form validates against.
	pub fn schema(&self) -> &'static EntitySchema {
		self.schema
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> FormPhase {
		self.phase
	}

	/// True while a submit action is in flight.
	pub fn is_submitting(&self) -> bool {
		self.phase == FormPhase::Submitting
	}

	/// Sets one field, re-validates only that field and marks it touched.
	///
	/// Fields unknown to the schema are stored but never validated.
	pub fn set_value(&mut self, field: &str, value: impl Into<FieldValue>) {
		let value = value.into();
		if let Some(descriptor) = self.schema.field(field) {
			match validate_field(descriptor, Some(&value)) {
				Some(message) => {
					self.errors.insert(field.to_string(), message);
				}
				None => {
					self.errors.shift_remove(field);
				}
			}
		}
		self.values.insert(field.to_string(), value);
		self.server_errors.shift_remove(field);
		self.touched.insert(field.to_string());
		if matches!(self.phase, FormPhase::Submitted | FormPhase::SubmitFailed) {
			self.phase = FormPhase::Editing;
		}
	}

	/// Current value of a field.
	pub fn value(&self, field: &str) -> Option<&FieldValue> {
		self.values.get(field)
	}

	/// Every current value, schema fields first in schema order.
	pub fn values(&self) -> &FieldValues {
		&self.values
	}

	/// True when no field has a local validation error.
	pub fn is_valid(&self) -> bool {
		self.errors.is_empty()
	}

	/// True when any value differs from the initial values.
	pub fn is_dirty(&self) -> bool {
		self.values != self.initial
	}

	/// True once the field was set since the last reset.
	pub fn is_touched(&self, field: &str) -> bool {
		self.touched.contains(field)
	}

	/// Current message for a field: the local one, else the server's.
	pub fn error(&self, field: &str) -> Option<&str> {
		self.errors
			.get(field)
			.or_else(|| self.server_errors.get(field))
			.map(String::as_str)
	}

	/// Message to show next to a field: hidden until the field was touched
	/// or a submit was attempted.
	pub fn visible_error(&self, field: &str) -> Option<&str> {
		if self.submit_attempted || self.is_touched(field) {
			self.error(field)
		} else {
			None
		}
	}

	/// Local validation errors.
	pub fn errors(&self) -> &FieldErrors {
		&self.errors
	}

	/// Error of the last failed submit, kept for display.
	pub fn last_error(&self) -> Option<&ApiError> {
		self.last_error.as_ref()
	}

	/// Replaces both initial and current values, as after a fresh fetch.
	pub fn reinitialize(&mut self, values: FieldValues) {
		self.initial = values;
		self.phase = FormPhase::Editing;
		self.last_error = None;
		self.restore();
	}

	/// Returns every field to its initial value and clears all errors.
	pub fn reset(&mut self) {
		self.restore();
	}

	fn restore(&mut self) {
		self.values = self.initial.clone();
		self.errors = self.schema.validate(&self.values);
		self.server_errors.clear();
		self.touched.clear();
		self.submit_attempted = false;
	}

	/// Starts a submit: rejects a second concurrent submit and an invalid
	/// form, otherwise enters [`FormPhase::Submitting`].
	pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitError> {
		if self.is_submitting() {
			tracing::debug!(entity = %self.schema.entity, "form.submit_in_progress");
			return Err(SubmitError::InProgress);
		}
		self.submit_attempted = true;
		if !self.is_valid() {
			tracing::debug!(entity = %self.schema.entity, invalid = self.errors.len(), "form.submit_rejected");
			return Err(SubmitError::Invalid(self.errors.clone()));
		}
		self.phase = FormPhase::Submitting;
		self.last_error = None;
		Ok(SubmitTicket {
			values: self.values.clone(),
		})
	}

	/// Applies the action outcome of a started submit.
	///
	/// Success resets the form. Failure keeps the values, retains the error
	/// and maps server field messages onto their fields.
	pub fn finish_submit<T>(&mut self, _ticket: SubmitTicket, outcome: Result<T, ApiError>) -> Result<T, SubmitError> {
		match outcome {
			Ok(output) => {
				tracing::debug!(entity = %self.schema.entity, "form.submitted");
				self.restore();
				self.phase = FormPhase::Submitted;
				Ok(output)
			}
			Err(error) => {
				tracing::warn!(entity = %self.schema.entity, %error, "form.submit_failed");
				self.phase = FormPhase::SubmitFailed;
				if let Some(errors) = error.field_errors() {
					self.server_errors = errors.clone();
				}
				self.last_error = Some(error.clone());
				Err(SubmitError::Action(error))
			}
		}
	}

	/// Validates, then runs `action` with the full value mapping.
	pub async fn submit<T, F, Fut>(&mut self, action: F) -> Result<T, SubmitError>
	where
		F: FnOnce(FieldValues) -> Fut,
		Fut: Future<Output = Result<T, ApiError>>,
	{
		let ticket = self.begin_submit()?;
		let outcome = action(ticket.values().clone()).await;
		self.finish_submit(ticket, outcome)
	}
}
