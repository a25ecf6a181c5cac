//! Render-ready view models. Pages produce them; front-ends draw them.

use bistro_forms::RelationOption;
use bistro_schema::{EntityType, FieldKind, FieldValue};

/// One form field as it should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
	/// Field name, as sent to the backend.
	pub name: &'static str,
	/// Human label.
	pub label: &'static str,
	/// Input kind.
	pub kind: FieldKind,
	/// Marked as required.
	pub required: bool,
	/// Current value as editable text.
	pub value: String,
	/// Message shown next to the field.
	pub error: Option<String>,
	/// Options for relation fields, selection included.
	pub options: Option<Vec<RelationOption>>,
	/// Inline error of the last failed option query.
	pub options_error: Option<String>,
	/// Option query in flight.
	pub options_loading: bool,
}

/// A create or edit form as it should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
	/// Entity the form creates or edits.
	pub entity: EntityType,
	/// Page heading.
	pub title: String,
	/// Every schema field in schema order.
	pub fields: Vec<FieldView>,
	/// Submit in flight; the submit control is disabled.
	pub submitting: bool,
	/// No local validation errors.
	pub valid: bool,
	/// Network or server failure of the last submit or reload.
	pub banner: Option<String>,
}

impl FormView {
	/// Field by name.
	pub fn field(&self, name: &str) -> Option<&FieldView> {
		self.fields.iter().find(|field| field.name == name)
	}
}

/// Editable text for a value; dates as `YYYY-MM-DD`.
pub(crate) fn input_text(value: &FieldValue) -> String {
	match value {
		FieldValue::Date(date) => date.format("%Y-%m-%d").to_string(),
		other => other.to_string(),
	}
}
