//! Declarative field validation.
//!
//! Each [`FieldDescriptor`] expands to an ordered list of [`Rule`]s
//! (presence first, then shape). Empty values skip shape checks so an
//! optional field may stay blank. Fields the schema does not know are never
//! validated.

use indexmap::IndexMap;

use crate::catalog::EntitySchema;
use crate::field::FieldDescriptor;
use crate::record::FieldValues;
use crate::value::FieldValue;

/// Field name to message.
pub type FieldErrors = IndexMap<String, String>;

/// One validation constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
	/// Value must be present and, for text, non-blank.
	Required,
	/// Value must be text.
	Text,
	/// Value must be a whole number.
	Integer,
	/// Value must be numeric.
	Number,
	/// Value must be a boolean.
	Bool,
	/// Value must be a date.
	Date,
}

impl Rule {
	/// Checks `value` of field `name`, returning the message on failure.
	pub fn check(self, name: &str, value: &FieldValue) -> Result<(), String> {
		if self == Self::Required {
			return if value.is_empty() {
				Err(format!("{name} is a required field"))
			} else {
				Ok(())
			};
		}
		if value.is_empty() {
			return Ok(());
		}
		let ok = match self {
			Self::Required => true,
			Self::Text => matches!(value, FieldValue::Text(_)),
			Self::Integer => match value {
				FieldValue::Integer(_) => true,
				FieldValue::Number(n) => n.is_finite() && n.fract() == 0.0,
				_ => false,
			},
			Self::Number => match value {
				FieldValue::Integer(_) => true,
				FieldValue::Number(n) => n.is_finite(),
				_ => false,
			},
			Self::Bool => matches!(value, FieldValue::Bool(_)),
			Self::Date => matches!(value, FieldValue::Date(_)),
		};
		if ok { Ok(()) } else { Err(format!("{name} must be {}", self.noun())) }
	}

	const fn noun(self) -> &'static str {
		match self {
			Self::Required => "present",
			Self::Text => "a string",
			Self::Integer => "an integer",
			Self::Number => "a number",
			Self::Bool => "a boolean",
			Self::Date => "a date",
		}
	}
}

/// First failing rule message for one field; a missing value counts as `Null`.
pub fn validate_field(field: &FieldDescriptor, value: Option<&FieldValue>) -> Option<String> {
	let value = value.unwrap_or(&FieldValue::Null);
	field.rules().find_map(|rule| rule.check(field.name, value).err())
}

impl EntitySchema {
	/// Errors for every schema field in `values`, in schema order.
	pub fn validate(&self, values: &FieldValues) -> FieldErrors {
		self.fields
			.iter()
			.filter_map(|field| validate_field(field, values.get(field.name)).map(|message| (field.name.to_string(), message)))
			.collect()
	}
}
