use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::field::FieldKind;

/// Scalar value held by a record field or form field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
	/// Absent value.
	#[default]
	Null,
	/// Text, also used for relation identifiers.
	Text(String),
	/// Whole number.
	Integer(i64),
	/// Fractional number.
	Number(f64),
	/// Toggle.
	Bool(bool),
	/// Date as a UTC instant.
	Date(DateTime<Utc>),
}

/// Input text that cannot be read as the requested field kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{input:?} is not a valid {expected}")]
pub struct InputError {
	/// Raw input.
	pub input: String,
	/// Kind that was expected.
	pub expected: &'static str,
}

impl FieldValue {
	/// Text value.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(value.into())
	}

	/// True for `Null` and blank text.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Null => true,
			Self::Text(text) => text.trim().is_empty(),
			_ => false,
		}
	}

	/// Borrowed text, if this is a text value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Date, if this is a date value.
	pub const fn as_date(&self) -> Option<DateTime<Utc>> {
		match self {
			Self::Date(date) => Some(*date),
			_ => None,
		}
	}

	/// Default value a create form starts from for `kind`.
	pub fn default_for(kind: FieldKind, today: DateTime<Utc>) -> Self {
		match kind {
			FieldKind::Text | FieldKind::Relation(_) => Self::Text(String::new()),
			FieldKind::Integer => Self::Integer(0),
			FieldKind::Number => Self::Number(0.0),
			FieldKind::Bool => Self::Bool(false),
			FieldKind::Date => Self::Date(today),
		}
	}

	/// Reads user input as a value of `kind`.
	///
	/// Blank input yields `Null` for every kind except text, which keeps the
	/// empty string so required-presence checks can flag it.
	pub fn parse_input(kind: FieldKind, input: &str) -> Result<Self, InputError> {
		let trimmed = input.trim();
		let invalid = |expected| InputError {
			input: input.to_string(),
			expected,
		};
		match kind {
			FieldKind::Text | FieldKind::Relation(_) => Ok(Self::Text(input.to_string())),
			_ if trimmed.is_empty() => Ok(Self::Null),
			FieldKind::Integer => trimmed.parse().map(Self::Integer).map_err(|_| invalid("integer")),
			FieldKind::Number => trimmed.parse().map(Self::Number).map_err(|_| invalid("number")),
			FieldKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
				"true" | "yes" | "on" | "1" => Ok(Self::Bool(true)),
				"false" | "no" | "off" | "0" => Ok(Self::Bool(false)),
				_ => Err(invalid("boolean")),
			},
			FieldKind::Date => parse_date(trimmed).map(Self::Date).ok_or_else(|| invalid("date")),
		}
	}

	/// Wire representation.
	pub fn to_json(&self) -> Value {
		match self {
			Self::Null => Value::Null,
			Self::Text(text) => Value::String(text.clone()),
			Self::Integer(n) => Value::from(*n),
			Self::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
			Self::Bool(b) => Value::Bool(*b),
			Self::Date(date) => Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
		}
	}
}

impl fmt::Display for FieldValue {
	/// Table cell rendering; dates read like `Fri Oct 16 2026`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => Ok(()),
			Self::Text(text) => f.write_str(text),
			Self::Integer(n) => write!(f, "{n}"),
			Self::Number(n) => write!(f, "{n}"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Date(date) => write!(f, "{}", date.format("%a %b %d %Y")),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<DateTime<Utc>> for FieldValue {
	fn from(value: DateTime<Utc>) -> Self {
		Self::Date(value)
	}
}

/// `date` at 00:00 UTC.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
	date.and_time(NaiveTime::MIN).and_utc()
}

/// Today's date at 00:00 UTC.
pub fn today() -> DateTime<Utc> {
	midnight(Utc::now().date_naive())
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
	if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
		return Some(instant.with_timezone(&Utc));
	}
	NaiveDate::parse_from_str(input, "%Y-%m-%d").ok().map(midnight)
}
