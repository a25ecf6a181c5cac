//! JSON wire format for records.
//!
//! Records travel as flat JSON objects. Dates are ISO-8601 strings, relation
//! fields are the referenced identifier as a string. Decoding needs the
//! schema because a JSON string alone does not say whether it is text or a
//! date.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::catalog::EntitySchema;
use crate::field::FieldKind;
use crate::record::{FieldValues, ID_FIELD, Record};
use crate::value::{FieldValue, parse_date};

/// Response body that does not match the entity schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	/// Expected a JSON object for a single record.
	#[error("expected a JSON object for a {entity} record")]
	NotAnObject {
		/// Entity path.
		entity: &'static str,
	},
	/// Expected a JSON array for a record list.
	#[error("expected a JSON array of {entity} records")]
	NotAnArray {
		/// Entity path.
		entity: &'static str,
	},
	/// The record has no usable `id`.
	#[error("{entity} record has no id")]
	MissingId {
		/// Entity path.
		entity: &'static str,
	},
	/// The body is not JSON at all.
	#[error("malformed {entity} response: {reason}")]
	Malformed {
		/// Entity path.
		entity: &'static str,
		/// Parser message.
		reason: String,
	},
	/// A field value does not fit its declared kind.
	#[error("field {field} of {entity}: expected {expected}")]
	Mismatch {
		/// Entity path.
		entity: &'static str,
		/// Field name.
		field: String,
		/// Expected wire shape.
		expected: &'static str,
	},
}

impl EntitySchema {
	/// Decodes one record.
	///
	/// Fields outside the schema are kept with a best-effort scalar reading;
	/// nested arrays and objects are dropped.
	pub fn decode_record(&self, body: &Value) -> Result<Record, DecodeError> {
		let entity = self.entity.path();
		let object = body.as_object().ok_or(DecodeError::NotAnObject { entity })?;
		let id = match object.get(ID_FIELD) {
			Some(Value::String(id)) if !id.is_empty() => id.clone(),
			Some(Value::Number(id)) => id.to_string(),
			_ => return Err(DecodeError::MissingId { entity }),
		};

		let mut record = Record::new(id);
		for (name, raw) in object {
			if name == ID_FIELD {
				continue;
			}
			let value = match self.field(name) {
				Some(field) => decode_value(field.kind, raw).ok_or_else(|| DecodeError::Mismatch {
					entity,
					field: name.clone(),
					expected: wire_shape(field.kind),
				})?,
				None => match untyped_value(raw) {
					Some(value) => value,
					None => continue,
				},
			};
			record.set(name.clone(), value);
		}
		Ok(record)
	}

	/// Decodes a list response.
	pub fn decode_list(&self, body: &Value) -> Result<Vec<Record>, DecodeError> {
		let entity = self.entity.path();
		body.as_array()
			.ok_or(DecodeError::NotAnArray { entity })?
			.iter()
			.map(|item| self.decode_record(item))
			.collect()
	}

	/// Encodes form values as a request body. The identifier is never sent.
	pub fn encode_values(&self, values: &FieldValues) -> Value {
		let body: Map<String, Value> = values
			.iter()
			.filter(|(name, _)| name.as_str() != ID_FIELD)
			.map(|(name, value)| (name.clone(), value.to_json()))
			.collect();
		Value::Object(body)
	}
}

fn decode_value(kind: FieldKind, raw: &Value) -> Option<FieldValue> {
	if raw.is_null() {
		return Some(FieldValue::Null);
	}
	match kind {
		FieldKind::Text => match raw {
			Value::String(text) => Some(FieldValue::Text(text.clone())),
			Value::Number(n) => Some(FieldValue::Text(n.to_string())),
			_ => None,
		},
		FieldKind::Relation(_) => match raw {
			Value::String(id) => Some(FieldValue::Text(id.clone())),
			Value::Number(id) => Some(FieldValue::Text(id.to_string())),
			_ => None,
		},
		FieldKind::Integer => match raw {
			Value::Number(n) => n
				.as_i64()
				.map(FieldValue::Integer)
				.or_else(|| n.as_f64().map(FieldValue::Number)),
			Value::String(text) => text.trim().parse().ok().map(FieldValue::Integer),
			_ => None,
		},
		FieldKind::Number => match raw {
			Value::Number(n) => n.as_f64().map(FieldValue::Number),
			Value::String(text) => text.trim().parse().ok().map(FieldValue::Number),
			_ => None,
		},
		FieldKind::Bool => raw.as_bool().map(FieldValue::Bool),
		FieldKind::Date => raw.as_str().and_then(parse_date).map(FieldValue::Date),
	}
}

fn untyped_value(raw: &Value) -> Option<FieldValue> {
	match raw {
		Value::Null => Some(FieldValue::Null),
		Value::Bool(b) => Some(FieldValue::Bool(*b)),
		Value::Number(n) => n
			.as_i64()
			.map(FieldValue::Integer)
			.or_else(|| n.as_f64().map(FieldValue::Number)),
		Value::String(text) => Some(FieldValue::Text(text.clone())),
		Value::Array(_) | Value::Object(_) => None,
	}
}

const fn wire_shape(kind: FieldKind) -> &'static str {
	match kind {
		FieldKind::Text => "a string",
		FieldKind::Relation(_) => "an identifier",
		FieldKind::Integer => "an integer",
		FieldKind::Number => "a number",
		FieldKind::Bool => "a boolean",
		FieldKind::Date => "an ISO-8601 date",
	}
}
