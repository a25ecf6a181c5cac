use indexmap::IndexMap;

use crate::value::FieldValue;

/// Name of the identifier field every record carries.
pub const ID_FIELD: &str = "id";

/// Ordered field name to value mapping.
pub type FieldValues = IndexMap<String, FieldValue>;

/// One backend record: an identifier plus its scalar fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
	id: String,
	fields: FieldValues,
}

impl Record {
	/// Creates an empty record with the given identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			fields: FieldValues::new(),
		}
	}

	/// Builder-style field setter.
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		self.set(name, value);
		self
	}

	/// Sets a field, ignoring attempts to overwrite the identifier.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
		let name = name.into();
		if name != ID_FIELD {
			self.fields.insert(name, value.into());
		}
	}

	/// Record identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Field value by name; `id` resolves to the identifier.
	pub fn get(&self, name: &str) -> Option<FieldValue> {
		if name == ID_FIELD {
			return Some(FieldValue::Text(self.id.clone()));
		}
		self.fields.get(name).cloned()
	}

	/// Non-identifier fields in wire order.
	pub fn fields(&self) -> &FieldValues {
		&self.fields
	}
}
