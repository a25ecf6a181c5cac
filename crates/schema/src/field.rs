use crate::entity::EntityType;
use crate::validate::Rule;

/// Value kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	/// Free text.
	Text,
	/// Whole number.
	Integer,
	/// Any number.
	Number,
	/// Toggle.
	Bool,
	/// Calendar date, held as a UTC instant at midnight.
	Date,
	/// Identifier of a record of another entity type.
	Relation(EntityType),
}

impl FieldKind {
	/// Shape rule every non-empty value of this kind must satisfy.
	pub const fn shape_rule(self) -> Rule {
		match self {
			Self::Text | Self::Relation(_) => Rule::Text,
			Self::Integer => Rule::Integer,
			Self::Number => Rule::Number,
			Self::Bool => Rule::Bool,
			Self::Date => Rule::Date,
		}
	}

	/// Referenced entity for relation fields.
	pub const fn target(self) -> Option<EntityType> {
		match self {
			Self::Relation(entity) => Some(entity),
			_ => None,
		}
	}
}

/// Static metadata for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
	/// Wire and form key.
	pub name: &'static str,
	/// Label shown next to the input.
	pub label: &'static str,
	/// Value kind.
	pub kind: FieldKind,
	/// Whether an empty value fails validation.
	pub required: bool,
}

impl FieldDescriptor {
	/// Optional field of the given kind.
	pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
		Self {
			name,
			label,
			kind,
			required: false,
		}
	}

	/// Optional text field.
	pub const fn text(name: &'static str, label: &'static str) -> Self {
		Self::new(name, label, FieldKind::Text)
	}

	/// Optional integer field.
	pub const fn integer(name: &'static str, label: &'static str) -> Self {
		Self::new(name, label, FieldKind::Integer)
	}

	/// Optional date field.
	pub const fn date(name: &'static str, label: &'static str) -> Self {
		Self::new(name, label, FieldKind::Date)
	}

	/// Optional relation field pointing at `target`.
	pub const fn relation(name: &'static str, label: &'static str, target: EntityType) -> Self {
		Self::new(name, label, FieldKind::Relation(target))
	}

	/// Marks the field as required.
	pub const fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Declarative rules applied to this field, in evaluation order.
	pub fn rules(&self) -> impl Iterator<Item = Rule> + use<> {
		self.required
			.then_some(Rule::Required)
			.into_iter()
			.chain(std::iter::once(self.kind.shape_rule()))
	}
}
