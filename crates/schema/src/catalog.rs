use chrono::{DateTime, Utc};

use crate::entity::EntityType;
use crate::field::{FieldDescriptor, FieldKind};
use crate::record::{FieldValues, ID_FIELD, Record};
use crate::value::FieldValue;

/// Ordered field list for one entity type.
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySchema {
	/// Entity the schema describes.
	pub entity: EntityType,
	/// Editable fields in form and column order, excluding `id`.
	pub fields: &'static [FieldDescriptor],
}

/// Fields tried in order when labelling a record in an option list.
const DISPLAY_FIELDS: [&str; 3] = ["name", "role", "status"];

impl EntitySchema {
	/// Descriptor by field name.
	pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
		self.fields.iter().find(|field| field.name == name)
	}

	/// Relation fields with their referenced entity.
	pub fn relations(&self) -> impl Iterator<Item = (&'static FieldDescriptor, EntityType)> + use<> {
		self.fields.iter().filter_map(|field| field.kind.target().map(|target| (field, target)))
	}

	/// List page columns: `id` followed by every field.
	pub fn columns(&self) -> Vec<&'static str> {
		std::iter::once(ID_FIELD).chain(self.fields.iter().map(|field| field.name)).collect()
	}

	/// Create-form defaults: empty text, zero numbers, `false`, and `today`
	/// for dates.
	pub fn defaults(&self, today: DateTime<Utc>) -> FieldValues {
		self.fields
			.iter()
			.map(|field| (field.name.to_string(), FieldValue::default_for(field.kind, today)))
			.collect()
	}

	/// Edit-form values taken from a fetched record; missing fields are `Null`.
	pub fn values_of(&self, record: &Record) -> FieldValues {
		self.fields
			.iter()
			.map(|field| (field.name.to_string(), record.get(field.name).unwrap_or_default()))
			.collect()
	}

	/// Human label for a record, used by relation option lists.
	pub fn label_of(&self, record: &Record) -> String {
		DISPLAY_FIELDS
			.iter()
			.filter(|name| self.field(name).is_some_and(|field| field.kind == FieldKind::Text))
			.filter_map(|name| record.get(name))
			.find(|value| !value.is_empty())
			.map_or_else(|| record.id().to_string(), |value| value.to_string())
	}
}

pub(crate) fn schema_for(entity: EntityType) -> &'static EntitySchema {
	match entity {
		EntityType::Feedbacks => &FEEDBACKS,
		EntityType::Menus => &MENUS,
		EntityType::MenuItems => &MENU_ITEMS,
		EntityType::OrderItems => &ORDER_ITEMS,
		EntityType::Orders => &ORDERS,
		EntityType::Reservations => &RESERVATIONS,
		EntityType::Restaurants => &RESTAURANTS,
		EntityType::Users => &USERS,
	}
}

const CREATED_AT: FieldDescriptor = FieldDescriptor::date("created_at", "Created at").required();
const UPDATED_AT: FieldDescriptor = FieldDescriptor::date("updated_at", "Updated at").required();

static FEEDBACKS: EntitySchema = EntitySchema {
	entity: EntityType::Feedbacks,
	fields: &[
		FieldDescriptor::integer("rating", "Rating").required(),
		FieldDescriptor::text("comment", "Comment"),
		CREATED_AT,
		UPDATED_AT,
		FieldDescriptor::relation("customer_id", "Users", EntityType::Users).required(),
		FieldDescriptor::relation("restaurant_id", "Restaurants", EntityType::Restaurants).required(),
	],
};

static MENUS: EntitySchema = EntitySchema {
	entity: EntityType::Menus,
	fields: &[
		FieldDescriptor::text("name", "Name").required(),
		FieldDescriptor::text("description", "Description"),
		CREATED_AT,
		UPDATED_AT,
		FieldDescriptor::relation("restaurant_id", "Restaurants", EntityType::Restaurants).required(),
	],
};

static MENU_ITEMS: EntitySchema = EntitySchema {
	entity: EntityType::MenuItems,
	fields: &[
		FieldDescriptor::text("name", "Name").required(),
		FieldDescriptor::text("description", "Description"),
		FieldDescriptor::integer("price", "Price").required(),
		CREATED_AT,
		UPDATED_AT,
		FieldDescriptor::relation("menu_id", "Menus", EntityType::Menus).required(),
	],
};

static ORDER_ITEMS: EntitySchema = EntitySchema {
	entity: EntityType::OrderItems,
	fields: &[
		FieldDescriptor::integer("quantity", "Quantity").required(),
		CREATED_AT,
		UPDATED_AT,
		FieldDescriptor::relation("order_id", "Orders", EntityType::Orders).required(),
		FieldDescriptor::relation("menu_item_id", "Menu Items", EntityType::MenuItems).required(),
	],
};

static ORDERS: EntitySchema = EntitySchema {
	entity: EntityType::Orders,
	fields: &[
		FieldDescriptor::text("status", "Status").required(),
		CREATED_AT,
		UPDATED_AT,
		FieldDescriptor::relation("customer_id", "Users", EntityType::Users).required(),
		FieldDescriptor::relation("restaurant_id", "Restaurants", EntityType::Restaurants).required(),
	],
};

static RESERVATIONS: EntitySchema = EntitySchema {
	entity: EntityType::Reservations,
	fields: &[
		FieldDescriptor::date("date", "Date").required(),
		FieldDescriptor::date("time", "Time").required(),
		CREATED_AT,
		UPDATED_AT,
		FieldDescriptor::relation("customer_id", "Users", EntityType::Users).required(),
		FieldDescriptor::relation("restaurant_id", "Restaurants", EntityType::Restaurants).required(),
	],
};

static RESTAURANTS: EntitySchema = EntitySchema {
	entity: EntityType::Restaurants,
	fields: &[
		FieldDescriptor::text("name", "Name").required(),
		FieldDescriptor::text("description", "Description"),
		CREATED_AT,
		UPDATED_AT,
		FieldDescriptor::relation("owner_id", "Users", EntityType::Users).required(),
	],
};

static USERS: EntitySchema = EntitySchema {
	entity: EntityType::Users,
	fields: &[FieldDescriptor::text("role", "Role").required(), CREATED_AT, UPDATED_AT],
};

#[cfg(test)]
mod tests;
