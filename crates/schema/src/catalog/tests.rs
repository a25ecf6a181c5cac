use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::*;
use crate::value::midnight;

#[test]
fn every_entity_has_timestamps_and_a_matching_schema() {
	for entity in EntityType::ALL {
		let schema = entity.schema();
		assert_eq!(schema.entity, entity);
		assert!(schema.field("created_at").is_some_and(|field| field.required));
		assert!(schema.field("updated_at").is_some_and(|field| field.required));
		assert!(schema.field(ID_FIELD).is_none(), "{entity} must not declare id");
	}
}

#[test]
fn relations_point_at_known_entities() {
	let targets: Vec<_> = EntityType::OrderItems.schema().relations().map(|(field, target)| (field.name, target)).collect();
	assert_eq!(targets, [("order_id", EntityType::Orders), ("menu_item_id", EntityType::MenuItems)]);
}

#[test]
fn defaults_follow_field_kinds() {
	let today = midnight(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
	let defaults = EntityType::MenuItems.schema().defaults(today);
	assert_eq!(defaults.get("name"), Some(&FieldValue::text("")));
	assert_eq!(defaults.get("price"), Some(&FieldValue::Integer(0)));
	assert_eq!(defaults.get("created_at"), Some(&FieldValue::Date(today)));
	assert_eq!(defaults.get("menu_id"), Some(&FieldValue::text("")));
}

#[test]
fn columns_lead_with_id() {
	assert_eq!(EntityType::Users.schema().columns(), ["id", "role", "created_at", "updated_at"]);
}

#[test]
fn values_of_fills_missing_fields_with_null() {
	let record = Record::new("u1").with("role", "admin").with("nickname", "root");
	let values = EntityType::Users.schema().values_of(&record);
	assert_eq!(values.get("role"), Some(&FieldValue::text("admin")));
	assert_eq!(values.get("created_at"), Some(&FieldValue::Null));
	assert!(values.get("nickname").is_none());
}

#[test]
fn labels_prefer_display_fields() {
	let schema = EntityType::Restaurants.schema();
	assert_eq!(schema.label_of(&Record::new("r1").with("name", "Chez Nous")), "Chez Nous");
	assert_eq!(schema.label_of(&Record::new("r2").with("name", "")), "r2");
	assert_eq!(EntityType::Users.schema().label_of(&Record::new("u1").with("role", "admin")), "admin");
	assert_eq!(EntityType::OrderItems.schema().label_of(&Record::new("oi1")), "oi1");
}

#[test]
fn date_cells_read_like_calendar_dates() {
	let value = FieldValue::Date(midnight(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()));
	assert_eq!(value.to_string(), "Fri Oct 16 2026");
}
