use std::collections::HashMap;
use std::sync::Arc;

use bistro_schema::{EntityType, Record};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct CacheState {
	lists: HashMap<EntityType, Vec<Record>>,
	records: HashMap<(EntityType, String), Record>,
}

/// Explicit, injectable record cache keyed by entity type and identifier.
///
/// Cloning shares the underlying storage. Pages read from it to render
/// immediately on mount and write through it after successful fetches and
/// mutations.
#[derive(Debug, Clone, Default)]
pub struct RecordCache {
	state: Arc<RwLock<CacheState>>,
}

impl RecordCache {
	/// Empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Cached list for `entity`.
	pub fn list(&self, entity: EntityType) -> Option<Vec<Record>> {
		self.state.read().lists.get(&entity).cloned()
	}

	/// Stores the list for `entity`.
	pub fn put_list(&self, entity: EntityType, records: Vec<Record>) {
		self.state.write().lists.insert(entity, records);
	}

	/// Cached single record.
	pub fn record(&self, entity: EntityType, id: &str) -> Option<Record> {
		self.state.read().records.get(&(entity, id.to_string())).cloned()
	}

	/// Stores a single record under its own identifier.
	pub fn put_record(&self, entity: EntityType, record: Record) {
		self.state.write().records.insert((entity, record.id().to_string()), record);
	}

	/// Drops the cached list for `entity`; single records stay.
	pub fn invalidate_list(&self, entity: EntityType) {
		self.state.write().lists.remove(&entity);
	}

	/// Drops everything cached for `entity`.
	pub fn invalidate(&self, entity: EntityType) {
		let mut state = self.state.write();
		state.lists.remove(&entity);
		state.records.retain(|(cached, _), _| *cached != entity);
	}

	/// Applies a successful create or update: the returned record replaces the
	/// single entry in place and the list is invalidated.
	pub fn record_saved(&self, entity: EntityType, record: Record) {
		tracing::trace!(entity = %entity, id = record.id(), "cache.record_saved");
		let mut state = self.state.write();
		state.lists.remove(&entity);
		state.records.insert((entity, record.id().to_string()), record);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn saved_record_replaces_entry_and_drops_list() {
		let cache = RecordCache::new();
		cache.put_list(EntityType::Users, vec![Record::new("u1").with("role", "admin")]);
		cache.put_record(EntityType::Users, Record::new("u1").with("role", "admin"));

		cache.record_saved(EntityType::Users, Record::new("u1").with("role", "owner"));

		assert_eq!(cache.list(EntityType::Users), None);
		assert_eq!(cache.record(EntityType::Users, "u1"), Some(Record::new("u1").with("role", "owner")));
	}

	#[test]
	fn entries_are_scoped_by_entity() {
		let cache = RecordCache::new();
		cache.put_record(EntityType::Users, Record::new("x"));
		cache.put_record(EntityType::Menus, Record::new("x"));
		cache.put_list(EntityType::Menus, Vec::new());

		cache.invalidate(EntityType::Menus);

		assert!(cache.record(EntityType::Users, "x").is_some());
		assert!(cache.record(EntityType::Menus, "x").is_none());
		assert!(cache.list(EntityType::Menus).is_none());
	}

	#[test]
	fn clones_share_storage() {
		let cache = RecordCache::new();
		let other = cache.clone();
		other.put_list(EntityType::Orders, vec![Record::new("o1")]);
		assert_eq!(cache.list(EntityType::Orders).map(|list| list.len()), Some(1));
		cache.invalidate_list(EntityType::Orders);
		assert!(other.list(EntityType::Orders).is_none());
	}
}
