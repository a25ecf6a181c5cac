use async_trait::async_trait;
use bistro_schema::{EntityType, FieldValues, Record};

use crate::error::Result;

/// Record fetcher and mutation client for one REST backend.
///
/// Implementations perform exactly one request per call: no retries and no
/// shared-state mutation. Callers own whatever they cache from the result.
#[async_trait]
pub trait Backend: Send + Sync {
	/// `GET /{entity}`, optionally server-filtered by `search`.
	async fn list(&self, entity: EntityType, search: Option<&str>) -> Result<Vec<Record>>;

	/// `GET /{entity}/{id}`; a 404 is [`ApiError::NotFound`](crate::ApiError::NotFound).
	async fn get(&self, entity: EntityType, id: &str) -> Result<Record>;

	/// `POST /{entity}` with the field values as body.
	async fn create(&self, entity: EntityType, values: &FieldValues) -> Result<Record>;

	/// `PUT /{entity}/{id}` with the field values as body.
	async fn update(&self, entity: EntityType, id: &str, values: &FieldValues) -> Result<Record>;

	/// Creates when `id` is absent, updates otherwise.
	async fn save(&self, entity: EntityType, id: Option<&str>, values: &FieldValues) -> Result<Record> {
		match id {
			Some(id) => self.update(entity, id, values).await,
			None => self.create(entity, values).await,
		}
	}
}
