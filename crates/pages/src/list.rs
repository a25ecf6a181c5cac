use bistro_client::ApiError;
use bistro_schema::{EntityType, Record};

use crate::context::PageContext;
use crate::loadable::Loadable;
use crate::scope::PageScope;

/// Rendered table: `id` then every schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
	/// Column headers.
	pub columns: Vec<&'static str>,
	/// One row of display text per record.
	pub rows: Vec<Vec<String>>,
}

impl Table {
	fn build(entity: EntityType, records: &[Record]) -> Self {
		let columns = entity.schema().columns();
		let rows = records
			.iter()
			.map(|record| {
				columns
					.iter()
					.map(|column| record.get(column).map(|value| value.to_string()).unwrap_or_default())
					.collect()
			})
			.collect();
		Self { columns, rows }
	}
}

/// What the list page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
	/// No data and no error yet.
	Loading,
	/// Fetch failed; no table is shown.
	Error(String),
	/// Records loaded.
	Table(Table),
}

/// List of every record of one entity type.
pub struct ListPage {
	entity: EntityType,
	ctx: PageContext,
	scope: PageScope,
	state: Loadable<Vec<Record>>,
}

impl ListPage {
	/// Mounts the page, showing the cached list when there is one. Call
	/// [`load`](Self::load) to revalidate.
	pub fn mount(ctx: &PageContext, entity: EntityType) -> Self {
		let state = ctx.cache.list(entity).map_or(Loadable::Loading, Loadable::Ready);
		tracing::debug!(%entity, cached = !state.is_loading(), "page.list_mounted");
		Self {
			entity,
			ctx: ctx.clone(),
			scope: PageScope::new(),
			state,
		}
	}

	/// Entity listed.
	pub fn entity(&self) -> EntityType {
		self.entity
	}

	/// Records, or why there are none.
	pub fn state(&self) -> &Loadable<Vec<Record>> {
		&self.state
	}

	/// Scope handle for unmounting from another task.
	pub fn scope(&self) -> PageScope {
		self.scope.clone()
	}

	/// Leaves the page; an in-flight fetch is discarded.
	pub fn unmount(&self) {
		self.scope.unmount();
	}

	/// Fetches the list once. Returns whether the result was applied.
	pub async fn load(&mut self) -> bool {
		let entity = self.entity;
		let Some(result) = self.scope.run("list", self.ctx.backend.list(entity, None)).await else {
			return false;
		};
		match result {
			Ok(records) => {
				tracing::debug!(%entity, count = records.len(), "page.list_loaded");
				self.ctx.cache.put_list(entity, records.clone());
				self.state = Loadable::Ready(records);
			}
			Err(error) => {
				tracing::warn!(%entity, %error, "page.list_failed");
				self.state = Loadable::Failed(error);
			}
		}
		true
	}

	/// Loading indicator, error banner or table.
	pub fn view(&self) -> ListView {
		match &self.state {
			Loadable::Loading => ListView::Loading,
			Loadable::Failed(error) => ListView::Error(banner(error)),
			Loadable::Ready(records) => ListView::Table(Table::build(self.entity, records)),
		}
	}
}

fn banner(error: &ApiError) -> String {
	format!("Failed to load: {error}")
}

#[cfg(test)]
mod tests;
