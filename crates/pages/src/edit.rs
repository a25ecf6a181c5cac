use bistro_client::ApiError;
use bistro_forms::FormController;
use bistro_schema::{EntityType, Record};

use crate::context::PageContext;
use crate::error::PageError;
use crate::form::EntityForm;
use crate::loadable::Loadable;
use crate::route::Route;
use crate::scope::PageScope;
use crate::view::FormView;

/// Edit form for one record, loaded by identifier.
pub struct EditPage {
	entity: EntityType,
	id: String,
	ctx: PageContext,
	scope: PageScope,
	state: Loadable<EntityForm>,
	reload_error: Option<ApiError>,
}

impl EditPage {
	/// Mounts the page for `id`, initialized from the cached record when there
	/// is one. Call [`load`](Self::load) to fetch.
	pub fn mount(ctx: &PageContext, entity: EntityType, id: impl Into<String>) -> Self {
		let id = id.into();
		let scope = PageScope::new();
		let state = match ctx.cache.record(entity, &id) {
			Some(record) => Loadable::Ready(Self::form_for(ctx, &scope, entity, &record)),
			None => Loadable::Loading,
		};
		Self {
			entity,
			id,
			ctx: ctx.clone(),
			scope,
			state,
			reload_error: None,
		}
	}

	fn form_for(ctx: &PageContext, scope: &PageScope, entity: EntityType, record: &Record) -> EntityForm {
		let schema = entity.schema();
		EntityForm::new(ctx, scope, FormController::new(schema, schema.values_of(record)))
	}

	/// Entity being edited.
	pub fn entity(&self) -> EntityType {
		self.entity
	}

	/// Identifier of the edited record.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Form, or why there is none.
	pub fn state(&self) -> &Loadable<EntityForm> {
		&self.state
	}

	/// Form, once loaded.
	pub fn form_mut(&mut self) -> Result<&mut EntityForm, PageError> {
		self.state.ready_mut().ok_or(PageError::NotReady)
	}

	/// Scope handle for unmounting from another task.
	pub fn scope(&self) -> PageScope {
		self.scope.clone()
	}

	/// Leaves the page; in-flight results are discarded.
	pub fn unmount(&self) {
		self.scope.unmount();
	}

	/// Fetches the record and (re)initializes the form from it.
	///
	/// Not-found, or any failure before a form exists, replaces the form with
	/// the error. Other failures keep a loaded form and its edits and show a
	/// banner until the next successful fetch.
	pub async fn load(&mut self) -> bool {
		let entity = self.entity;
		let Some(result) = self.scope.run("get", self.ctx.backend.get(entity, &self.id)).await else {
			return false;
		};
		match result {
			Ok(record) => {
				tracing::debug!(%entity, id = %self.id, "page.record_loaded");
				self.ctx.cache.put_record(entity, record.clone());
				self.reload_error = None;
				match &mut self.state {
					Loadable::Ready(form) => form.controller_mut().reinitialize(entity.schema().values_of(&record)),
					state => *state = Loadable::Ready(Self::form_for(&self.ctx, &self.scope, entity, &record)),
				}
			}
			Err(error) if error.is_not_found() || !matches!(self.state, Loadable::Ready(_)) => {
				tracing::warn!(%entity, id = %self.id, %error, "page.record_failed");
				self.reload_error = None;
				self.state = Loadable::Failed(error);
			}
			Err(error) => {
				tracing::warn!(%entity, id = %self.id, %error, "page.reload_failed");
				self.reload_error = Some(error);
			}
		}
		true
	}

	/// Form view, or why there is none.
	pub fn view(&self) -> Loadable<FormView> {
		match &self.state {
			Loadable::Loading => Loadable::Loading,
			Loadable::Ready(form) => Loadable::Ready(form.view(format!("Edit {} {}", self.entity.title(), self.id), self.reload_error.as_ref())),
			Loadable::Failed(error) => Loadable::Failed(error.clone()),
		}
	}

	/// Submits the form as an update of this record.
	///
	/// On success the cached record is replaced in place, the list entry is
	/// invalidated and the navigator is sent to the list. `Ok(None)` means the
	/// page unmounted before the response arrived.
	pub async fn submit(&mut self) -> Result<Option<Record>, PageError> {
		let entity = self.entity;
		let form = self.state.ready_mut().ok_or(PageError::NotReady)?;
		let controller = form.controller_mut();
		let ticket = controller.begin_submit()?;
		let Some(outcome) = self
			.scope
			.run("update", self.ctx.backend.save(entity, Some(&self.id), ticket.values()))
			.await
		else {
			return Ok(None);
		};
		let record = controller.finish_submit(ticket, outcome)?;

		tracing::debug!(%entity, id = record.id(), "page.updated");
		self.ctx.cache.record_saved(entity, record.clone());
		self.ctx.navigator.navigate(Route::List(entity));
		Ok(Some(record))
	}
}

#[cfg(test)]
mod tests;
