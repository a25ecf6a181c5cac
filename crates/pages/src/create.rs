use bistro_forms::FormController;
use bistro_schema::{EntityType, Record, today};
use chrono::{DateTime, Utc};

use crate::context::PageContext;
use crate::error::PageError;
use crate::form::EntityForm;
use crate::route::Route;
use crate::scope::PageScope;
use crate::view::FormView;

/// Create form for one entity type.
pub struct CreatePage {
	entity: EntityType,
	ctx: PageContext,
	scope: PageScope,
	form: EntityForm,
}

impl CreatePage {
	/// Mounts with defaults dated today.
	pub fn mount(ctx: &PageContext, entity: EntityType) -> Self {
		Self::mount_at(ctx, entity, today())
	}

	/// Mounts with date fields defaulting to `today`.
	pub fn mount_at(ctx: &PageContext, entity: EntityType, today: DateTime<Utc>) -> Self {
		let schema = entity.schema();
		let scope = PageScope::new();
		let form = EntityForm::new(ctx, &scope, FormController::new(schema, schema.defaults(today)));
		Self {
			entity,
			ctx: ctx.clone(),
			scope,
			form,
		}
	}

	/// Entity being created.
	pub fn entity(&self) -> EntityType {
		self.entity
	}

	/// Form state.
	pub fn form(&self) -> &EntityForm {
		&self.form
	}

	/// Form state for input.
	pub fn form_mut(&mut self) -> &mut EntityForm {
		&mut self.form
	}

	/// Scope handle for unmounting from another task.
	pub fn scope(&self) -> PageScope {
		self.scope.clone()
	}

	/// Leaves the page; in-flight results are discarded.
	pub fn unmount(&self) {
		self.scope.unmount();
	}

	/// Form view titled `Create {entity}`.
	pub fn view(&self) -> FormView {
		self.form.view(format!("Create {}", self.entity.title()), None)
	}

	/// Submits the form as a create.
	///
	/// On success the form is reset, the new record is cached, the list entry
	/// is invalidated and the navigator is sent to the list. `Ok(None)` means
	/// the page unmounted before the response arrived.
	pub async fn submit(&mut self) -> Result<Option<Record>, PageError> {
		let entity = self.entity;
		let controller = self.form.controller_mut();
		let ticket = controller.begin_submit()?;
		let Some(outcome) = self.scope.run("create", self.ctx.backend.save(entity, None, ticket.values())).await else {
			return Ok(None);
		};
		let record = controller.finish_submit(ticket, outcome)?;

		tracing::debug!(%entity, id = record.id(), "page.created");
		self.ctx.cache.record_saved(entity, record.clone());
		self.ctx.navigator.navigate(Route::List(entity));
		Ok(Some(record))
	}
}
