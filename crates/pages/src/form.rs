use bistro_client::ApiError;
use bistro_forms::{FormController, RelationSelector};
use bistro_schema::{FieldValue, FieldValues};

use crate::context::PageContext;
use crate::error::PageError;
use crate::scope::PageScope;
use crate::view::{FieldView, FormView, input_text};

/// Form controller plus one relation selector per relation field.
#[derive(Debug)]
pub struct EntityForm {
	controller: FormController,
	selectors: Vec<RelationSelector>,
}

impl EntityForm {
	pub(crate) fn new(ctx: &PageContext, scope: &PageScope, controller: FormController) -> Self {
		let selectors = controller
			.schema()
			.relations()
			.filter_map(|(field, _)| RelationSelector::new(field, ctx.backend.clone()))
			.map(|selector| selector.with_debounce(ctx.debounce).with_scope(scope.token()))
			.collect();
		Self { controller, selectors }
	}

	/// Values, errors and submit state.
	pub fn controller(&self) -> &FormController {
		&self.controller
	}

	/// Direct access for value changes that bypass input parsing.
	pub fn controller_mut(&mut self) -> &mut FormController {
		&mut self.controller
	}

	/// Current field values.
	pub fn values(&self) -> &FieldValues {
		self.controller.values()
	}

	/// Selector bound to a relation field.
	pub fn selector(&self, field: &str) -> Option<&RelationSelector> {
		self.selectors.iter().find(|selector| selector.field().name == field)
	}

	/// One selector per relation field, in schema order.
	pub fn selectors(&self) -> &[RelationSelector] {
		&self.selectors
	}

	/// Reads typed input for a field and sets it. Fields the schema does not
	/// know are stored as text.
	pub fn set_input(&mut self, field: &str, input: &str) -> Result<(), PageError> {
		let value = match self.controller.schema().field(field) {
			Some(descriptor) => FieldValue::parse_input(descriptor.kind, input).map_err(|source| PageError::Input {
				field: field.to_string(),
				source,
			})?,
			None => FieldValue::text(input),
		};
		self.controller.set_value(field, value);
		Ok(())
	}

	/// Selects a referenced record for a relation field.
	pub fn select(&mut self, field: &str, id: &str) -> Result<(), PageError> {
		let selector = self
			.selectors
			.iter()
			.find(|selector| selector.field().name == field)
			.ok_or_else(|| PageError::NotARelation(field.to_string()))?;
		selector.select(&mut self.controller, id);
		Ok(())
	}

	/// Runs a relation query for `field`; `Ok(false)` when the result was
	/// superseded or the page unmounted.
	pub async fn query(&self, field: &str, term: &str) -> Result<bool, PageError> {
		Ok(self.relation(field)?.query(term).await)
	}

	/// Relation query for typed input: waits out the page debounce first, so
	/// a keystroke superseded during the wait never reaches the backend.
	pub async fn query_debounced(&self, field: &str, term: &str) -> Result<bool, PageError> {
		Ok(self.relation(field)?.query_debounced(term).await)
	}

	fn relation(&self, field: &str) -> Result<&RelationSelector, PageError> {
		self.selector(field).ok_or_else(|| PageError::NotARelation(field.to_string()))
	}

	/// View model for rendering. A failed reload is reported through
	/// `reload_error` when there is no submit failure to show.
	pub fn view(&self, title: String, reload_error: Option<&ApiError>) -> FormView {
		let controller = &self.controller;
		let fields = controller
			.schema()
			.fields
			.iter()
			.map(|field| {
				let selector = self.selector(field.name);
				FieldView {
					name: field.name,
					label: field.label,
					kind: field.kind,
					required: field.required,
					value: controller.value(field.name).map(input_text).unwrap_or_default(),
					error: controller.visible_error(field.name).map(str::to_string),
					options: selector.map(|selector| selector.options_for(controller)),
					options_error: selector.and_then(RelationSelector::error).map(|error| error.to_string()),
					options_loading: selector.is_some_and(RelationSelector::is_loading),
				}
			})
			.collect();
		let banner = controller
			.last_error()
			.filter(|error| error.field_errors().is_none())
			.map(ToString::to_string)
			.or_else(|| reload_error.map(|error| format!("Failed to reload: {error}")));
		FormView {
			entity: controller.schema().entity,
			title,
			fields,
			submitting: controller.is_submitting(),
			valid: controller.is_valid(),
			banner,
		}
	}
}
