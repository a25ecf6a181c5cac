//! Async option list for one relation field.
//!
//! Every query is stamped with a generation from a [`QueryClock`]. Only the
//! most recently issued generation may apply its result; anything older is
//! dropped when it resolves, whatever order responses arrive in.

use std::sync::Arc;
use std::time::Duration;

use bistro_client::{ApiError, Backend, ClientConfig};
use bistro_schema::{EntityType, FieldDescriptor, FieldValue};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::controller::FormController;
use crate::token::{QueryClock, QueryToken};

/// One selectable referenced record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationOption {
	/// Referenced record identifier; the value stored in the form.
	pub id: String,
	/// Display label.
	pub label: String,
	/// True when the option is the current selection but absent from the
	/// latest result set.
	pub detached: bool,
}

#[derive(Debug, Default)]
struct SelectorState {
	options: Vec<RelationOption>,
	/// Option chosen through [`RelationSelector::select`], kept so it keeps
	/// its label after newer result sets drop it.
	selection: Option<RelationOption>,
	term: String,
	loading: bool,
	error: Option<ApiError>,
}

/// Binds a relation field of a [`FormController`] to candidates of the
/// referenced entity.
///
/// Clones share state, so a clone can run a query on another task while
/// this one renders.
#[derive(Clone)]
pub struct RelationSelector {
	field: &'static FieldDescriptor,
	target: EntityType,
	backend: Arc<dyn Backend>,
	clock: QueryClock,
	debounce: Duration,
	state: Arc<Mutex<SelectorState>>,
}

impl std::fmt::Debug for RelationSelector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RelationSelector")
			.field("field", &self.field.name)
			.field("target", &self.target)
			.field("generation", &self.clock.latest())
			.finish_non_exhaustive()
	}
}

impl RelationSelector {
	/// Selector for `field`, or `None` when it is not a relation field.
	pub fn new(field: &'static FieldDescriptor, backend: Arc<dyn Backend>) -> Option<Self> {
		let target = field.kind.target()?;
		Some(Self {
			field,
			target,
			backend,
			clock: QueryClock::new(),
			debounce: ClientConfig::DEFAULT_DEBOUNCE,
			state: Arc::default(),
		})
	}

	/// Sets the delay used by [`query_debounced`](Self::query_debounced).
	#[must_use]
	pub fn with_debounce(mut self, debounce: Duration) -> Self {
		self.debounce = debounce;
		self
	}

	/// Ties the selector to a page scope; cancelling the scope detaches it.
	#[must_use]
	pub fn with_scope(mut self, scope: &CancellationToken) -> Self {
		self.clock = QueryClock::with_scope(scope.child_token());
		self
	}

	/// Relation field the selector is bound to.
	pub fn field(&self) -> &'static FieldDescriptor {
		self.field
	}

	/// Entity the options are drawn from.
	pub fn target(&self) -> EntityType {
		self.target
	}

	/// Term of the most recent query.
	pub fn term(&self) -> String {
		self.state.lock().term.clone()
	}

	/// True while an applied query awaits its response.
	pub fn is_loading(&self) -> bool {
		self.state.lock().loading
	}

	/// Inline error of the last failed query, cleared by the next success.
	pub fn error(&self) -> Option<ApiError> {
		self.state.lock().error.clone()
	}

	/// Options of the latest applied result set.
	pub fn options(&self) -> Vec<RelationOption> {
		self.state.lock().options.clone()
	}

	/// Options to render for `form`: the latest result set, with the form's
	/// current selection prepended when the result set does not contain it.
	///
	/// A prepended selection is labelled as it was when selected, or by its
	/// identifier when it was never among the options.
	pub fn options_for(&self, form: &FormController) -> Vec<RelationOption> {
		let state = self.state.lock();
		let mut options = state.options.clone();
		if let Some(selected) = self.selected(form)
			&& !options.iter().any(|option| option.id == selected)
		{
			let label = state
				.selection
				.as_ref()
				.filter(|selection| selection.id == selected)
				.map_or_else(|| selected.to_string(), |selection| selection.label.clone());
			options.insert(
				0,
				RelationOption {
					id: selected.to_string(),
					label,
					detached: true,
				},
			);
		}
		options
	}

	/// Currently selected identifier in `form`, if non-empty.
	pub fn selected<'a>(&self, form: &'a FormController) -> Option<&'a str> {
		form.value(self.field.name)
			.and_then(FieldValue::as_str)
			.filter(|id| !id.trim().is_empty())
	}

	/// Sets the bound form field to `id` and remembers its label.
	pub fn select(&self, form: &mut FormController, id: &str) {
		{
			let mut state = self.state.lock();
			let label = state
				.options
				.iter()
				.chain(state.selection.as_ref())
				.find(|option| option.id == id)
				.map_or_else(|| id.to_string(), |option| option.label.clone());
			state.selection = Some(RelationOption {
				id: id.to_string(),
				label,
				detached: true,
			});
		}
		form.set_value(self.field.name, FieldValue::text(id));
	}

	/// Fetches candidates for `term` and replaces the option set.
	///
	/// Returns whether the result was applied; `false` means a newer query
	/// superseded this one or the selector was detached.
	pub async fn query(&self, term: &str) -> bool {
		let token = self.clock.issue();
		self.run(token, term).await
	}

	/// Like [`query`](Self::query) after the debounce delay. A query
	/// superseded during the wait never reaches the backend.
	pub async fn query_debounced(&self, term: &str) -> bool {
		let token = self.clock.issue();
		tokio::select! {
			() = token.cancelled() => return false,
			() = tokio::time::sleep(self.debounce) => {}
		}
		if !token.is_current() {
			tracing::trace!(field = self.field.name, generation = token.generation(), "relation.debounce_superseded");
			return false;
		}
		self.run(token, term).await
	}

	/// Cancels in-flight queries; their results are dropped. The remembered
	/// selection label is forgotten.
	pub fn detach(&self) {
		tracing::debug!(field = self.field.name, "relation.detached");
		self.clock.cancel();
		let mut state = self.state.lock();
		state.loading = false;
		state.selection = None;
	}

	/// True once detached directly or through the page scope.
	pub fn is_detached(&self) -> bool {
		self.clock.is_cancelled()
	}

	async fn run(&self, token: QueryToken, term: &str) -> bool {
		if !token.is_current() {
			return false;
		}
		{
			let mut state = self.state.lock();
			state.term = term.to_string();
			state.loading = true;
		}

		let result = tokio::select! {
			() = token.cancelled() => {
				tracing::debug!(field = self.field.name, generation = token.generation(), "relation.query_cancelled");
				return false;
			}
			result = self.backend.list(self.target, Some(term)) => result,
		};

		if !token.is_current() {
			tracing::trace!(
				field = self.field.name,
				generation = token.generation(),
				latest = self.clock.latest(),
				"relation.stale_result"
			);
			return false;
		}

		let schema = self.target.schema();
		let mut state = self.state.lock();
		state.loading = false;
		match result {
			Ok(records) => {
				state.options = records
					.iter()
					.map(|record| RelationOption {
						id: record.id().to_string(),
						label: schema.label_of(record),
						detached: false,
					})
					.collect();
				state.error = None;
			}
			Err(error) => {
				tracing::debug!(field = self.field.name, %error, "relation.query_failed");
				state.error = Some(error);
			}
		}
		true
	}
}
