//! Scripted in-memory [`Backend`] for form and page tests.
//!
//! Records live in memory, every call is logged, failures can be injected,
//! and [`Gate`]s hold individual responses back so tests control the order
//! in which concurrent calls resolve.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use bistro_schema::{EntityType, FieldValues, ID_FIELD, Record};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::backend::Backend;
use crate::error::{ApiError, Result};

/// One logged backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	/// `GET /{entity}`.
	List {
		/// Entity listed.
		entity: EntityType,
		/// Search term, if any.
		search: Option<String>,
	},
	/// `GET /{entity}/{id}`.
	Get {
		/// Entity fetched.
		entity: EntityType,
		/// Identifier fetched.
		id: String,
	},
	/// `POST /{entity}`.
	Create {
		/// Entity created.
		entity: EntityType,
		/// JSON body as it would go over the wire.
		body: Value,
	},
	/// `PUT /{entity}/{id}`.
	Update {
		/// Entity updated.
		entity: EntityType,
		/// Identifier updated.
		id: String,
		/// JSON body as it would go over the wire.
		body: Value,
	},
}

impl Call {
	/// True for create and update calls.
	pub const fn is_mutation(&self) -> bool {
		matches!(self, Self::Create { .. } | Self::Update { .. })
	}
}

/// Operation class a [`Gate`] holds back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
	/// List calls.
	List,
	/// Single-record fetches.
	Get,
	/// Creates and updates.
	Mutation,
}

/// Holds back one response until opened. Dropping the gate also releases it.
#[derive(Debug)]
pub struct Gate(oneshot::Sender<()>);

impl Gate {
	/// Lets the held call complete.
	pub fn open(self) {
		let _ = self.0.send(());
	}
}

#[derive(Default)]
struct ScriptState {
	records: HashMap<EntityType, Vec<Record>>,
	calls: Vec<Call>,
	gates: HashMap<(GateKind, EntityType), VecDeque<oneshot::Receiver<()>>>,
	list_failures: HashMap<EntityType, ApiError>,
	get_failures: VecDeque<ApiError>,
	mutation_failures: VecDeque<ApiError>,
	next_id: u64,
}

/// In-memory backend with call log, failure injection and response gates.
#[derive(Default)]
pub struct ScriptedBackend {
	state: Mutex<ScriptState>,
}

impl ScriptedBackend {
	/// Empty backend.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style seeding.
	#[must_use]
	pub fn with_records(self, entity: EntityType, records: impl IntoIterator<Item = Record>) -> Self {
		self.state.lock().records.entry(entity).or_default().extend(records);
		self
	}

	/// Every call made so far, in issue order.
	pub fn calls(&self) -> Vec<Call> {
		self.state.lock().calls.clone()
	}

	/// Number of create and update calls made so far.
	pub fn mutation_count(&self) -> usize {
		self.state.lock().calls.iter().filter(|call| call.is_mutation()).count()
	}

	/// Holds back the next call of `kind` for `entity` until the gate opens.
	pub fn gate(&self, kind: GateKind, entity: EntityType) -> Gate {
		let (tx, rx) = oneshot::channel();
		self.state.lock().gates.entry((kind, entity)).or_default().push_back(rx);
		Gate(tx)
	}

	/// Makes every list call for `entity` fail until cleared.
	pub fn fail_list(&self, entity: EntityType, error: ApiError) {
		self.state.lock().list_failures.insert(entity, error);
	}

	/// Lets list calls for `entity` succeed again.
	pub fn clear_list_failure(&self, entity: EntityType) {
		self.state.lock().list_failures.remove(&entity);
	}

	/// Makes the next single-record fetch fail.
	pub fn fail_next_get(&self, error: ApiError) {
		self.state.lock().get_failures.push_back(error);
	}

	/// Makes the next create or update fail.
	pub fn fail_next_mutation(&self, error: ApiError) {
		self.state.lock().mutation_failures.push_back(error);
	}

	/// Logs the call and takes the gate queued for it, if any.
	fn enter(&self, call: Call, kind: GateKind, entity: EntityType) -> Option<oneshot::Receiver<()>> {
		let mut state = self.state.lock();
		state.calls.push(call);
		state.gates.get_mut(&(kind, entity)).and_then(VecDeque::pop_front)
	}

	async fn pass(gate: Option<oneshot::Receiver<()>>) {
		if let Some(gate) = gate {
			let _ = gate.await;
		}
	}
}

fn matches_search(record: &Record, term: &str) -> bool {
	let term = term.to_lowercase();
	record.id().to_lowercase().contains(&term)
		|| record
			.fields()
			.values()
			.filter_map(|value| value.as_str())
			.any(|text| text.to_lowercase().contains(&term))
}

#[async_trait]
impl Backend for ScriptedBackend {
	async fn list(&self, entity: EntityType, search: Option<&str>) -> Result<Vec<Record>> {
		let search = search.map(str::trim).filter(|term| !term.is_empty()).map(str::to_string);
		let gate = self.enter(
			Call::List {
				entity,
				search: search.clone(),
			},
			GateKind::List,
			entity,
		);
		Self::pass(gate).await;

		let state = self.state.lock();
		if let Some(error) = state.list_failures.get(&entity) {
			return Err(error.clone());
		}
		let records = state.records.get(&entity).map(Vec::as_slice).unwrap_or_default();
		Ok(records
			.iter()
			.filter(|record| search.as_deref().is_none_or(|term| matches_search(record, term)))
			.cloned()
			.collect())
	}

	async fn get(&self, entity: EntityType, id: &str) -> Result<Record> {
		let gate = self.enter(
			Call::Get {
				entity,
				id: id.to_string(),
			},
			GateKind::Get,
			entity,
		);
		Self::pass(gate).await;

		let mut state = self.state.lock();
		if let Some(error) = state.get_failures.pop_front() {
			return Err(error);
		}
		state
			.records
			.get(&entity)
			.and_then(|records| records.iter().find(|record| record.id() == id))
			.cloned()
			.ok_or_else(|| ApiError::NotFound {
				entity,
				id: id.to_string(),
			})
	}

	async fn create(&self, entity: EntityType, values: &FieldValues) -> Result<Record> {
		let schema = entity.schema();
		let body = schema.encode_values(values);
		let gate = self.enter(
			Call::Create {
				entity,
				body: body.clone(),
			},
			GateKind::Mutation,
			entity,
		);
		Self::pass(gate).await;

		let mut state = self.state.lock();
		if let Some(error) = state.mutation_failures.pop_front() {
			return Err(error);
		}
		state.next_id += 1;
		let mut stored = body;
		if let Value::Object(object) = &mut stored {
			object.insert(ID_FIELD.to_string(), Value::String(format!("{}-{}", entity.path(), state.next_id)));
		}
		let record = schema.decode_record(&stored)?;
		state.records.entry(entity).or_default().push(record.clone());
		Ok(record)
	}

	async fn update(&self, entity: EntityType, id: &str, values: &FieldValues) -> Result<Record> {
		let body = entity.schema().encode_values(values);
		let gate = self.enter(
			Call::Update {
				entity,
				id: id.to_string(),
				body,
			},
			GateKind::Mutation,
			entity,
		);
		Self::pass(gate).await;

		let mut state = self.state.lock();
		if let Some(error) = state.mutation_failures.pop_front() {
			return Err(error);
		}
		let record = state
			.records
			.get_mut(&entity)
			.and_then(|records| records.iter_mut().find(|record| record.id() == id))
			.ok_or_else(|| ApiError::NotFound {
				entity,
				id: id.to_string(),
			})?;
		for (name, value) in values {
			record.set(name.clone(), value.clone());
		}
		Ok(record.clone())
	}
}
