use std::fmt;
use std::str::FromStr;

use bistro_schema::{EntityType, UnknownEntity};
use parking_lot::Mutex;
use thiserror::Error;

/// Admin page address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
	/// `/{entity}`
	List(EntityType),
	/// `/{entity}/create`
	Create(EntityType),
	/// `/{entity}/edit/{id}`
	Edit(EntityType, String),
}

impl Route {
	/// Entity the page belongs to.
	pub fn entity(&self) -> EntityType {
		match self {
			Self::List(entity) | Self::Create(entity) | Self::Edit(entity, _) => *entity,
		}
	}
}

impl fmt::Display for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::List(entity) => write!(f, "/{}", entity.path()),
			Self::Create(entity) => write!(f, "/{}/create", entity.path()),
			Self::Edit(entity, id) => write!(f, "/{}/edit/{id}", entity.path()),
		}
	}
}

/// Path that names no admin page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
	/// First segment names no entity.
	#[error(transparent)]
	UnknownEntity(#[from] UnknownEntity),
	/// Segments after the entity name no page.
	#[error("no page at {0}")]
	NoPage(String),
}

impl FromStr for Route {
	type Err = RouteError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let segments: Vec<&str> = s.split('/').filter(|segment| !segment.is_empty()).collect();
		let no_page = || RouteError::NoPage(s.to_string());
		match segments.as_slice() {
			[entity] => Ok(Self::List(entity.parse()?)),
			[entity, "create"] => Ok(Self::Create(entity.parse()?)),
			[entity, "edit", id] => Ok(Self::Edit(entity.parse()?, (*id).to_string())),
			_ => Err(no_page()),
		}
	}
}

/// Receives navigation requests from pages after a successful submit.
pub trait Navigator: Send + Sync {
	/// Moves to `route`.
	fn navigate(&self, route: Route);
}

/// Navigator that records every route it is sent to.
#[derive(Debug, Default)]
pub struct History {
	routes: Mutex<Vec<Route>>,
}

impl History {
	/// Empty history.
	pub fn new() -> Self {
		Self::default()
	}

	/// Most recent route, if any navigation happened.
	pub fn current(&self) -> Option<Route> {
		self.routes.lock().last().cloned()
	}
}

impl Navigator for History {
	fn navigate(&self, route: Route) {
		tracing::debug!(%route, "page.navigate");
		self.routes.lock().push(route);
	}
}
