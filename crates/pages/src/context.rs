use std::sync::Arc;
use std::time::Duration;

use bistro_client::{Backend, ClientConfig, RecordCache};

use crate::route::Navigator;

/// Collaborators shared by every page of one admin session.
#[derive(Clone)]
pub struct PageContext {
	/// Record fetcher and mutation client.
	pub backend: Arc<dyn Backend>,
	/// Shared record cache.
	pub cache: RecordCache,
	/// Where pages go after a successful submit.
	pub navigator: Arc<dyn Navigator>,
	/// Relation query debounce.
	pub debounce: Duration,
}

impl PageContext {
	/// Context with an empty cache and the default debounce.
	pub fn new(backend: Arc<dyn Backend>, navigator: Arc<dyn Navigator>) -> Self {
		Self {
			backend,
			cache: RecordCache::new(),
			navigator,
			debounce: ClientConfig::DEFAULT_DEBOUNCE,
		}
	}

	#[must_use]
	/// Shares `cache` with other sessions or commands.
	pub fn with_cache(mut self, cache: RecordCache) -> Self {
		self.cache = cache;
		self
	}

	#[must_use]
	/// Delay applied to debounced relation queries.
	pub fn with_debounce(mut self, debounce: Duration) -> Self {
		self.debounce = debounce;
		self
	}
}
