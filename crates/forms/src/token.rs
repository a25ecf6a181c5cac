use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Issues query generations and remembers the latest one.
///
/// Clones share the counter. A token is current while no newer generation
/// has been issued and its scope has not been cancelled.
#[derive(Debug, Clone, Default)]
pub struct QueryClock {
	latest: Arc<AtomicU64>,
	scope: CancellationToken,
}

impl QueryClock {
	/// Clock starting before generation 1, under its own scope.
	pub fn new() -> Self {
		Self::default()
	}

	/// Clock whose tokens are cancelled together with `scope`.
	pub fn with_scope(scope: CancellationToken) -> Self {
		Self {
			latest: Arc::default(),
			scope,
		}
	}

	/// Issues the next generation, superseding every earlier token.
	pub fn issue(&self) -> QueryToken {
		let generation = self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
		QueryToken {
			generation,
			latest: Arc::clone(&self.latest),
			cancel: self.scope.child_token(),
		}
	}

	/// Most recently issued generation; 0 before the first query.
	pub fn latest(&self) -> u64 {
		self.latest.load(Ordering::Acquire)
	}

	/// Cancels every token issued so far and all future ones.
	pub fn cancel(&self) {
		self.scope.cancel();
	}

	/// True once [`cancel`](Self::cancel) ran or the parent scope was cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.scope.is_cancelled()
	}
}

/// Generation stamp carried by one in-flight query.
#[derive(Debug, Clone)]
pub struct QueryToken {
	generation: u64,
	latest: Arc<AtomicU64>,
	cancel: CancellationToken,
}

impl QueryToken {
	/// Generation this token was issued with.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// True while this is the newest generation and nothing cancelled it.
	pub fn is_current(&self) -> bool {
		!self.cancel.is_cancelled() && self.latest.load(Ordering::Acquire) == self.generation
	}

	/// Future resolving when the owning scope is cancelled.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
