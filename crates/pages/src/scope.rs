use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Cancellation scope owned by one mounted page.
///
/// Clones share the scope, so a page can be unmounted from another task
/// while it awaits a fetch or mutation.
#[derive(Debug, Clone, Default)]
pub struct PageScope {
	cancel: CancellationToken,
}

impl PageScope {
	/// Scope of a freshly mounted page.
	pub fn new() -> Self {
		Self::default()
	}

	/// Token cancelled on unmount; relation selectors hang off it.
	pub fn token(&self) -> &CancellationToken {
		&self.cancel
	}

	/// Marks the page as gone. In-flight results are discarded from now on.
	pub fn unmount(&self) {
		self.cancel.cancel();
	}

	/// True after [`unmount`](Self::unmount).
	pub fn is_unmounted(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Awaits `work` unless the page unmounts first. `None` means the result
	/// must not be applied.
	pub async fn run<F: Future>(&self, what: &'static str, work: F) -> Option<F::Output> {
		let output = tokio::select! {
			biased;
			() = self.cancel.cancelled() => None,
			output = work => Some(output),
		};
		if output.is_none() || self.is_unmounted() {
			tracing::debug!(what, "page.result_discarded");
			return None;
		}
		output
	}
}
