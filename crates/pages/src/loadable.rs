use bistro_client::ApiError;

/// Explicit state of data a page fetches on mount.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
	/// Fetch in flight and nothing to show yet.
	Loading,
	/// Data available.
	Ready(T),
	/// Fetch failed; the error is shown instead of the data.
	Failed(ApiError),
}

impl<T> Loadable<T> {
	/// True while nothing has arrived.
	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Loading)
	}

	/// Data, when available.
	pub fn ready(&self) -> Option<&T> {
		match self {
			Self::Ready(value) => Some(value),
			_ => None,
		}
	}

	/// Mutable data, when available.
	pub fn ready_mut(&mut self) -> Option<&mut T> {
		match self {
			Self::Ready(value) => Some(value),
			_ => None,
		}
	}

	/// Fetch error, when it failed.
	pub fn error(&self) -> Option<&ApiError> {
		match self {
			Self::Failed(error) => Some(error),
			_ => None,
		}
	}
}

impl<T> From<Result<T, ApiError>> for Loadable<T> {
	fn from(result: Result<T, ApiError>) -> Self {
		match result {
			Ok(value) => Self::Ready(value),
			Err(error) => Self::Failed(error),
		}
	}
}
