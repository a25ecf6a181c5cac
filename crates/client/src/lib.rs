//! REST access for the admin pages.
//!
//! * [`Backend`]: the record fetcher and mutation client seam
//! * [`RestClient`]: `reqwest` implementation against `GET/POST/PUT /{entity}[/{id}]`
//! * [`RecordCache`]: explicit cache keyed by entity type and identifier
//! * [`ClientConfig`]: backend base URL and request tuning
//!
//! Enable the `test-support` feature for [`testing::ScriptedBackend`].

#![warn(missing_docs)]

mod backend;
mod cache;
pub mod config;
mod error;
mod http;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use backend::Backend;
pub use cache::RecordCache;
pub use config::{ClientConfig, ConfigError, ConfigLayers};
pub use error::{ApiError, Result};
pub use http::RestClient;
