//! Backend configuration.
//!
//! Layers, lowest precedence first: built-in defaults, TOML file,
//! `BISTRO_API_URL`, command-line flag.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "BISTRO_API_URL";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// No layer supplied a base URL.
	#[error("missing backend base URL (set base_url in the config file or {BASE_URL_ENV})")]
	MissingBaseUrl,

	/// The base URL is not an absolute http(s) URL.
	#[error("invalid base URL {url}: {reason}")]
	InvalidBaseUrl {
		/// Offending value.
		url: String,
		/// Why it was rejected.
		reason: String,
	},

	/// The HTTP client could not be constructed.
	#[error("failed to build HTTP client: {0}")]
	Client(String),
}

/// On-disk configuration; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
	base_url: Option<String>,
	timeout_secs: Option<u64>,
	debounce_ms: Option<u64>,
}

/// Resolved backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Root of the REST API; entity paths are appended to it.
	pub base_url: Url,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Delay before a relation search query is sent.
	pub debounce: Duration,
}

impl ClientConfig {
	/// Default request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
	/// Default relation query debounce.
	pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

	/// Config with defaults for everything but the base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			timeout: Self::DEFAULT_TIMEOUT,
			debounce: Self::DEFAULT_DEBOUNCE,
		}
	}

	/// Standard config file location, `<config dir>/bistro-admin/config.toml`.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("bistro-admin").join("config.toml"))
	}

	/// Resolves all layers into a config.
	pub fn load(layers: &ConfigLayers) -> Result<Self, ConfigError> {
		let file = match &layers.file {
			Some(path) => read_file(path, layers.file_required)?,
			None => ConfigFile::default(),
		};

		let base_url = [layers.flag_base_url.as_deref(), layers.env_base_url.as_deref(), file.base_url.as_deref()]
			.into_iter()
			.flatten()
			.map(str::trim)
			.find(|url| !url.is_empty())
			.ok_or(ConfigError::MissingBaseUrl)?;

		let mut config = Self::new(parse_base_url(base_url)?);
		if let Some(secs) = file.timeout_secs {
			config.timeout = Duration::from_secs(secs);
		}
		if let Some(ms) = file.debounce_ms {
			config.debounce = Duration::from_millis(ms);
		}
		Ok(config)
	}
}

/// Inputs for [`ClientConfig::load`].
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
	/// TOML file to read.
	pub file: Option<PathBuf>,
	/// Whether a missing file is an error (explicit `--config`) or skipped.
	pub file_required: bool,
	/// Value of [`BASE_URL_ENV`].
	pub env_base_url: Option<String>,
	/// Value of the `--base-url` flag.
	pub flag_base_url: Option<String>,
}

impl ConfigLayers {
	/// Layers from the process environment. Without `explicit_file` the
	/// default path is used and may be absent.
	pub fn from_env(explicit_file: Option<PathBuf>, flag_base_url: Option<String>) -> Self {
		let file_required = explicit_file.is_some();
		Self {
			file: explicit_file.or_else(ClientConfig::default_path),
			file_required,
			env_base_url: std::env::var(BASE_URL_ENV).ok(),
			flag_base_url,
		}
	}
}

fn read_file(path: &Path, required: bool) -> Result<ConfigFile, ConfigError> {
	match std::fs::read_to_string(path) {
		Ok(text) => Ok(toml::from_str(&text)?),
		Err(error) if error.kind() == std::io::ErrorKind::NotFound && !required => {
			tracing::debug!(path = %path.display(), "config.file_absent");
			Ok(ConfigFile::default())
		}
		Err(error) => Err(ConfigError::Io {
			path: path.to_path_buf(),
			error,
		}),
	}
}

/// Parses and checks a base URL: absolute, hierarchical, http or https.
pub fn parse_base_url(input: &str) -> Result<Url, ConfigError> {
	let invalid = |reason: String| ConfigError::InvalidBaseUrl {
		url: input.to_string(),
		reason,
	};
	let url = Url::parse(input).map_err(|e| invalid(e.to_string()))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(invalid(format!("unsupported scheme {}", url.scheme())));
	}
	if url.cannot_be_a_base() {
		return Err(invalid("not a hierarchical URL".into()));
	}
	Ok(url)
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	fn write_config(text: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().expect("must create temp file");
		file.write_all(text.as_bytes()).expect("must write config");
		file
	}

	#[test]
	fn file_values_apply() {
		let file = write_config("base_url = \"http://localhost:3000/api\"\ntimeout_secs = 5\ndebounce_ms = 100\n");
		let config = ClientConfig::load(&ConfigLayers {
			file: Some(file.path().to_path_buf()),
			file_required: true,
			..Default::default()
		})
		.unwrap();

		assert_eq!(config.base_url.as_str(), "http://localhost:3000/api");
		assert_eq!(config.timeout, Duration::from_secs(5));
		assert_eq!(config.debounce, Duration::from_millis(100));
	}

	#[test]
	fn flag_beats_env_beats_file() {
		let file = write_config("base_url = \"http://file.test\"\n");
		let mut layers = ConfigLayers {
			file: Some(file.path().to_path_buf()),
			file_required: true,
			env_base_url: Some("http://env.test".into()),
			flag_base_url: Some("http://flag.test".into()),
		};
		assert_eq!(ClientConfig::load(&layers).unwrap().base_url.as_str(), "http://flag.test/");

		layers.flag_base_url = None;
		assert_eq!(ClientConfig::load(&layers).unwrap().base_url.as_str(), "http://env.test/");

		layers.env_base_url = Some("  ".into());
		assert_eq!(ClientConfig::load(&layers).unwrap().base_url.as_str(), "http://file.test/");
	}

	#[test]
	fn missing_default_file_is_skipped_but_explicit_one_is_not() {
		let dir = tempfile::tempdir().expect("must create tempdir");
		let path = dir.path().join("absent.toml");

		let optional = ConfigLayers {
			file: Some(path.clone()),
			flag_base_url: Some("http://localhost".into()),
			..Default::default()
		};
		assert!(ClientConfig::load(&optional).is_ok());

		let required = ConfigLayers {
			file_required: true,
			..optional
		};
		assert!(matches!(ClientConfig::load(&required), Err(ConfigError::Io { .. })));
	}

	#[test]
	fn no_base_url_anywhere() {
		assert!(matches!(ClientConfig::load(&ConfigLayers::default()), Err(ConfigError::MissingBaseUrl)));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let file = write_config("base_url = \"http://localhost\"\nretries = 3\n");
		let layers = ConfigLayers {
			file: Some(file.path().to_path_buf()),
			file_required: true,
			..Default::default()
		};
		assert!(matches!(ClientConfig::load(&layers), Err(ConfigError::Toml(_))));
	}

	#[test]
	fn base_url_must_be_http() {
		assert!(matches!(parse_base_url("ftp://example.com"), Err(ConfigError::InvalidBaseUrl { .. })));
		assert!(matches!(parse_base_url("not a url"), Err(ConfigError::InvalidBaseUrl { .. })));
		assert!(parse_base_url("https://example.com/api/").is_ok());
	}
}
