//! `reqwest` implementation of [`Backend`].

use async_trait::async_trait;
use bistro_schema::{DecodeError, EntityType, FieldErrors, FieldValues, Record};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::backend::Backend;
use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, Result};

/// REST client for `GET/POST/PUT /{entity}[/{id}]` under one base URL.
#[derive(Debug, Clone)]
pub struct RestClient {
	client: Client,
	base_url: Url,
}

impl RestClient {
	/// Builds a client for `config.base_url` with the configured timeout.
	pub fn new(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
		if config.base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl {
				url: config.base_url.to_string(),
				reason: "not a hierarchical URL".into(),
			});
		}

		let client = Client::builder()
			.timeout(config.timeout)
			.build()
			.map_err(|e| ConfigError::Client(e.to_string()))?;

		Ok(Self {
			client,
			base_url: config.base_url.clone(),
		})
	}

	/// `{base}/{entity}` or `{base}/{entity}/{id}`.
	pub fn endpoint(&self, entity: EntityType, id: Option<&str>) -> Url {
		let mut url = self.base_url.clone();
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(entity.path());
			if let Some(id) = id {
				segments.push(id);
			}
		}
		url
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		self.client.request(method, url).header(ACCEPT, "application/json")
	}

	/// Sends the request and returns the decoded JSON body of a 2xx response.
	async fn send(&self, entity: EntityType, id: Option<&str>, request: RequestBuilder) -> Result<Value> {
		let request = request.build().map_err(|e| ApiError::Network(e.to_string()))?;
		let method = request.method().clone();
		let url = request.url().clone();

		let response = self.client.execute(request).await.map_err(|e| {
			tracing::debug!(%method, %url, error = %e, "api.transport_failed");
			ApiError::Network(e.to_string())
		})?;

		let status = response.status();
		tracing::debug!(%method, %url, status = status.as_u16(), "api.response");
		let text = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

		if status.is_success() {
			return serde_json::from_str(&text).map_err(|e| {
				ApiError::Decode(DecodeError::Malformed {
					entity: entity.path(),
					reason: e.to_string(),
				})
			});
		}

		Err(classify_failure(entity, id, status, text))
	}
}

fn classify_failure(entity: EntityType, id: Option<&str>, status: StatusCode, body: String) -> ApiError {
	if status == StatusCode::NOT_FOUND
		&& let Some(id) = id
	{
		return ApiError::NotFound {
			entity,
			id: id.to_string(),
		};
	}

	if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY)
		&& let Some(errors) = serde_json::from_str::<Value>(&body).ok().as_ref().and_then(field_errors)
	{
		return ApiError::Validation(errors);
	}

	ApiError::Server {
		status: status.as_u16(),
		body,
	}
}

/// Reads `{"errors": {"field": "message" | ["message", ...]}}`.
fn field_errors(body: &Value) -> Option<FieldErrors> {
	let errors: FieldErrors = body
		.get("errors")?
		.as_object()?
		.iter()
		.filter_map(|(field, message)| {
			let message = match message {
				Value::String(message) => message.clone(),
				Value::Array(messages) => messages.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "),
				_ => return None,
			};
			Some((field.clone(), message))
		})
		.collect();
	(!errors.is_empty()).then_some(errors)
}

#[async_trait]
impl Backend for RestClient {
	async fn list(&self, entity: EntityType, search: Option<&str>) -> Result<Vec<Record>> {
		let mut url = self.endpoint(entity, None);
		if let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) {
			url.query_pairs_mut().append_pair("search", term);
		}
		let body = self.send(entity, None, self.request(Method::GET, url)).await?;
		Ok(entity.schema().decode_list(&body)?)
	}

	async fn get(&self, entity: EntityType, id: &str) -> Result<Record> {
		let url = self.endpoint(entity, Some(id));
		let body = self.send(entity, Some(id), self.request(Method::GET, url)).await?;
		Ok(entity.schema().decode_record(&body)?)
	}

	async fn create(&self, entity: EntityType, values: &FieldValues) -> Result<Record> {
		let schema = entity.schema();
		let request = self
			.request(Method::POST, self.endpoint(entity, None))
			.header(CONTENT_TYPE, "application/json")
			.json(&schema.encode_values(values));
		let body = self.send(entity, None, request).await?;
		Ok(schema.decode_record(&body)?)
	}

	async fn update(&self, entity: EntityType, id: &str, values: &FieldValues) -> Result<Record> {
		let schema = entity.schema();
		let request = self
			.request(Method::PUT, self.endpoint(entity, Some(id)))
			.header(CONTENT_TYPE, "application/json")
			.json(&schema.encode_values(values));
		let body = self.send(entity, Some(id), request).await?;
		Ok(schema.decode_record(&body)?)
	}
}

#[cfg(test)]
mod tests;
