use std::io::Read;
use std::thread::{self, JoinHandle};

use bistro_schema::{FieldValue, parse_date};
use pretty_assertions::assert_eq;
use serde_json::json;
use tiny_http::{Header, Response, Server};

use super::*;

fn oct_16() -> FieldValue {
	FieldValue::Date(parse_date("2026-10-16").expect("valid date"))
}

#[derive(Debug)]
struct Captured {
	method: String,
	url: String,
	body: String,
}

/// Serves `responses` in order on an ephemeral port and returns the
/// requests it saw once all responses have been sent.
fn serve(responses: Vec<(u16, &'static str)>) -> (ClientConfig, JoinHandle<Vec<Captured>>) {
	let server = Server::http("127.0.0.1:0").expect("must bind test server");
	let port = server.server_addr().to_ip().expect("tcp listener").port();
	let base_url = Url::parse(&format!("http://127.0.0.1:{port}/api/")).expect("valid url");

	let handle = thread::spawn(move || {
		let mut captured = Vec::new();
		for (status, body) in responses {
			let mut request = server.recv().expect("request");
			let mut text = String::new();
			request.as_reader().read_to_string(&mut text).expect("request body");
			captured.push(Captured {
				method: request.method().to_string(),
				url: request.url().to_string(),
				body: text,
			});
			let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).expect("header");
			request
				.respond(Response::from_string(body).with_status_code(status).with_header(header))
				.expect("respond");
		}
		captured
	});

	(ClientConfig::new(base_url), handle)
}

#[tokio::test]
async fn list_decodes_records_and_sends_search_term() {
	let (config, server) = serve(vec![(
		200,
		r#"[{"id":"r1","name":"Chez Nous","owner_id":"u1","created_at":"2026-10-16T00:00:00.000Z","updated_at":"2026-10-16"}]"#,
	)]);
	let client = RestClient::new(&config).unwrap();

	let records = client.list(EntityType::Restaurants, Some("chez nous")).await.unwrap();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].id(), "r1");
	assert_eq!(records[0].get("created_at"), Some(oct_16()));

	let captured = server.join().unwrap();
	assert_eq!(captured[0].method, "GET");
	assert_eq!(captured[0].url, "/api/restaurants?search=chez+nous");
}

#[tokio::test]
async fn blank_search_sends_no_query() {
	let (config, server) = serve(vec![(200, "[]")]);
	let client = RestClient::new(&config).unwrap();

	assert!(client.list(EntityType::Users, Some("  ")).await.unwrap().is_empty());
	assert_eq!(server.join().unwrap()[0].url, "/api/users");
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
	let (config, server) = serve(vec![(404, r#"{"message":"nope"}"#)]);
	let client = RestClient::new(&config).unwrap();

	let err = client.get(EntityType::Users, "u9").await.unwrap_err();
	assert_eq!(
		err,
		ApiError::NotFound {
			entity: EntityType::Users,
			id: "u9".into()
		}
	);
	assert_eq!(server.join().unwrap()[0].url, "/api/users/u9");
}

#[tokio::test]
async fn list_404_is_a_server_error() {
	let (config, server) = serve(vec![(404, "missing")]);
	let client = RestClient::new(&config).unwrap();

	let err = client.list(EntityType::Menus, None).await.unwrap_err();
	assert_eq!(
		err,
		ApiError::Server {
			status: 404,
			body: "missing".into()
		}
	);
	server.join().unwrap();
}

#[tokio::test]
async fn create_posts_encoded_values() {
	let (config, server) = serve(vec![(
		201,
		r#"{"id":"f1","rating":5,"comment":"great","customer_id":"u1","restaurant_id":"r1","created_at":"2026-10-16T00:00:00.000Z","updated_at":"2026-10-16T00:00:00.000Z"}"#,
	)]);
	let client = RestClient::new(&config).unwrap();

	let mut values = FieldValues::new();
	values.insert("rating".into(), FieldValue::Integer(5));
	values.insert("comment".into(), FieldValue::text("great"));
	values.insert("created_at".into(), oct_16());

	let created = client.create(EntityType::Feedbacks, &values).await.unwrap();
	assert_eq!(created.id(), "f1");

	let captured = server.join().unwrap();
	assert_eq!(captured[0].method, "POST");
	assert_eq!(captured[0].url, "/api/feedbacks");
	let body: Value = serde_json::from_str(&captured[0].body).unwrap();
	assert_eq!(body, json!({ "rating": 5, "comment": "great", "created_at": "2026-10-16T00:00:00.000Z" }));
}

#[tokio::test]
async fn save_with_id_puts_to_record_path() {
	let (config, server) = serve(vec![(200, r#"{"id":"u1","role":"owner"}"#)]);
	let client = RestClient::new(&config).unwrap();

	let mut values = FieldValues::new();
	values.insert("role".into(), FieldValue::text("owner"));
	let updated = client.save(EntityType::Users, Some("u1"), &values).await.unwrap();
	assert_eq!(updated.get("role"), Some(FieldValue::text("owner")));

	let captured = server.join().unwrap();
	assert_eq!(captured[0].method, "PUT");
	assert_eq!(captured[0].url, "/api/users/u1");
}

#[tokio::test]
async fn unprocessable_entity_maps_field_errors() {
	let (config, server) = serve(vec![(
		422,
		r#"{"errors":{"role":"role is taken","created_at":["must be in the past","is required"]}}"#,
	)]);
	let client = RestClient::new(&config).unwrap();

	let err = client.update(EntityType::Users, "u1", &FieldValues::new()).await.unwrap_err();
	let errors = err.field_errors().expect("validation error");
	assert_eq!(errors.get("role").map(String::as_str), Some("role is taken"));
	assert_eq!(errors.get("created_at").map(String::as_str), Some("must be in the past, is required"));
	server.join().unwrap();
}

#[tokio::test]
async fn bad_request_without_detail_is_a_server_error() {
	let (config, server) = serve(vec![(400, r#"{"message":"bad"}"#)]);
	let client = RestClient::new(&config).unwrap();

	let err = client.create(EntityType::Users, &FieldValues::new()).await.unwrap_err();
	assert!(matches!(err, ApiError::Server { status: 400, .. }));
	server.join().unwrap();
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
	let (config, server) = serve(vec![(200, "<html>")]);
	let client = RestClient::new(&config).unwrap();

	let err = client.list(EntityType::Users, None).await.unwrap_err();
	assert!(matches!(err, ApiError::Decode(DecodeError::Malformed { entity: "users", .. })));
	server.join().unwrap();
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
	let port = {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		listener.local_addr().unwrap().port()
	};
	let config = ClientConfig::new(Url::parse(&format!("http://127.0.0.1:{port}")).unwrap());
	let client = RestClient::new(&config).unwrap();

	let err = client.list(EntityType::Restaurants, None).await.unwrap_err();
	assert!(matches!(err, ApiError::Network(_)));
}

#[test]
fn endpoint_handles_trailing_slash_and_ids() {
	let with_slash = RestClient::new(&ClientConfig::new(Url::parse("http://localhost:3000/api/").unwrap())).unwrap();
	let without = RestClient::new(&ClientConfig::new(Url::parse("http://localhost:3000").unwrap())).unwrap();

	assert_eq!(with_slash.endpoint(EntityType::MenuItems, None).as_str(), "http://localhost:3000/api/menu-items");
	assert_eq!(without.endpoint(EntityType::MenuItems, Some("m 1")).as_str(), "http://localhost:3000/menu-items/m%201");
}

#[test]
fn rejects_non_hierarchical_base() {
	let config = ClientConfig::new(Url::parse("mailto:admin@example.com").unwrap());
	assert!(matches!(RestClient::new(&config), Err(ConfigError::InvalidBaseUrl { .. })));
}
