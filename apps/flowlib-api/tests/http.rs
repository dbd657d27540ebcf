use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::util::ServiceExt;

use flowlib_api::{routes, state::AppState};
use flowlib_config::Config;
use flowlib_testkit::{TestDataset, fixtures};

fn scenario_dataset() -> TestDataset {
	TestDataset::with_records(&fixtures::scenario_corpus()).expect("Failed to write dataset.")
}

async fn app(config: &Config) -> Router {
	routes::router(AppState::new(config).await)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
	let response = app
		.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call endpoint.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let json = serde_json::from_slice(&bytes).expect("Failed to parse response.");

	(status, json)
}

async fn post_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call endpoint.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let json = serde_json::from_slice(&bytes).expect("Failed to parse response.");

	(status, json)
}

fn slugs(data: &Value) -> Vec<String> {
	data.as_array()
		.expect("Expected an array.")
		.iter()
		.map(|record| record["slug"].as_str().expect("Expected a slug.").to_string())
		.collect()
}

#[tokio::test]
async fn health_ok() {
	let dataset = scenario_dataset();
	let request =
		Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request.");
	let response =
		app(&dataset.config()).await.oneshot(request).await.expect("Failed to call health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_defaults_to_quality_order() {
	let dataset = scenario_dataset();
	let (status, json) = get_json(app(&dataset.config()).await, "/api/workflows/search").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["success"], true);
	assert_eq!(json["data"]["total"], 5);
	assert_eq!(json["data"]["page"], 1);
	assert_eq!(json["data"]["pageSize"], 24);
	assert_eq!(json["data"]["hasMore"], false);
	assert!(json["data"]["tookMs"].is_number());
	assert_eq!(
		slugs(&json["data"]["results"]),
		vec![
			"a-ticket-tagger",
			"c-chat-digest",
			"e-invoice-router",
			"b-blog-drafts",
			"d-standup-reminder"
		]
	);
}

#[tokio::test]
async fn search_applies_filters_and_paging() {
	let dataset = scenario_dataset();
	let app = app(&dataset.config()).await;
	let (_, json) =
		get_json(app.clone(), "/api/workflows/search?sort=name&page=2.9&pageSize=2").await;

	assert_eq!(json["data"]["page"], 2);
	assert_eq!(json["data"]["pageSize"], 2);
	assert_eq!(json["data"]["hasMore"], true);
	assert_eq!(slugs(&json["data"]["results"]), vec!["c-chat-digest", "d-standup-reminder"]);

	let (_, json) =
		get_json(app, "/api/workflows/search?category=ai&source=awesome&quality=bogus").await;

	assert_eq!(json["data"]["total"], 2);
	assert_eq!(slugs(&json["data"]["results"]), vec!["a-ticket-tagger", "e-invoice-router"]);
}

#[tokio::test]
async fn search_clamps_invalid_paging() {
	let dataset = scenario_dataset();
	let app = app(&dataset.config()).await;
	let (_, json) = get_json(app.clone(), "/api/workflows/search?page=0&pageSize=abc").await;

	assert_eq!(json["data"]["page"], 1);
	assert_eq!(json["data"]["pageSize"], 24);

	let (_, json) = get_json(app, "/api/workflows/search?page=-3&pageSize=10000").await;

	assert_eq!(json["data"]["page"], 1);
	assert_eq!(json["data"]["pageSize"], 48);
}

#[tokio::test]
async fn search_fails_without_a_dataset() {
	let dataset = TestDataset::new().expect("Failed to create dataset dir.");
	let app = app(&dataset.config()).await;
	let (status, json) = get_json(app.clone(), "/api/workflows/search?q=slack").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json["success"], false);
	assert_eq!(json["error"], routes::SEARCH_FAILURE_MESSAGE);

	let (status, json) = get_json(app, "/api/workflows/featured").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["data"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn workflow_lookup_and_related() {
	let dataset = scenario_dataset();
	let app = app(&dataset.config()).await;
	let (status, json) = get_json(app.clone(), "/api/workflows/c-chat-digest").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["data"]["name"], "Chat digest to Slack");

	let (status, json) = get_json(app.clone(), "/api/workflows/missing").await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["success"], false);

	let (status, json) = get_json(app, "/api/workflows/a-ticket-tagger/related").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		slugs(&json["data"]),
		vec!["b-blog-drafts", "e-invoice-router", "c-chat-digest", "d-standup-reminder"]
	);
}

#[tokio::test]
async fn listings_respect_limits() {
	let dataset = scenario_dataset();
	let app = app(&dataset.config()).await;
	let (_, json) = get_json(app.clone(), "/api/workflows/featured?limit=2").await;

	assert_eq!(slugs(&json["data"]), vec!["a-ticket-tagger", "e-invoice-router"]);

	let (_, json) = get_json(app.clone(), "/api/workflows/latest?limit=1").await;

	assert_eq!(json["data"].as_array().map(Vec::len), Some(1));

	let (_, json) = get_json(app.clone(), "/api/categories").await;

	assert_eq!(json["data"][0]["slug"], "ai");

	let (_, json) = get_json(app, "/api/integrations").await;

	assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
}

fn revalidate_request(uri: &str, authorization: Option<&str>, body: &str) -> Request<Body> {
	let mut builder = Request::builder().method("POST").uri(uri);

	if let Some(value) = authorization {
		builder = builder.header(header::AUTHORIZATION, value);
	}

	builder.body(Body::from(body.to_string())).expect("Failed to build request.")
}

#[tokio::test]
async fn revalidate_requires_the_configured_token() {
	let dataset = scenario_dataset();
	let mut config = dataset.config();

	config.security.revalidate_token = Some("s3cret".to_string());

	let admin = routes::admin_router(AppState::new(&config).await);
	let (status, json) =
		post_json(admin.clone(), revalidate_request("/api/workflows/revalidate", None, "")).await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(json["error"], routes::UNAUTHORIZED_MESSAGE);

	let (status, json) = post_json(
		admin.clone(),
		revalidate_request(
			"/api/workflows/revalidate",
			Some("Bearer s3cret"),
			r#"{"datasetHash":"abc123"}"#,
		),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["success"], true);
	assert_eq!(json["datasetHash"], "abc123");
	assert!(json["timestamp"].as_str().is_some_and(|ts| ts.contains('T')));

	let (status, json) = post_json(
		admin,
		revalidate_request("/api/workflows/revalidate?secret=s3cret", None, "not json"),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["datasetHash"], Value::Null);
}

#[tokio::test]
async fn revalidate_reloads_the_dataset() {
	let dataset = scenario_dataset();
	let state = AppState::new(&dataset.config()).await;
	let app = routes::router(state.clone());
	let admin = routes::admin_router(state);
	let (_, json) = get_json(app.clone(), "/api/workflows/search").await;

	assert_eq!(json["data"]["total"], 5);

	dataset
		.write_records(&[fixtures::workflow("solo", "Only workflow")])
		.expect("Failed to rewrite dataset.");

	let (_, json) = get_json(app.clone(), "/api/workflows/search").await;

	assert_eq!(json["data"]["total"], 5, "snapshot is kept until revalidated");

	let (status, _) =
		post_json(admin, revalidate_request("/api/workflows/revalidate", None, "")).await;

	assert_eq!(status, StatusCode::OK);

	let (_, json) = get_json(app, "/api/workflows/search").await;

	assert_eq!(json["data"]["total"], 1);
	assert_eq!(slugs(&json["data"]["results"]), vec!["solo"]);
}
