use axum::{
	Json, Router,
	body::Bytes,
	extract::{Path, RawQuery, State},
	http::{HeaderMap, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::state::AppState;
use flowlib_domain::{
	FilterState, clamp_page, clamp_page_size_with,
	filter_state::{PARAM_PAGE, PARAM_PAGE_SIZE},
	parse_int_prefix,
};
use flowlib_service::{
	Error,
	catalog::{FEATURED_LIMIT, LATEST_LIMIT, RELATED_LIMIT},
};

pub const SEARCH_FAILURE_MESSAGE: &str = "Unable to perform search at this time.";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

const PARAM_LIMIT: &str = "limit";
const PARAM_SECRET: &str = "secret";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/workflows/search", get(search))
		.route("/api/workflows/featured", get(featured))
		.route("/api/workflows/latest", get(latest))
		.route("/api/workflows/{slug}", get(workflow))
		.route("/api/workflows/{slug}/related", get(related))
		.route("/api/categories", get(categories))
		.route("/api/integrations", get(integrations))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/api/workflows/revalidate", post(revalidate)).with_state(state)
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
	success: bool,
	data: T,
}
impl<T> Envelope<T> {
	fn ok(data: T) -> Json<Self> {
		Json(Self { success: true, data })
	}
}

#[derive(Debug, Serialize)]
struct Failure {
	success: bool,
	error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RevalidateBody {
	#[serde(default)]
	dataset_hash: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RevalidateResponse {
	success: bool,
	dataset_hash: Option<String>,
	timestamp: String,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let pairs = query_pairs(raw.as_deref());
	let filters = FilterState::from_query_pairs(pairs.iter().map(|(key, value)| (key, value)));
	let page = clamp_page(int_param(&pairs, PARAM_PAGE));
	let pagination = state.service.pagination();
	let page_size = clamp_page_size_with(
		int_param(&pairs, PARAM_PAGE_SIZE),
		pagination.default_page_size,
		pagination.max_page_size,
	);
	let response = state.service.execute(filters, page, page_size).await?;

	Ok(Envelope::ok(response).into_response())
}

async fn featured(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
	let limit = limit_param(raw.as_deref(), FEATURED_LIMIT, state.max_page_size);

	Envelope::ok(state.service.featured(limit).await).into_response()
}

async fn latest(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
	let limit = limit_param(raw.as_deref(), LATEST_LIMIT, state.max_page_size);

	Envelope::ok(state.service.latest(limit).await).into_response()
}

async fn workflow(
	State(state): State<AppState>,
	Path(slug): Path<String>,
) -> Result<Response, ApiError> {
	let record = state.service.workflow(&slug).await?;

	Ok(Envelope::ok(record).into_response())
}

async fn related(
	State(state): State<AppState>,
	Path(slug): Path<String>,
) -> Result<Response, ApiError> {
	let records = state.service.related(&slug, RELATED_LIMIT).await?;

	Ok(Envelope::ok(records).into_response())
}

async fn categories(State(state): State<AppState>) -> Response {
	Envelope::ok(state.service.categories().await).into_response()
}

async fn integrations(State(state): State<AppState>) -> Response {
	Envelope::ok(state.service.integrations().await).into_response()
}

async fn revalidate(
	State(state): State<AppState>,
	headers: HeaderMap,
	RawQuery(raw): RawQuery,
	body: Bytes,
) -> Result<Response, ApiError> {
	if let Some(token) = state.revalidate_token.as_deref()
		&& !is_authorized(token, &headers, raw.as_deref())
	{
		return Err(ApiError::Unauthorized);
	}

	let body = if body.is_empty() {
		RevalidateBody::default()
	} else {
		serde_json::from_slice(&body).unwrap_or_default()
	};

	state.service.store().invalidate();

	tracing::info!(dataset_hash = ?body.dataset_hash, "Dataset revalidation requested.");

	let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();

	Ok(Json(RevalidateResponse { success: true, dataset_hash: body.dataset_hash, timestamp })
		.into_response())
}

fn is_authorized(token: &str, headers: &HeaderMap, raw_query: Option<&str>) -> bool {
	let bearer = headers
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| {
			let (scheme, credentials) = value.split_once(' ')?;

			scheme.eq_ignore_ascii_case("bearer").then(|| credentials.trim())
		});

	if bearer == Some(token) {
		return true;
	}

	query_pairs(raw_query).iter().any(|(key, value)| key == PARAM_SECRET && value == token)
}

fn query_pairs(raw: Option<&str>) -> Vec<(String, String)> {
	url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()).into_owned().collect()
}

fn int_param(pairs: &[(String, String)], name: &str) -> Option<i64> {
	pairs.iter().find(|(key, _)| key == name).and_then(|(_, value)| parse_int_prefix(value))
}

fn limit_param(raw: Option<&str>, default: usize, max: usize) -> usize {
	let max = max.max(1);

	match int_param(&query_pairs(raw), PARAM_LIMIT) {
		Some(limit) if limit >= 1 => usize::try_from(limit).unwrap_or(max).min(max),
		_ => default.min(max),
	}
}

#[derive(Debug)]
pub enum ApiError {
	Service(Error),
	Unauthorized,
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		Self::Service(err)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, message) = match self {
			Self::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
			Self::Service(Error::NotFound { message }) => (StatusCode::NOT_FOUND, message),
			Self::Service(err) => {
				tracing::error!(error = %err, "Request failed.");

				(StatusCode::INTERNAL_SERVER_ERROR, SEARCH_FAILURE_MESSAGE.to_string())
			},
		};

		(status, Json(Failure { success: false, error: message })).into_response()
	}
}
