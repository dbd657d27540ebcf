use std::{future::Future, pin::Pin, time::Duration};

use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result};
use flowlib_domain::{FilterState, SearchResponse};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub const SEARCH_PATH: &str = "/api/workflows/search";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches one page of results for a filter state.
pub trait SearchTransport
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		filters: &'a FilterState,
		page: usize,
		page_size: usize,
	) -> BoxFuture<'a, Result<SearchResponse>>;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
	client: Client,
	api_base: String,
}
impl HttpTransport {
	pub fn new(api_base: &str) -> Result<Self> {
		Self::with_timeout(api_base, DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(api_base: &str, timeout: Duration) -> Result<Self> {
		let client = Client::builder().timeout(timeout).build()?;

		Ok(Self { client, api_base: normalize_api_base(api_base) })
	}

	pub fn api_base(&self) -> &str {
		&self.api_base
	}

	pub fn search_url(&self, filters: &FilterState, page: usize, page_size: usize) -> String {
		format!("{}{SEARCH_PATH}?{}", self.api_base, filters.to_request_query(page, page_size))
	}
}
impl SearchTransport for HttpTransport {
	fn search<'a>(
		&'a self,
		filters: &'a FilterState,
		page: usize,
		page_size: usize,
	) -> BoxFuture<'a, Result<SearchResponse>> {
		Box::pin(async move {
			let response = self.client.get(self.search_url(filters, page, page_size)).send().await?;
			let status = response.status();

			if !status.is_success() {
				return Err(Error::Status { status: status.as_u16() });
			}

			let body = response.bytes().await?;

			decode_envelope(&body)
		})
	}
}

#[derive(Debug, Deserialize)]
struct Envelope {
	success: bool,
	#[serde(default)]
	data: Option<SearchResponse>,
	#[serde(default)]
	error: Option<String>,
}

/// Unwraps the `{ success, data | error }` envelope returned by the search endpoint.
pub fn decode_envelope(body: &[u8]) -> Result<SearchResponse> {
	let envelope: Envelope = serde_json::from_slice(body)?;

	if !envelope.success {
		return Err(Error::Api {
			message: envelope.error.unwrap_or_else(|| "Search failed".to_string()),
		});
	}

	envelope
		.data
		.ok_or_else(|| Error::Api { message: "Search response is missing data.".to_string() })
}

fn normalize_api_base(raw: &str) -> String {
	let trimmed = raw.trim().trim_end_matches('/');

	if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
		trimmed.to_string()
	} else {
		format!("http://{trimmed}")
	}
}
