use std::sync::Arc;

use flowlib_config::Config;
use flowlib_service::SearchService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
	pub revalidate_token: Option<Arc<str>>,
	pub max_page_size: usize,
}
impl AppState {
	/// Builds the service and tries to load the corpus and index up front. A dataset that is not
	/// available yet only delays loading until the first request.
	pub async fn new(config: &Config) -> Self {
		let service = SearchService::new(config);

		if let Err(err) = service.warm().await {
			tracing::warn!(error = %err, "Dataset not loaded at startup.");
		}

		Self::from_service(Arc::new(service), config.security.revalidate_token.clone())
	}

	pub fn from_service(service: Arc<SearchService>, revalidate_token: Option<String>) -> Self {
		let max_page_size = service.pagination().max_page_size;

		Self { service, revalidate_token: revalidate_token.map(Arc::from), max_page_size }
	}
}
