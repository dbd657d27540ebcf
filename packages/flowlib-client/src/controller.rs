use std::sync::{Arc, Mutex, MutexGuard};

use tokio::{sync::watch, task::JoinHandle};

use crate::{Result, SearchTransport};
use flowlib_domain::{DEFAULT_PAGE_SIZE, FilterState, SearchResponse, WorkflowRecord};

pub const DEFAULT_BASE_PATH: &str = "/search";

#[derive(Clone, Debug)]
pub struct ControllerOptions {
	/// Path the filter state is encoded onto, e.g. `/search`.
	pub base_path: String,
	pub page_size: usize,
}
impl Default for ControllerOptions {
	fn default() -> Self {
		Self { base_path: DEFAULT_BASE_PATH.to_string(), page_size: DEFAULT_PAGE_SIZE }
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadingMode {
	#[default]
	Idle,
	/// A page-1 query after a filter or query change.
	Filters,
	/// A next-page query whose results extend the current list.
	Append,
}
impl LoadingMode {
	pub fn is_loading(self) -> bool {
		self != Self::Idle
	}
}

/// Everything a view needs to render the search page.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
	pub filters: FilterState,
	pub results: Vec<WorkflowRecord>,
	pub total: usize,
	pub page: usize,
	pub has_more: bool,
	pub latency_ms: f64,
	pub loading: LoadingMode,
	pub error: Option<String>,
	/// Location reflecting `filters`.
	pub url: String,
}
impl ViewState {
	fn new(filters: FilterState, base_path: &str) -> Self {
		let url = filters.to_url(base_path);

		Self {
			filters,
			results: Vec::new(),
			total: 0,
			page: 1,
			has_more: false,
			latency_ms: 0.0,
			loading: LoadingMode::Idle,
			error: None,
			url,
		}
	}

	pub fn remaining(&self) -> usize {
		self.total.saturating_sub(self.results.len())
	}

	fn clear_results(&mut self) {
		self.results.clear();
		self.total = 0;
		self.page = 1;
		self.has_more = false;
	}

	fn apply(&mut self, response: SearchResponse, merge: Merge) {
		match merge {
			Merge::Replace => self.results = response.results,
			Merge::Append => self.results.extend(response.results),
		}

		self.total = response.total;
		self.page = response.page;
		self.has_more = response.has_more;
		self.latency_ms = response.took_ms;
		self.error = None;
	}
}

#[derive(Clone, Copy, Debug)]
enum Merge {
	Replace,
	Append,
}

#[derive(Default)]
struct Requests {
	/// Sequence number of the latest filter-driven query.
	seq: u64,
	in_flight: Vec<JoinHandle<()>>,
}

struct Inner {
	transport: Arc<dyn SearchTransport>,
	options: ControllerOptions,
	state: watch::Sender<ViewState>,
	requests: Mutex<Requests>,
}
impl Inner {
	fn lock_requests(&self) -> MutexGuard<'_, Requests> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner())
	}

	// Aborting superseded tasks is the primary guard. The sequence check covers a response
	// that completed before the abort took effect.
	fn finish(&self, seq: u64, outcome: Result<SearchResponse>, merge: Merge) {
		let requests = self.lock_requests();

		if requests.seq != seq {
			tracing::debug!(seq, latest = requests.seq, "Discarded a superseded search response.");

			return;
		}

		match outcome {
			Ok(response) => self.state.send_modify(|state| {
				state.apply(response, merge);
				state.loading = LoadingMode::Idle;
			}),
			Err(err) => {
				tracing::warn!(seq, error = %err, "Search request failed.");

				self.state.send_modify(|state| {
					// Results of the previous filters must not be extended under the new ones.
					if matches!(merge, Merge::Replace) {
						state.clear_results();
					}

					state.error = Some(err.to_string());
					state.loading = LoadingMode::Idle;
				});
			},
		}
	}
}

/// Owns the filter state of one search view and keeps its results in step with it.
///
/// Filter changes abort every in-flight request and start a new page-1 query under a fresh
/// sequence number. Only responses carrying the latest sequence number are applied.
#[derive(Clone)]
pub struct QueryController {
	inner: Arc<Inner>,
}
impl QueryController {
	pub fn new(
		transport: Arc<dyn SearchTransport>,
		options: ControllerOptions,
		filters: FilterState,
	) -> Self {
		let (state, _) = watch::channel(ViewState::new(filters, &options.base_path));

		Self {
			inner: Arc::new(Inner {
				transport,
				options,
				state,
				requests: Mutex::new(Requests::default()),
			}),
		}
	}

	/// A controller whose first page was already fetched, e.g. while rendering the page.
	pub fn with_initial(
		transport: Arc<dyn SearchTransport>,
		options: ControllerOptions,
		filters: FilterState,
		response: SearchResponse,
	) -> Self {
		let controller = Self::new(transport, options, filters);

		controller.inner.state.send_modify(|state| state.apply(response, Merge::Replace));

		controller
	}

	pub fn subscribe(&self) -> watch::Receiver<ViewState> {
		self.inner.state.subscribe()
	}

	pub fn snapshot(&self) -> ViewState {
		self.inner.state.borrow().clone()
	}

	/// Returns `false` when `next` equals the current filters.
	pub fn set_filters(&self, next: FilterState) -> bool {
		let mut requests = self.inner.lock_requests();

		if self.inner.state.borrow().filters == next {
			return false;
		}

		let url = next.to_url(&self.inner.options.base_path);

		self.start_filter_query(&mut requests, next, url);

		true
	}

	pub fn set_query(&self, query: impl Into<String>) -> bool {
		let mut next = self.inner.state.borrow().filters.clone();

		next.query = query.into();

		self.set_filters(next)
	}

	/// Re-runs page 1 for the current filters.
	pub fn refresh(&self) {
		let mut requests = self.inner.lock_requests();
		let (filters, url) = {
			let state = self.inner.state.borrow();

			(state.filters.clone(), state.url.clone())
		};

		self.start_filter_query(&mut requests, filters, url);
	}

	/// Adopts filters from an externally changed location (back/forward navigation). Returns
	/// `false` without querying when the location already matches the current filters.
	pub fn sync_from_url(&self, query_string: &str) -> bool {
		let filters = FilterState::from_query_string(query_string);
		let url = filters.to_url(&self.inner.options.base_path);
		let mut requests = self.inner.lock_requests();

		if self.inner.state.borrow().url == url {
			return false;
		}

		self.start_filter_query(&mut requests, filters, url);

		true
	}

	/// Requests the next page. Ignored when nothing is left or a request is already loading.
	pub fn load_more(&self) -> bool {
		let mut requests = self.inner.lock_requests();
		let (filters, page) = {
			let state = self.inner.state.borrow();

			if !state.has_more || state.loading.is_loading() {
				return false;
			}

			(state.filters.clone(), state.page + 1)
		};
		let seq = requests.seq;

		self.inner.state.send_modify(|state| {
			state.loading = LoadingMode::Append;
			state.error = None;
		});
		requests.in_flight.retain(|handle| !handle.is_finished());
		requests.in_flight.push(self.spawn_request(seq, filters, page, Merge::Append));

		true
	}

	/// Waits until no request is loading and returns the resulting state.
	pub async fn settled(&self) -> ViewState {
		let mut receiver = self.subscribe();

		match receiver.wait_for(|state| !state.loading.is_loading()).await {
			Ok(state) => state.clone(),
			Err(_) => self.snapshot(),
		}
	}

	fn start_filter_query(&self, requests: &mut Requests, filters: FilterState, url: String) {
		for handle in requests.in_flight.drain(..) {
			handle.abort();
		}

		requests.seq += 1;

		let seq = requests.seq;

		tracing::debug!(seq, url = %url, "Filter query started.");

		self.inner.state.send_modify(|state| {
			state.filters = filters.clone();
			state.url = url;
			state.loading = LoadingMode::Filters;
			state.error = None;
		});
		requests.in_flight.push(self.spawn_request(seq, filters, 1, Merge::Replace));
	}

	fn spawn_request(
		&self,
		seq: u64,
		filters: FilterState,
		page: usize,
		merge: Merge,
	) -> JoinHandle<()> {
		let inner = self.inner.clone();

		tokio::spawn(async move {
			let outcome = inner.transport.search(&filters, page, inner.options.page_size).await;

			inner.finish(seq, outcome, merge);
		})
	}
}
