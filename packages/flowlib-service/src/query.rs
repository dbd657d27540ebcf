use std::time::Instant;

use flowlib_domain::{
	FilterState, SearchResponse, SortOption, WorkflowRecord, clamp_page_size_with, page_offset,
};

use crate::{FuzzyIndex, Result, SearchService, filter, sort};

impl SearchService {
	/// Loads the corpus and builds its index ahead of the first query.
	pub async fn warm(&self) -> Result<()> {
		let snapshot = self.store.snapshot().await?;

		self.index.ensure(&snapshot).await?;

		Ok(())
	}

	/// Runs one query through search, filter, sort, and paging, in that order.
	pub async fn execute(
		&self,
		filters: FilterState,
		page: usize,
		page_size: usize,
	) -> Result<SearchResponse> {
		let started = Instant::now();
		let snapshot = self.store.snapshot().await?;
		let index = self.index.ensure(&snapshot).await?;
		let page = page.max(1);
		let page_size = clamp_page_size_with(
			i64::try_from(page_size).ok(),
			self.pagination.default_page_size,
			self.pagination.max_page_size,
		);
		let ordered = select(&index, &filters);
		let total = ordered.len();
		let offset = page_offset(page, page_size);
		let results: Vec<WorkflowRecord> =
			ordered.into_iter().skip(offset).take(page_size).cloned().collect();
		let has_more = offset.saturating_add(page_size) < total;
		let took_ms = round_ms(started.elapsed().as_secs_f64() * 1_000.0);

		tracing::debug!(
			query = filters.trimmed_query(),
			sort = %filters.sort_by,
			total,
			page,
			page_size,
			took_ms,
			"Search executed."
		);

		Ok(SearchResponse { results, total, page, page_size, has_more, took_ms })
	}
}

/// The full ordered result set for `filters`, before paging.
pub fn select<'a>(index: &'a FuzzyIndex, filters: &FilterState) -> Vec<&'a WorkflowRecord> {
	let query = filters.trimmed_query();
	let searched = !index.is_pass_through(query);
	let mut records = filter::apply_filters(index.search(query), filters);

	if !searched || filters.sort_by != SortOption::Relevance {
		sort::sort_records(&mut records, filters.sort_by);
	}

	records
}

fn round_ms(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}
