use flowlib_domain::{Category, IntegrationSummary, SortOption, WorkflowRecord};

use crate::{Error, Result, SearchService, sort};

pub const FEATURED_LIMIT: usize = 12;
pub const LATEST_LIMIT: usize = 12;
pub const RELATED_LIMIT: usize = 6;

const FEATURED_MIN_QUALITY: u8 = 4;

impl SearchService {
	/// High-quality records, curated first, then by quality.
	pub async fn featured(&self, limit: usize) -> Vec<WorkflowRecord> {
		let snapshot = self.store.corpus_or_empty().await;
		let mut records: Vec<&WorkflowRecord> = snapshot
			.records()
			.iter()
			.filter(|record| record.quality >= FEATURED_MIN_QUALITY)
			.collect();

		records.sort_by(|lhs, rhs| {
			rhs.source
				.is_curated()
				.cmp(&lhs.source.is_curated())
				.then_with(|| rhs.quality.cmp(&lhs.quality))
		});

		records.into_iter().take(limit).cloned().collect()
	}

	pub async fn latest(&self, limit: usize) -> Vec<WorkflowRecord> {
		let snapshot = self.store.corpus_or_empty().await;
		let mut records: Vec<&WorkflowRecord> = snapshot.records().iter().collect();

		sort::sort_records(&mut records, SortOption::Newest);

		records.into_iter().take(limit).cloned().collect()
	}

	/// Other records ranked by how much they share with `slug`.
	pub async fn related(&self, slug: &str, limit: usize) -> Result<Vec<WorkflowRecord>> {
		let snapshot = self.store.snapshot().await?;
		let target = snapshot.find(slug).ok_or_else(|| not_found(slug))?;
		let mut scored: Vec<(u32, &WorkflowRecord)> = snapshot
			.records()
			.iter()
			.filter(|record| record.slug != target.slug)
			.map(|record| (relatedness(target, record), record))
			.collect();

		scored.sort_by(|lhs, rhs| rhs.0.cmp(&lhs.0));

		Ok(scored.into_iter().take(limit).map(|(_, record)| record.clone()).collect())
	}

	pub async fn workflow(&self, slug: &str) -> Result<WorkflowRecord> {
		let snapshot = self.store.snapshot().await?;

		snapshot.find(slug).cloned().ok_or_else(|| not_found(slug))
	}

	pub async fn by_category(&self, slug: &str) -> Vec<WorkflowRecord> {
		let snapshot = self.store.corpus_or_empty().await;

		snapshot.records().iter().filter(|record| record.category == slug).cloned().collect()
	}

	pub async fn by_integration(&self, slug: &str) -> Vec<WorkflowRecord> {
		let snapshot = self.store.corpus_or_empty().await;

		snapshot.records().iter().filter(|record| record.has_integration(slug)).cloned().collect()
	}

	pub async fn categories(&self) -> Vec<Category> {
		self.store.categories().await
	}

	pub async fn integrations(&self) -> Vec<IntegrationSummary> {
		self.store.integrations().await
	}
}

/// +3 for the same category, +2 per shared integration, +1 for the same trigger, plus the
/// candidate's quality.
pub fn relatedness(target: &WorkflowRecord, candidate: &WorkflowRecord) -> u32 {
	let mut score = u32::from(candidate.quality);

	if candidate.category == target.category {
		score += 3;
	}

	let shared = candidate.integrations.iter().filter(|slug| target.has_integration(slug)).count();

	score += 2 * shared as u32;

	if candidate.trigger_type == target.trigger_type {
		score += 1;
	}

	score
}

fn not_found(slug: &str) -> Error {
	Error::NotFound { message: format!("No workflow with slug {slug:?}.") }
}
