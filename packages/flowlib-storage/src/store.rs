use std::{
	sync::{Arc, RwLock},
	time::{Duration, Instant},
};

use flowlib_config::Data;
use flowlib_domain::{Category, IntegrationSummary, WorkflowRecord};

use crate::{DatasetIdentity, Result, dataset};

/// An immutable view of the corpus together with the identity it was loaded under.
#[derive(Debug)]
pub struct CorpusSnapshot {
	records: Vec<WorkflowRecord>,
	identity: DatasetIdentity,
	loaded_at: Instant,
}
impl CorpusSnapshot {
	pub fn new(records: Vec<WorkflowRecord>, identity: DatasetIdentity) -> Self {
		Self { records, identity, loaded_at: Instant::now() }
	}

	pub fn from_records(records: Vec<WorkflowRecord>) -> Self {
		let identity = DatasetIdentity::from_records(&records);

		Self::new(records, identity)
	}

	pub fn empty() -> Self {
		Self::from_records(Vec::new())
	}

	pub fn records(&self) -> &[WorkflowRecord] {
		&self.records
	}

	pub fn identity(&self) -> &DatasetIdentity {
		&self.identity
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn age(&self) -> Duration {
		self.loaded_at.elapsed()
	}

	pub fn find(&self, slug: &str) -> Option<&WorkflowRecord> {
		self.records.iter().find(|record| record.slug == slug)
	}
}

#[derive(Debug)]
enum Backing {
	Files(Data),
	Memory,
}

/// Process-wide owner of the corpus. Readers share an `Arc` to the current snapshot; reloads
/// build a complete snapshot before swapping it in.
#[derive(Debug)]
pub struct RecordStore {
	backing: Backing,
	reload_interval: Option<Duration>,
	current: RwLock<Option<Arc<CorpusSnapshot>>>,
}
impl RecordStore {
	pub fn from_config(data: &Data) -> Self {
		let reload_interval = (data.reload_interval_secs > 0)
			.then(|| Duration::from_secs(data.reload_interval_secs));

		Self { backing: Backing::Files(data.clone()), reload_interval, current: RwLock::new(None) }
	}

	/// A store over records that live only in memory. `replace_records` is the only way to
	/// change its content.
	pub fn in_memory(records: Vec<WorkflowRecord>) -> Self {
		Self {
			backing: Backing::Memory,
			reload_interval: None,
			current: RwLock::new(Some(Arc::new(CorpusSnapshot::from_records(records)))),
		}
	}

	/// The current snapshot, loading it first when needed. Load failures propagate.
	pub async fn snapshot(&self) -> Result<Arc<CorpusSnapshot>> {
		let cached = self.cached();

		if let Some(snapshot) = cached.as_ref()
			&& !self.is_stale(snapshot)
		{
			return Ok(snapshot.clone());
		}

		let Backing::Files(data) = &self.backing else {
			return Ok(cached.unwrap_or_else(|| Arc::new(CorpusSnapshot::empty())));
		};

		match dataset::load_corpus(data).await {
			Ok(loaded) => {
				let snapshot = Arc::new(CorpusSnapshot::new(loaded.records, loaded.identity));

				tracing::info!(
					records = snapshot.len(),
					identity = %snapshot.identity(),
					"Dataset snapshot loaded."
				);

				self.swap(Some(snapshot.clone()));

				Ok(snapshot)
			},
			Err(err) => match cached {
				Some(stale) => {
					tracing::warn!(error = %err, "Dataset reload failed; serving the previous snapshot.");

					Ok(stale)
				},
				None => Err(err),
			},
		}
	}

	/// Like [`RecordStore::snapshot`], but degrades a load failure to an empty corpus.
	pub async fn corpus_or_empty(&self) -> Arc<CorpusSnapshot> {
		match self.snapshot().await {
			Ok(snapshot) => snapshot,
			Err(err) => {
				tracing::warn!(error = %err, "Dataset unavailable; using an empty corpus.");

				Arc::new(CorpusSnapshot::empty())
			},
		}
	}

	/// Drops the cached snapshot so the next read reloads from disk. In-memory stores keep
	/// their records.
	pub fn invalidate(&self) {
		if matches!(self.backing, Backing::Files(_)) {
			self.swap(None);
		}
	}

	pub fn replace_records(&self, records: Vec<WorkflowRecord>) -> Arc<CorpusSnapshot> {
		let snapshot = Arc::new(CorpusSnapshot::from_records(records));

		self.swap(Some(snapshot.clone()));

		snapshot
	}

	pub async fn categories(&self) -> Vec<Category> {
		match &self.backing {
			Backing::Files(data) => read_summary(&data.categories_path(), "categories").await,
			Backing::Memory => Vec::new(),
		}
	}

	pub async fn integrations(&self) -> Vec<IntegrationSummary> {
		match &self.backing {
			Backing::Files(data) => read_summary(&data.integrations_path(), "integrations").await,
			Backing::Memory => Vec::new(),
		}
	}

	fn cached(&self) -> Option<Arc<CorpusSnapshot>> {
		self.current.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn swap(&self, next: Option<Arc<CorpusSnapshot>>) {
		*self.current.write().unwrap_or_else(|err| err.into_inner()) = next;
	}

	fn is_stale(&self, snapshot: &CorpusSnapshot) -> bool {
		self.reload_interval.map(|interval| snapshot.age() >= interval).unwrap_or(false)
	}
}

async fn read_summary<T>(path: &std::path::Path, label: &str) -> Vec<T>
where
	T: serde::de::DeserializeOwned,
{
	match dataset::read_json::<Vec<T>>(path).await {
		Ok(items) => items,
		Err(err) => {
			tracing::warn!(error = %err, summary = label, "Summary file unavailable; using an empty list.");

			Vec::new()
		},
	}
}
