use std::{
	sync::{
		Arc, RwLock,
		atomic::{AtomicU64, Ordering},
	},
	time::Instant,
};

use flowlib_storage::CorpusSnapshot;

use crate::{
	Error, Result,
	fuzzy::{FuzzyIndex, IndexOptions},
};

/// Holds the index for the most recently seen dataset identity.
#[derive(Debug)]
pub struct IndexCache {
	options: IndexOptions,
	current: RwLock<Option<Arc<FuzzyIndex>>>,
	builds: AtomicU64,
}
impl IndexCache {
	pub fn new(options: IndexOptions) -> Self {
		Self { options, current: RwLock::new(None), builds: AtomicU64::new(0) }
	}

	pub fn current(&self) -> Option<Arc<FuzzyIndex>> {
		self.current.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	/// Number of index builds performed so far.
	pub fn build_count(&self) -> u64 {
		self.builds.load(Ordering::Relaxed)
	}

	/// The index for `snapshot`, reusing the cached one when its identity matches. A rebuild runs
	/// on the blocking pool and is swapped in only once complete.
	pub async fn ensure(&self, snapshot: &Arc<CorpusSnapshot>) -> Result<Arc<FuzzyIndex>> {
		if let Some(index) = self.current()
			&& index.identity() == snapshot.identity()
		{
			return Ok(index);
		}

		let started = Instant::now();
		let options = self.options.clone();
		let source = snapshot.clone();
		let index = tokio::task::spawn_blocking(move || FuzzyIndex::build(source, options))
			.await
			.map_err(|err| Error::IndexBuild { message: err.to_string() })?;
		let index = Arc::new(index);

		self.builds.fetch_add(1, Ordering::Relaxed);

		tracing::info!(
			identity = %index.identity(),
			records = index.snapshot().len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Search index built."
		);

		*self.current.write().unwrap_or_else(|err| err.into_inner()) = Some(index.clone());

		Ok(index)
	}
}
