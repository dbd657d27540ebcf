pub mod catalog;
pub mod filter;
pub mod fuzzy;
pub mod query;
pub mod sort;
pub mod text;

mod error;

pub use error::{Error, Result};
pub use fuzzy::{FuzzyIndex, IndexCache, IndexOptions, SearchHit};

use std::sync::Arc;

use flowlib_config::{Config, Pagination, Search};
use flowlib_storage::RecordStore;

/// Entry point for every catalog read: owns the record store, the index cache, and the paging
/// bounds.
#[derive(Debug)]
pub struct SearchService {
	store: Arc<RecordStore>,
	index: IndexCache,
	pagination: Pagination,
}
impl SearchService {
	pub fn new(cfg: &Config) -> Self {
		let store = Arc::new(RecordStore::from_config(&cfg.data));

		Self::with_store(store, &cfg.search, &cfg.pagination)
	}

	pub fn with_store(store: Arc<RecordStore>, search: &Search, pagination: &Pagination) -> Self {
		Self {
			store,
			index: IndexCache::new(IndexOptions::from_config(search)),
			pagination: pagination.clone(),
		}
	}

	pub fn store(&self) -> &Arc<RecordStore> {
		&self.store
	}

	pub fn index(&self) -> &IndexCache {
		&self.index
	}

	pub fn pagination(&self) -> &Pagination {
		&self.pagination
	}
}
