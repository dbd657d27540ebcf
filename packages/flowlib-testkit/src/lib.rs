mod error;
pub mod fixtures;

pub use error::{Error, Result};

use std::{
	fs,
	path::{Path, PathBuf},
};

use tempfile::TempDir;

use flowlib_config::{Config, Data, Pagination, Search, Security, Service};
use flowlib_domain::{Category, IntegrationSummary, WorkflowRecord};

/// A throwaway data directory laid out like the dataset build output. Removed on drop.
pub struct TestDataset {
	dir: TempDir,
}
impl TestDataset {
	pub fn new() -> Result<Self> {
		let dir = tempfile::Builder::new().prefix("flowlib_test_").tempdir()?;

		Ok(Self { dir })
	}

	/// A dataset holding `records` plus the fixture category and integration summaries.
	pub fn with_records(records: &[WorkflowRecord]) -> Result<Self> {
		let dataset = Self::new()?;

		dataset.write_records(records)?;
		dataset.write_categories(&fixtures::categories())?;
		dataset.write_integrations(&fixtures::integrations())?;

		Ok(dataset)
	}

	pub fn path(&self) -> &Path {
		self.dir.path()
	}

	pub fn index_path(&self) -> PathBuf {
		self.path().join("index.json")
	}

	pub fn meta_path(&self) -> PathBuf {
		self.path().join("meta.json")
	}

	pub fn write_records(&self, records: &[WorkflowRecord]) -> Result<()> {
		write_json(&self.index_path(), records)
	}

	pub fn write_raw_index(&self, raw: &str) -> Result<()> {
		fs::write(self.index_path(), raw)?;

		Ok(())
	}

	pub fn remove_index(&self) -> Result<()> {
		fs::remove_file(self.index_path())?;

		Ok(())
	}

	pub fn write_meta(&self, dataset_hash: &str) -> Result<()> {
		let meta = serde_json::json!({
			"version": 1,
			"datasetHash": dataset_hash,
			"generatedAt": "2024-06-01T00:00:00Z",
		});

		write_json(&self.meta_path(), &meta)
	}

	pub fn write_categories(&self, categories: &[Category]) -> Result<()> {
		write_json(&self.path().join("categories.json"), categories)
	}

	pub fn write_integrations(&self, integrations: &[IntegrationSummary]) -> Result<()> {
		write_json(&self.path().join("integrations.json"), integrations)
	}

	pub fn data_config(&self) -> Data {
		Data {
			dir: self.path().to_path_buf(),
			index_file: "index.json".to_string(),
			meta_file: "meta.json".to_string(),
			categories_file: "categories.json".to_string(),
			integrations_file: "integrations.json".to_string(),
			load_timeout_ms: 5_000,
			reload_interval_secs: 0,
		}
	}

	/// A complete, valid configuration pointing at this dataset.
	pub fn config(&self) -> Config {
		Config {
			service: Service {
				http_bind: "127.0.0.1:0".to_string(),
				admin_bind: "127.0.0.1:0".to_string(),
				log_level: "info".to_string(),
			},
			data: self.data_config(),
			search: Search::default(),
			pagination: Pagination::default(),
			security: Security::default(),
		}
	}
}

fn write_json<T>(path: &Path, value: &T) -> Result<()>
where
	T: serde::Serialize + ?Sized,
{
	let raw = serde_json::to_vec_pretty(value)?;

	fs::write(path, raw).map_err(|err| {
		Error::Message(format!("Failed to write fixture file {}: {err}.", path.display()))
	})
}
