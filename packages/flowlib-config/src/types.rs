use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub data: Data,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub pagination: Pagination,
	#[serde(default)]
	pub security: Security,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Data {
	/// Directory holding the files produced by the dataset build step.
	pub dir: PathBuf,
	#[serde(default = "default_index_file")]
	pub index_file: String,
	#[serde(default = "default_meta_file")]
	pub meta_file: String,
	#[serde(default = "default_categories_file")]
	pub categories_file: String,
	#[serde(default = "default_integrations_file")]
	pub integrations_file: String,
	#[serde(default = "default_load_timeout_ms")]
	pub load_timeout_ms: u64,
	/// Zero keeps a loaded snapshot until it is explicitly revalidated.
	#[serde(default)]
	pub reload_interval_secs: u64,
}
impl Data {
	pub fn index_path(&self) -> PathBuf {
		self.dir.join(&self.index_file)
	}

	pub fn meta_path(&self) -> PathBuf {
		self.dir.join(&self.meta_file)
	}

	pub fn categories_path(&self) -> PathBuf {
		self.dir.join(&self.categories_file)
	}

	pub fn integrations_path(&self) -> PathBuf {
		self.dir.join(&self.integrations_file)
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Search {
	/// Largest tolerated ratio of edits to query length for a field to count as a match.
	#[serde(default = "default_threshold")]
	pub threshold: f64,
	#[serde(default = "default_min_match_chars")]
	pub min_match_chars: usize,
	#[serde(default)]
	pub weights: SearchWeights,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			threshold: default_threshold(),
			min_match_chars: default_min_match_chars(),
			weights: SearchWeights::default(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchWeights {
	pub name: f64,
	pub description: f64,
	pub integrations: f64,
	pub category: f64,
}
impl Default for SearchWeights {
	fn default() -> Self {
		Self { name: 0.4, description: 0.3, integrations: 0.2, category: 0.1 }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Pagination {
	pub default_page_size: usize,
	pub max_page_size: usize,
}
impl Default for Pagination {
	fn default() -> Self {
		Self { default_page_size: 24, max_page_size: 48 }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Security {
	#[serde(default = "default_true")]
	pub bind_localhost_only: bool,
	/// Shared secret for the revalidation endpoint. Empty means no check.
	#[serde(default)]
	pub revalidate_token: Option<String>,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true, revalidate_token: None }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_index_file() -> String {
	"index.json".to_string()
}

fn default_meta_file() -> String {
	"meta.json".to_string()
}

fn default_categories_file() -> String {
	"categories.json".to_string()
}

fn default_integrations_file() -> String {
	"integrations.json".to_string()
}

fn default_load_timeout_ms() -> u64 {
	5_000
}

fn default_threshold() -> f64 {
	0.4
}

fn default_min_match_chars() -> usize {
	2
}

fn default_true() -> bool {
	true
}
