use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read dataset file at {path:?}.")]
	ReadDataset { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse dataset file at {path:?}.")]
	ParseDataset { path: PathBuf, source: serde_json::Error },
	#[error("Loading dataset file at {path:?} exceeded {timeout_ms} ms.")]
	LoadTimeout { path: PathBuf, timeout_ms: u64 },
	#[error("Invalid record: {0}")]
	InvalidRecord(String),
}
