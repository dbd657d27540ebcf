use std::fmt::{Display, Formatter};

use serde::Serialize;

use flowlib_domain::{DatasetMeta, WorkflowRecord};

/// Token that changes exactly when the corpus content changes.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DatasetIdentity(String);
impl DatasetIdentity {
	/// Prefers the hash published by the dataset build and falls back to hashing the raw
	/// corpus bytes.
	pub fn resolve(meta: Option<&DatasetMeta>, corpus_bytes: &[u8]) -> Self {
		let published = meta
			.and_then(|meta| meta.dataset_hash.as_deref())
			.map(str::trim)
			.filter(|hash| !hash.is_empty());

		match published {
			Some(hash) => Self(hash.to_string()),
			None => Self::from_bytes(corpus_bytes),
		}
	}

	pub fn from_bytes(bytes: &[u8]) -> Self {
		Self(blake3::hash(bytes).to_hex().to_string())
	}

	/// Identity for a corpus built in process. Falls back to a length proxy when the records
	/// cannot be serialized.
	pub fn from_records(records: &[WorkflowRecord]) -> Self {
		match serde_json::to_vec(records) {
			Ok(bytes) => Self::from_bytes(&bytes),
			Err(_) => Self(format!("len:{}", records.len())),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for DatasetIdentity {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}
