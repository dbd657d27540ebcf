use std::{collections::HashSet, path::Path, time::Duration};

use serde::de::DeserializeOwned;
use tokio::{fs, time};

use flowlib_config::Data;
use flowlib_domain::{DatasetMeta, WorkflowRecord};

use crate::{DatasetIdentity, Error, Result};

const MIN_QUALITY: u8 = 1;
const MAX_QUALITY: u8 = 5;

/// Raw result of reading the corpus files, before it is wrapped into a snapshot.
#[derive(Debug)]
pub struct LoadedCorpus {
	pub records: Vec<WorkflowRecord>,
	pub identity: DatasetIdentity,
}

pub async fn load_corpus(data: &Data) -> Result<LoadedCorpus> {
	let index_path = data.index_path();
	let timeout_ms = data.load_timeout_ms;

	time::timeout(Duration::from_millis(timeout_ms), read_corpus(data))
		.await
		.map_err(|_| Error::LoadTimeout { path: index_path, timeout_ms })?
}

async fn read_corpus(data: &Data) -> Result<LoadedCorpus> {
	let index_path = data.index_path();
	let bytes = fs::read(&index_path)
		.await
		.map_err(|err| Error::ReadDataset { path: index_path.clone(), source: err })?;
	let records: Vec<WorkflowRecord> = serde_json::from_slice(&bytes)
		.map_err(|err| Error::ParseDataset { path: index_path.clone(), source: err })?;

	validate_records(&records)?;

	let meta = read_meta(&data.meta_path()).await;
	let identity = DatasetIdentity::resolve(meta.as_ref(), &bytes);

	Ok(LoadedCorpus { records, identity })
}

/// Metadata is advisory; anything short of a readable, well-formed file means "no metadata".
async fn read_meta(path: &Path) -> Option<DatasetMeta> {
	match read_json::<DatasetMeta>(path).await {
		Ok(meta) => Some(meta),
		Err(Error::ReadDataset { source, .. }) if source.kind() == std::io::ErrorKind::NotFound =>
			None,
		Err(err) => {
			tracing::warn!(error = %err, "Ignoring unusable dataset metadata.");

			None
		},
	}
}

pub async fn read_json<T>(path: &Path) -> Result<T>
where
	T: DeserializeOwned,
{
	let bytes = fs::read(path)
		.await
		.map_err(|err| Error::ReadDataset { path: path.to_path_buf(), source: err })?;

	serde_json::from_slice(&bytes)
		.map_err(|err| Error::ParseDataset { path: path.to_path_buf(), source: err })
}

pub fn validate_records(records: &[WorkflowRecord]) -> Result<()> {
	let mut slugs = HashSet::with_capacity(records.len());

	for record in records {
		if !(MIN_QUALITY..=MAX_QUALITY).contains(&record.quality) {
			return Err(Error::InvalidRecord(format!(
				"{} has quality {} outside {MIN_QUALITY}-{MAX_QUALITY}.",
				record.slug, record.quality
			)));
		}
		if !slugs.insert(record.slug.as_str()) {
			return Err(Error::InvalidRecord(format!("Duplicate slug {}.", record.slug)));
		}
	}

	Ok(())
}
