use std::{fs, sync::Arc, time::Duration};

use flowlib_storage::{CorpusSnapshot, DatasetIdentity, Error, RecordStore};
use flowlib_testkit::{TestDataset, fixtures};

#[tokio::test]
async fn loads_corpus_and_caches_snapshot() {
	let dataset = TestDataset::with_records(&fixtures::scenario_corpus()).expect("dataset");
	let store = RecordStore::from_config(&dataset.data_config());
	let first = store.snapshot().await.expect("first load");
	let second = store.snapshot().await.expect("cached load");

	assert_eq!(first.len(), 5);
	assert_eq!(first.records()[0].slug, "a-ticket-tagger");
	assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn identity_prefers_published_hash() {
	let dataset = TestDataset::with_records(&fixtures::scenario_corpus()).expect("dataset");

	dataset.write_meta("build-42").expect("meta");

	let store = RecordStore::from_config(&dataset.data_config());
	let snapshot = store.snapshot().await.expect("load");

	assert_eq!(snapshot.identity().as_str(), "build-42");
}

#[tokio::test]
async fn identity_falls_back_to_content_hash() {
	let dataset = TestDataset::with_records(&fixtures::scenario_corpus()).expect("dataset");

	fs::write(dataset.meta_path(), "{ not json").expect("broken meta");

	let raw = fs::read(dataset.index_path()).expect("read index");
	let store = RecordStore::from_config(&dataset.data_config());
	let snapshot = store.snapshot().await.expect("load");

	assert_eq!(snapshot.identity(), &DatasetIdentity::from_bytes(&raw));
}

#[tokio::test]
async fn invalidate_picks_up_new_content() {
	let dataset = TestDataset::with_records(&fixtures::scenario_corpus()).expect("dataset");
	let store = RecordStore::from_config(&dataset.data_config());
	let before = store.snapshot().await.expect("load");
	let mut trimmed = fixtures::scenario_corpus();

	trimmed.truncate(2);
	dataset.write_records(&trimmed).expect("rewrite");

	let cached = store.snapshot().await.expect("cached");

	assert_eq!(cached.len(), 5);

	store.invalidate();

	let after = store.snapshot().await.expect("reload");

	assert_eq!(after.len(), 2);
	assert_ne!(before.identity(), after.identity());
}

#[tokio::test]
async fn missing_corpus_is_an_error_for_strict_callers() {
	let dataset = TestDataset::new().expect("dataset");
	let store = RecordStore::from_config(&dataset.data_config());
	let err = store.snapshot().await.expect_err("expected load failure");

	assert!(matches!(err, Error::ReadDataset { .. }), "unexpected error: {err:?}");
	assert!(store.corpus_or_empty().await.is_empty());
}

#[tokio::test]
async fn malformed_corpus_is_a_parse_error() {
	let dataset = TestDataset::new().expect("dataset");

	dataset.write_raw_index("[{\"slug\": 1}]").expect("raw index");

	let store = RecordStore::from_config(&dataset.data_config());
	let err = store.snapshot().await.expect_err("expected parse failure");

	assert!(matches!(err, Error::ParseDataset { .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn invalid_records_are_rejected() {
	let mut records = fixtures::scenario_corpus();

	records[1].quality = 9;

	let dataset = TestDataset::with_records(&records).expect("dataset");
	let store = RecordStore::from_config(&dataset.data_config());

	assert!(matches!(store.snapshot().await, Err(Error::InvalidRecord(_))));

	let mut records = fixtures::scenario_corpus();

	records[2].slug = records[0].slug.clone();
	dataset.write_records(&records).expect("rewrite");

	assert!(matches!(store.snapshot().await, Err(Error::InvalidRecord(_))));
}

#[tokio::test]
async fn failed_reload_keeps_serving_previous_snapshot() {
	let dataset = TestDataset::with_records(&fixtures::scenario_corpus()).expect("dataset");
	let mut data = dataset.data_config();

	data.reload_interval_secs = 1;

	let store = RecordStore::from_config(&data);
	let first = store.snapshot().await.expect("load");

	dataset.remove_index().expect("remove index");
	tokio::time::sleep(Duration::from_millis(1_100)).await;

	let second = store.snapshot().await.expect("stale snapshot");

	assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn in_memory_store_swaps_records() {
	let store = RecordStore::in_memory(fixtures::scenario_corpus());
	let before = store.snapshot().await.expect("snapshot");

	store.invalidate();

	assert!(Arc::ptr_eq(&before, &store.snapshot().await.expect("snapshot")));

	let after = store.replace_records(vec![fixtures::workflow("solo", "Solo")]);

	assert_eq!(after.len(), 1);
	assert_ne!(before.identity(), after.identity());
	assert!(store.categories().await.is_empty());
}

#[tokio::test]
async fn summaries_degrade_to_empty_lists() {
	let dataset = TestDataset::with_records(&fixtures::scenario_corpus()).expect("dataset");
	let store = RecordStore::from_config(&dataset.data_config());

	assert_eq!(store.categories().await.len(), 2);
	assert_eq!(store.integrations().await.len(), 2);

	fs::write(dataset.path().join("categories.json"), "oops").expect("corrupt");

	assert!(store.categories().await.is_empty());
}

#[test]
fn empty_snapshot_has_stable_identity() {
	assert_eq!(CorpusSnapshot::empty().identity(), CorpusSnapshot::empty().identity());
}
