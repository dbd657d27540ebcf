use std::cmp::{Ordering, Reverse};

use unicode_normalization::UnicodeNormalization;

use flowlib_domain::{SortOption, WorkflowRecord};

use crate::text;

/// Collation key approximating a locale-aware comparison: letters first compare without case or
/// accents, then unaccented before accented, then lowercase before uppercase.
#[derive(Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct NameKey {
	primary: String,
	accents: String,
	case: Vec<bool>,
	raw: String,
}
impl NameKey {
	pub fn new(name: &str) -> Self {
		let primary = text::fold(name);
		let accents = name.nfkd().flat_map(char::to_lowercase).collect();
		let case = name.nfkd().filter(|ch| ch.is_alphabetic()).map(char::is_uppercase).collect();

		Self { primary, accents, case, raw: name.to_string() }
	}
}

/// Total order used by `sort`. `Relevance` treats every pair as equal.
pub fn compare(sort: SortOption, lhs: &WorkflowRecord, rhs: &WorkflowRecord) -> Ordering {
	match sort {
		SortOption::Relevance => Ordering::Equal,
		SortOption::Quality => compare_quality(lhs, rhs),
		SortOption::Nodes => rhs.node_count.cmp(&lhs.node_count),
		SortOption::Newest => Reverse(lhs.created_instant()).cmp(&Reverse(rhs.created_instant())),
		SortOption::Name => NameKey::new(&lhs.name).cmp(&NameKey::new(&rhs.name)),
	}
}

/// Stable in-place sort. Unparseable timestamps count as the oldest.
pub fn sort_records(records: &mut [&WorkflowRecord], sort: SortOption) {
	match sort {
		SortOption::Relevance => {},
		SortOption::Quality => records.sort_by(|lhs, rhs| compare_quality(lhs, rhs)),
		SortOption::Nodes => records.sort_by_key(|record| Reverse(record.node_count)),
		SortOption::Newest => records.sort_by_cached_key(|record| Reverse(record.created_instant())),
		SortOption::Name => records.sort_by_cached_key(|record| NameKey::new(&record.name)),
	}
}

fn compare_quality(lhs: &WorkflowRecord, rhs: &WorkflowRecord) -> Ordering {
	rhs.quality
		.cmp(&lhs.quality)
		.then_with(|| rhs.source.is_curated().cmp(&lhs.source.is_curated()))
}
