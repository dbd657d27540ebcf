use std::sync::Arc;

use flowlib_config::{Search, SearchWeights};
use flowlib_domain::WorkflowRecord;
use flowlib_storage::{CorpusSnapshot, DatasetIdentity};

use crate::{fuzzy::matcher::Pattern, text};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
	Name,
	Description,
	Integrations,
	Category,
}

/// Field weights rescaled to sum to one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldWeights {
	pub name: f64,
	pub description: f64,
	pub integrations: f64,
	pub category: f64,
}
impl FieldWeights {
	pub fn normalized(weights: &SearchWeights) -> Self {
		let sum = weights.name + weights.description + weights.integrations + weights.category;

		if !sum.is_finite() || sum <= 0.0 {
			return Self::normalized(&SearchWeights::default());
		}

		Self {
			name: weights.name / sum,
			description: weights.description / sum,
			integrations: weights.integrations / sum,
			category: weights.category / sum,
		}
	}

	pub fn of(&self, field: Field) -> f64 {
		match field {
			Field::Name => self.name,
			Field::Description => self.description,
			Field::Integrations => self.integrations,
			Field::Category => self.category,
		}
	}
}

#[derive(Clone, Debug)]
pub struct IndexOptions {
	pub threshold: f64,
	pub min_match_chars: usize,
	pub weights: FieldWeights,
}
impl IndexOptions {
	pub fn from_config(search: &Search) -> Self {
		Self {
			threshold: search.threshold,
			min_match_chars: search.min_match_chars.max(1),
			weights: FieldWeights::normalized(&search.weights),
		}
	}
}
impl Default for IndexOptions {
	fn default() -> Self {
		Self::from_config(&Search::default())
	}
}

#[derive(Clone, Copy, Debug)]
pub struct SearchHit<'a> {
	pub record: &'a WorkflowRecord,
	/// Lower is better.
	pub score: f64,
}

#[derive(Debug)]
struct IndexedValue {
	text: Vec<char>,
	norm: f64,
}
impl IndexedValue {
	fn new(raw: &str) -> Option<Self> {
		let text = text::fold_chars(raw.trim());

		if text.is_empty() {
			return None;
		}

		Some(Self { text, norm: text::field_norm(raw) })
	}
}

#[derive(Debug)]
struct IndexedField {
	field: Field,
	values: Vec<IndexedValue>,
}

/// Weighted fuzzy index over one corpus snapshot. Immutable once built; a new identity means a
/// new index.
#[derive(Debug)]
pub struct FuzzyIndex {
	snapshot: Arc<CorpusSnapshot>,
	options: IndexOptions,
	entries: Vec<Vec<IndexedField>>,
}
impl FuzzyIndex {
	pub fn build(snapshot: Arc<CorpusSnapshot>, options: IndexOptions) -> Self {
		let entries = snapshot.records().iter().map(index_record).collect();

		Self { snapshot, options, entries }
	}

	pub fn identity(&self) -> &DatasetIdentity {
		self.snapshot.identity()
	}

	pub fn snapshot(&self) -> &Arc<CorpusSnapshot> {
		&self.snapshot
	}

	pub fn options(&self) -> &IndexOptions {
		&self.options
	}

	/// Whether `query` is too short to search, in which case it behaves like an empty query.
	pub fn is_pass_through(&self, query: &str) -> bool {
		query.trim().chars().count() < self.options.min_match_chars
	}

	/// Matching records, best first. Pass-through queries return the corpus in its natural order.
	pub fn search(&self, query: &str) -> Vec<&WorkflowRecord> {
		if self.is_pass_through(query) {
			return self.snapshot.records().iter().collect();
		}

		self.search_hits(query).into_iter().map(|hit| hit.record).collect()
	}

	/// Scored matches, best first, with equal scores in corpus order. Pass-through queries yield
	/// every record with a neutral score of `1.0`.
	pub fn search_hits(&self, query: &str) -> Vec<SearchHit<'_>> {
		let records = self.snapshot.records();

		if self.is_pass_through(query) {
			return records.iter().map(|record| SearchHit { record, score: 1.0 }).collect();
		}

		let folded = text::fold_chars(query.trim());
		let pattern = Pattern::new(&folded, self.options.threshold, self.options.min_match_chars);
		let mut hits: Vec<SearchHit<'_>> = records
			.iter()
			.zip(&self.entries)
			.filter_map(|(record, fields)| {
				self.score_fields(&pattern, fields).map(|score| SearchHit { record, score })
			})
			.collect();

		hits.sort_by(|lhs, rhs| lhs.score.total_cmp(&rhs.score));

		hits
	}

	fn score_fields(&self, pattern: &Pattern, fields: &[IndexedField]) -> Option<f64> {
		if pattern.is_empty() {
			return None;
		}

		let mut total = 1.0_f64;
		let mut matched = false;

		for field in fields {
			let best = field
				.values
				.iter()
				.filter_map(|value| pattern.score(&value.text).map(|score| (score, value.norm)))
				.min_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0));
			let Some((score, norm)) = best else { continue };

			matched = true;
			total *= score.max(f64::EPSILON).powf(self.options.weights.of(field.field) * norm);
		}

		matched.then_some(total)
	}
}

fn index_record(record: &WorkflowRecord) -> Vec<IndexedField> {
	vec![
		IndexedField {
			field: Field::Name,
			values: IndexedValue::new(&record.name).into_iter().collect(),
		},
		IndexedField {
			field: Field::Description,
			values: IndexedValue::new(&record.description).into_iter().collect(),
		},
		IndexedField {
			field: Field::Integrations,
			values: record.integrations.iter().map(String::as_str).filter_map(IndexedValue::new).collect(),
		},
		IndexedField {
			field: Field::Category,
			values: IndexedValue::new(&record.category_name).into_iter().collect(),
		},
	]
}

#[cfg(test)]
mod tests {
	use flowlib_domain::{Source, TriggerType};

	use super::*;

	fn record(slug: &str, name: &str, description: &str, integrations: &[&str]) -> WorkflowRecord {
		WorkflowRecord {
			id: slug.to_string(),
			slug: slug.to_string(),
			name: name.to_string(),
			description: description.to_string(),
			category: "ops".to_string(),
			category_name: "Operations".to_string(),
			category_icon: String::new(),
			source: Source::Community,
			quality: 3,
			node_count: 4,
			integrations: integrations.iter().map(|slug| slug.to_string()).collect(),
			trigger_type: TriggerType::Manual,
			created_at: "2024-01-01".to_string(),
		}
	}

	fn index(records: Vec<WorkflowRecord>) -> FuzzyIndex {
		FuzzyIndex::build(Arc::new(CorpusSnapshot::from_records(records)), IndexOptions::default())
	}

	fn slugs(records: &[&WorkflowRecord]) -> Vec<String> {
		records.iter().map(|record| record.slug.clone()).collect()
	}

	#[test]
	fn weights_are_normalized() {
		let weights = FieldWeights::normalized(&SearchWeights {
			name: 4.0,
			description: 3.0,
			integrations: 2.0,
			category: 1.0,
		});

		assert!((weights.name - 0.4).abs() < 1e-12);
		assert!((weights.category - 0.1).abs() < 1e-12);
	}

	#[test]
	fn name_matches_outrank_description_matches() {
		let index = index(vec![
			record("desc", "Weekly report", "Posts a summary into slack", &[]),
			record("name", "Slack summary", "Posts a weekly report", &[]),
		]);

		assert_eq!(slugs(&index.search("slack")), vec!["name", "desc"]);
	}

	#[test]
	fn near_name_match_beats_exact_word_deep_in_description() {
		let description = "Collects the open tickets from every board and rolls them into one \
			weekly summary that is then posted to slack";
		let index = index(vec![
			record("buried", "Weekly report", description, &[]),
			record("name-typo", "Slak", "", &[]),
		]);
		let hits = index.search_hits("slack");

		assert_eq!(description.split_whitespace().count(), 20);
		assert_eq!(hits[0].record.slug, "name-typo");
		assert!((hits[0].score - 0.2_f64.powf(0.4)).abs() < 1e-9);
		assert!((hits[1].score - 0.001_f64.powf(0.3 * 0.224)).abs() < 1e-9);
	}

	#[test]
	fn integration_slugs_are_searchable() {
		let index = index(vec![
			record("plain", "Weekly report", "Emails the team", &["gmail"]),
			record("crm", "Lead sync", "Keeps leads current", &["hubspot", "gmail"]),
		]);

		assert_eq!(slugs(&index.search("hubspot")), vec!["crm"]);
		assert_eq!(slugs(&index.search("gmail")), vec!["plain", "crm"]);
	}

	#[test]
	fn short_and_blank_queries_pass_through() {
		let index = index(vec![
			record("b", "Beta", "", &[]),
			record("a", "Alpha", "", &[]),
		]);

		assert!(index.is_pass_through("   "));
		assert!(index.is_pass_through(" a "));
		assert_eq!(slugs(&index.search("a")), vec!["b", "a"]);
		assert_eq!(slugs(&index.search("")), vec!["b", "a"]);
	}

	#[test]
	fn ties_keep_corpus_order() {
		let index = index(vec![
			record("first", "Slack alerts", "", &[]),
			record("second", "Slack alerts", "", &[]),
		]);
		let hits = index.search_hits("slack");

		assert_eq!(hits[0].record.slug, "first");
		assert_eq!(hits[0].score, hits[1].score);
	}

	#[test]
	fn diacritics_and_case_are_ignored() {
		let index = index(vec![record("cafe", "Café Orders", "", &[])]);

		assert_eq!(slugs(&index.search("CAFE")), vec!["cafe"]);
	}
}
