use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{
	pagination,
	record::{Source, TriggerType, UnknownVariant, WorkflowRecord},
};

pub const PARAM_QUERY: &str = "q";
pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_INTEGRATION: &str = "integration";
pub const PARAM_SOURCE: &str = "source";
pub const PARAM_QUALITY: &str = "quality";
pub const PARAM_TRIGGER: &str = "trigger";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PAGE_SIZE: &str = "pageSize";

const MIN_QUALITY: i64 = 1;
const MAX_QUALITY: i64 = 5;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
	#[default]
	All,
	Awesome,
	Community,
}
impl SourceFilter {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Awesome => "awesome",
			Self::Community => "community",
		}
	}

	/// The single source this filter admits, or `None` when unrestricted.
	pub fn source(self) -> Option<Source> {
		match self {
			Self::All => None,
			Self::Awesome => Some(Source::Awesome),
			Self::Community => Some(Source::Community),
		}
	}
}
impl FromStr for SourceFilter {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"all" => Ok(Self::All),
			"awesome" => Ok(Self::Awesome),
			"community" => Ok(Self::Community),
			other => Err(UnknownVariant::new("source", other)),
		}
	}
}
impl From<Source> for SourceFilter {
	fn from(source: Source) -> Self {
		match source {
			Source::Awesome => Self::Awesome,
			Source::Community => Self::Community,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
	/// Keep whatever order the previous stage produced.
	Relevance,
	#[default]
	Quality,
	Nodes,
	Newest,
	Name,
}
impl SortOption {
	pub const ALL: [Self; 5] = [Self::Relevance, Self::Quality, Self::Nodes, Self::Newest, Self::Name];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Relevance => "relevance",
			Self::Quality => "quality",
			Self::Nodes => "nodes",
			Self::Newest => "newest",
			Self::Name => "name",
		}
	}
}
impl FromStr for SortOption {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|sort| sort.as_str() == raw)
			.ok_or_else(|| UnknownVariant::new("sort", raw))
	}
}
impl fmt::Display for SortOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Everything that determines a query's result set and order.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
	pub query: String,
	pub category: Option<String>,
	pub integration: Option<String>,
	pub source: SourceFilter,
	/// Inclusive minimum quality.
	pub quality: Option<u8>,
	pub trigger_type: Option<TriggerType>,
	pub sort_by: SortOption,
}
impl FilterState {
	/// Parses URL query parameters. Unknown, malformed, or out-of-range values are dropped so
	/// the corresponding field keeps its default. The first occurrence of a key wins.
	pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut state = Self::default();
		let mut seen: Vec<String> = Vec::new();

		for (key, value) in pairs {
			let key = key.as_ref();
			let value = value.as_ref();

			if seen.iter().any(|existing| existing == key) {
				continue;
			}

			seen.push(key.to_string());

			if value.is_empty() {
				continue;
			}

			match key {
				PARAM_QUERY => state.query = value.to_string(),
				PARAM_CATEGORY => state.category = Some(value.to_string()),
				PARAM_INTEGRATION => state.integration = Some(value.to_string()),
				PARAM_SOURCE =>
					if let Ok(source) = value.parse() {
						state.source = source;
					},
				PARAM_QUALITY => state.quality = parse_quality(value),
				PARAM_TRIGGER => state.trigger_type = value.parse().ok(),
				PARAM_SORT =>
					if let Ok(sort) = value.parse() {
						state.sort_by = sort;
					},
				_ => {},
			}
		}

		state
	}

	/// Parses a raw query string, with or without the leading `?`.
	pub fn from_query_string(raw: &str) -> Self {
		let raw = raw.strip_prefix('?').unwrap_or(raw);

		Self::from_query_pairs(form_urlencoded::parse(raw.as_bytes()))
	}

	/// Parameters for every non-default field, in a fixed key order.
	pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if !self.query.is_empty() {
			pairs.push((PARAM_QUERY, self.query.clone()));
		}
		if let Some(category) = non_empty(self.category.as_deref()) {
			pairs.push((PARAM_CATEGORY, category.to_string()));
		}
		if let Some(integration) = non_empty(self.integration.as_deref()) {
			pairs.push((PARAM_INTEGRATION, integration.to_string()));
		}
		if self.source != SourceFilter::All {
			pairs.push((PARAM_SOURCE, self.source.as_str().to_string()));
		}
		if let Some(quality) = self.quality.filter(|quality| *quality > 0) {
			pairs.push((PARAM_QUALITY, quality.to_string()));
		}
		if let Some(trigger) = self.trigger_type {
			pairs.push((PARAM_TRIGGER, trigger.as_str().to_string()));
		}
		if self.sort_by != SortOption::default() {
			pairs.push((PARAM_SORT, self.sort_by.as_str().to_string()));
		}

		pairs
	}

	pub fn to_query_string(&self) -> String {
		encode_pairs(self.to_query_pairs())
	}

	/// `base_path` plus the encoded filters; the bare path when every field is default.
	pub fn to_url(&self, base_path: &str) -> String {
		let query = self.to_query_string();

		if query.is_empty() { base_path.to_string() } else { format!("{base_path}?{query}") }
	}

	/// Query string for one page request against the search endpoint.
	pub fn to_request_query(&self, page: usize, page_size: usize) -> String {
		let mut pairs = self.to_query_pairs();

		pairs.push((PARAM_PAGE, page.to_string()));
		pairs.push((PARAM_PAGE_SIZE, page_size.to_string()));

		encode_pairs(pairs)
	}

	/// The query with surrounding whitespace removed.
	pub fn trimmed_query(&self) -> &str {
		self.query.trim()
	}

	/// Evaluates every structured predicate against one record. The query is not consulted.
	pub fn admits(&self, record: &WorkflowRecord) -> bool {
		if let Some(category) = non_empty(self.category.as_deref())
			&& record.category != category
		{
			return false;
		}
		if let Some(source) = self.source.source()
			&& record.source != source
		{
			return false;
		}
		if let Some(quality) = self.quality
			&& record.quality < quality
		{
			return false;
		}
		if let Some(trigger) = self.trigger_type
			&& record.trigger_type != trigger
		{
			return false;
		}
		if let Some(integration) = non_empty(self.integration.as_deref())
			&& !record.has_integration(integration)
		{
			return false;
		}

		true
	}
}

fn parse_quality(raw: &str) -> Option<u8> {
	pagination::parse_int_prefix(raw)
		.filter(|quality| (MIN_QUALITY..=MAX_QUALITY).contains(quality))
		.and_then(|quality| u8::try_from(quality).ok())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.is_empty())
}

fn encode_pairs(pairs: Vec<(&'static str, String)>) -> String {
	let mut serializer = form_urlencoded::Serializer::new(String::new());

	for (key, value) in pairs {
		serializer.append_pair(key, &value);
	}

	serializer.finish()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn populated() -> FilterState {
		FilterState {
			query: "slack alerts & more".to_string(),
			category: Some("comm".to_string()),
			integration: Some("slack".to_string()),
			source: SourceFilter::Community,
			quality: Some(3),
			trigger_type: Some(TriggerType::Schedule),
			sort_by: SortOption::Newest,
		}
	}

	#[test]
	fn default_state_encodes_to_bare_path() {
		assert_eq!(FilterState::default().to_url("/search"), "/search");
		assert_eq!(FilterState::default().to_query_string(), "");
	}

	#[test]
	fn url_round_trip_preserves_state() {
		let state = populated();
		let url = state.to_url("/directory");
		let (path, query) = url.split_once('?').expect("query present");

		assert_eq!(path, "/directory");
		assert_eq!(FilterState::from_query_string(query), state);
	}

	#[test]
	fn partial_url_defaults_missing_fields() {
		let state = FilterState::from_query_string("?quality=4&sort=name");

		assert_eq!(state.quality, Some(4));
		assert_eq!(state.sort_by, SortOption::Name);
		assert_eq!(state.source, SourceFilter::All);
		assert!(state.query.is_empty());
		assert!(state.category.is_none());
	}

	#[test]
	fn invalid_values_are_ignored() {
		let state = FilterState::from_query_string(
			"source=everyone&quality=9&trigger=cron&sort=random&category=&q=",
		);

		assert_eq!(state, FilterState::default());

		let state = FilterState::from_query_string("quality=0");

		assert_eq!(state.quality, None);

		let state = FilterState::from_query_string("quality=3.5");

		assert_eq!(state.quality, Some(3));
	}

	#[test]
	fn first_occurrence_wins() {
		let state = FilterState::from_query_string("sort=name&sort=nodes&q=a&q=b");

		assert_eq!(state.sort_by, SortOption::Name);
		assert_eq!(state.query, "a");
	}

	#[test]
	fn request_query_appends_paging() {
		let state = FilterState { sort_by: SortOption::Relevance, ..Default::default() };

		assert_eq!(state.to_request_query(2, 24), "sort=relevance&page=2&pageSize=24");
	}

	#[test]
	fn encoding_escapes_reserved_characters() {
		let state = FilterState { query: "a&b=c d".to_string(), ..Default::default() };

		assert_eq!(state.to_query_string(), "q=a%26b%3Dc+d");
	}
}
