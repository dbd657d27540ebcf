use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{
	Date, OffsetDateTime, PrimitiveDateTime,
	format_description::well_known::{Iso8601, Rfc3339},
	macros::format_description,
};

/// Where a workflow was collected from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
	/// Hand-curated collection.
	Awesome,
	Community,
}
impl Source {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Awesome => "awesome",
			Self::Community => "community",
		}
	}

	pub fn is_curated(self) -> bool {
		matches!(self, Self::Awesome)
	}
}
impl FromStr for Source {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"awesome" => Ok(Self::Awesome),
			"community" => Ok(Self::Community),
			other => Err(UnknownVariant::new("source", other)),
		}
	}
}
impl fmt::Display for Source {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
	Webhook,
	Schedule,
	Event,
	Manual,
}
impl TriggerType {
	pub const ALL: [Self; 4] = [Self::Webhook, Self::Schedule, Self::Event, Self::Manual];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Webhook => "webhook",
			Self::Schedule => "schedule",
			Self::Event => "event",
			Self::Manual => "manual",
		}
	}
}
impl FromStr for TriggerType {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|trigger| trigger.as_str() == raw)
			.ok_or_else(|| UnknownVariant::new("trigger", raw))
	}
}
impl fmt::Display for TriggerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownVariant {
	pub kind: &'static str,
	pub value: String,
}
impl UnknownVariant {
	pub(crate) fn new(kind: &'static str, value: &str) -> Self {
		Self { kind, value: value.to_string() }
	}
}
impl fmt::Display for UnknownVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Unknown {} value {:?}.", self.kind, self.value)
	}
}

impl std::error::Error for UnknownVariant {}

/// One entry of the search corpus, as written by the dataset build step.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
	pub id: String,
	pub slug: String,
	pub name: String,
	pub description: String,
	pub category: String,
	pub category_name: String,
	pub category_icon: String,
	pub source: Source,
	/// Always within 1..=5 once the record store has accepted the record.
	pub quality: u8,
	pub node_count: u32,
	pub integrations: Vec<String>,
	pub trigger_type: TriggerType,
	pub created_at: String,
}
impl WorkflowRecord {
	/// Creation instant, or `None` when the stored timestamp does not parse.
	pub fn created_instant(&self) -> Option<OffsetDateTime> {
		parse_timestamp(&self.created_at)
	}

	pub fn has_integration(&self, slug: &str) -> bool {
		self.integrations.iter().any(|integration| integration == slug)
	}
}

/// Accepts RFC 3339, other ISO 8601 date-times, and bare `YYYY-MM-DD` dates (read as UTC
/// midnight).
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if raw.is_empty() {
		return None;
	}
	if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(instant);
	}
	if let Ok(instant) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
		return Some(instant);
	}
	if let Ok(naive) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
		return Some(naive.assume_utc());
	}

	Date::parse(raw, format_description!("[year]-[month]-[day]"))
		.ok()
		.map(|date| date.midnight().assume_utc())
}

/// Build metadata written next to the corpus. Only the hash drives index freshness.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
	#[serde(default)]
	pub version: Option<u32>,
	#[serde(default)]
	pub dataset_hash: Option<String>,
	#[serde(default)]
	pub generated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
	pub slug: String,
	pub name: String,
	pub icon: String,
	#[serde(default)]
	pub color: String,
	#[serde(default)]
	pub description: String,
	pub count: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSummary {
	pub slug: String,
	pub name: String,
	pub icon: String,
	pub icon_type: String,
	#[serde(default)]
	pub icon_url: Option<String>,
	pub count: u32,
	#[serde(default)]
	pub categories: Vec<String>,
}

/// One page of an orchestrated query.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub results: Vec<WorkflowRecord>,
	/// Size of the full filtered result set, before paging.
	pub total: usize,
	pub page: usize,
	pub page_size: usize,
	pub has_more: bool,
	pub took_ms: f64,
}
