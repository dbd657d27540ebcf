//! Text shown around the result grid.

use crate::{LoadingMode, ViewState};

pub const UNAVAILABLE_MESSAGE: &str = "Search is temporarily unavailable. Please try again shortly.";
pub const UPDATING_LABEL: &str = "Updating results…";

/// Why the grid is empty, distinguishing a failed search from one that matched nothing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
	Unavailable,
	NoResults(String),
}
impl Notice {
	pub fn message(&self) -> &str {
		match self {
			Self::Unavailable => UNAVAILABLE_MESSAGE,
			Self::NoResults(message) => message,
		}
	}
}

pub fn notice(state: &ViewState) -> Option<Notice> {
	if state.error.is_some() {
		return Some(Notice::Unavailable);
	}
	if state.loading == LoadingMode::Idle && state.results.is_empty() {
		return Some(Notice::NoResults(empty_message(&state.filters.query)));
	}

	None
}

pub fn empty_message(query: &str) -> String {
	if query.is_empty() {
		"No workflows match your filters. Try adjusting your criteria.".to_string()
	} else {
		format!("No workflows found for \"{query}\". Try a different search term.")
	}
}

pub fn latency_label(latency_ms: f64) -> String {
	if latency_ms >= 1.0 { format!("{latency_ms:.1} ms") } else { "<1 ms".to_string() }
}

/// Latency, or a progress label while new filters load.
pub fn status_label(state: &ViewState) -> String {
	if state.loading == LoadingMode::Filters {
		UPDATING_LABEL.to_string()
	} else {
		format!("{} server time", latency_label(state.latency_ms))
	}
}

pub fn match_summary(total: usize, corpus_total: usize) -> String {
	if total == corpus_total {
		format!("{} workflows available", group_thousands(total))
	} else {
		format!("{} of {} workflows match", group_thousands(total), group_thousands(corpus_total))
	}
}

pub fn load_more_label(state: &ViewState) -> String {
	if state.loading.is_loading() {
		"Loading…".to_string()
	} else {
		format!("Load More ({} remaining)", state.remaining())
	}
}

pub fn loaded_summary(state: &ViewState) -> String {
	if state.results.is_empty() {
		return "No workflows to display".to_string();
	}

	let updating = if state.loading.is_loading() { " · Updating…" } else { "" };

	format!("Loaded {} of {} workflows{updating}", state.results.len(), state.total)
}

fn group_thousands(value: usize) -> String {
	let digits = value.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);

	for (idx, ch) in digits.chars().enumerate() {
		if idx > 0 && (digits.len() - idx) % 3 == 0 {
			out.push(',');
		}

		out.push(ch);
	}

	out
}
