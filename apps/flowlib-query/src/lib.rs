use std::{env, sync::Arc};

use clap::Parser;
use color_eyre::eyre;

use flowlib_client::{
	ControllerOptions, HttpTransport, QueryController, SearchTransport, ViewState, view,
};
use flowlib_domain::{FilterState, WorkflowRecord, filter_state};

#[derive(Debug, Parser)]
#[command(
	version = flowlib_cli::VERSION,
	rename_all = "kebab",
	styles = flowlib_cli::styles(),
)]
pub struct Args {
	/// Base URL of the catalog API, e.g. `http://127.0.0.1:8080`.
	#[arg(long, value_name = "URL")]
	pub api_base: String,
	#[arg(long, value_name = "TEXT")]
	pub q: Option<String>,
	#[arg(long, value_name = "SLUG")]
	pub category: Option<String>,
	#[arg(long, value_name = "SLUG")]
	pub integration: Option<String>,
	/// `all`, `awesome`, or `community`.
	#[arg(long, value_name = "SOURCE")]
	pub source: Option<String>,
	/// Minimum quality, 1-5.
	#[arg(long, value_name = "N")]
	pub quality: Option<String>,
	#[arg(long, value_name = "TRIGGER")]
	pub trigger: Option<String>,
	/// `relevance`, `quality`, `nodes`, `newest`, or `name`.
	#[arg(long, value_name = "SORT")]
	pub sort: Option<String>,
	/// Number of pages to fetch.
	#[arg(long, value_name = "N", default_value_t = 1)]
	pub pages: usize,
	#[arg(long, value_name = "N")]
	pub page_size: Option<usize>,
}
impl Args {
	/// Flags go through the same parser as URL parameters, so unknown values are dropped the same
	/// way.
	pub fn filters(&self) -> FilterState {
		let pairs = [
			(filter_state::PARAM_QUERY, &self.q),
			(filter_state::PARAM_CATEGORY, &self.category),
			(filter_state::PARAM_INTEGRATION, &self.integration),
			(filter_state::PARAM_SOURCE, &self.source),
			(filter_state::PARAM_QUALITY, &self.quality),
			(filter_state::PARAM_TRIGGER, &self.trigger),
			(filter_state::PARAM_SORT, &self.sort),
		];

		FilterState::from_query_pairs(
			pairs.into_iter().filter_map(|(key, value)| value.as_deref().map(|value| (key, value))),
		)
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	flowlib_cli::init_tracing(&env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()));

	let transport = Arc::new(HttpTransport::new(&args.api_base)?);
	let mut options = ControllerOptions::default();

	if let Some(page_size) = args.page_size {
		options.page_size = page_size;
	}

	let filters = args.filters();
	let controller = QueryController::new(transport.clone(), options, filters.clone());

	controller.refresh();

	let mut state = controller.settled().await;

	for _ in 1..args.pages {
		if !controller.load_more() {
			break;
		}

		state = controller.settled().await;
	}

	if let Some(err) = &state.error {
		eprintln!("{}", view::UNAVAILABLE_MESSAGE);

		return Err(eyre::eyre!("{err}"));
	}

	let corpus_total = corpus_total(transport.as_ref(), &filters, &state).await;

	print!("{}", render(&state, corpus_total));

	Ok(())
}

/// Size of the unfiltered catalog. Only asked for when filters are active.
async fn corpus_total(
	transport: &dyn SearchTransport,
	filters: &FilterState,
	state: &ViewState,
) -> usize {
	if *filters == FilterState::default() {
		return state.total;
	}

	match transport.search(&FilterState::default(), 1, 1).await {
		Ok(response) => response.total,
		Err(err) => {
			tracing::warn!(error = %err, "Failed to read the catalog size.");

			state.total
		},
	}
}

pub fn render(state: &ViewState, corpus_total: usize) -> String {
	let mut out = format!(
		"{} ({})\n{}\n",
		view::match_summary(state.total, corpus_total),
		view::status_label(state),
		state.url,
	);

	if let Some(notice) = view::notice(state) {
		out.push_str(notice.message());
		out.push('\n');

		return out;
	}

	for record in &state.results {
		out.push_str(&result_line(record));
		out.push('\n');
	}

	out.push_str(&view::loaded_summary(state));
	out.push('\n');

	if state.has_more {
		out.push_str(&view::load_more_label(state));
		out.push('\n');
	}

	out
}

fn result_line(record: &WorkflowRecord) -> String {
	format!(
		"{:<40} q{} {:>3} nodes  {} [{}]",
		record.name, record.quality, record.node_count, record.category_name, record.slug,
	)
}

#[cfg(test)]
mod tests {
	use flowlib_domain::SortOption;

	use super::*;

	fn args(extra: &[&str]) -> Args {
		let mut argv = vec!["flowlib-query", "--api-base", "127.0.0.1:8080"];

		argv.extend_from_slice(extra);

		Args::try_parse_from(argv).expect("args")
	}

	#[test]
	fn flags_map_onto_filters() {
		let filters =
			args(&["--q", "slack", "--sort", "name", "--quality", "9", "--source", "awesome"])
				.filters();

		assert_eq!(filters.query, "slack");
		assert_eq!(filters.sort_by, SortOption::Name);
		assert_eq!(filters.quality, None);
		assert_eq!(filters.to_query_string(), "q=slack&source=awesome&sort=name");
	}

	#[test]
	fn defaults_to_one_page_of_the_default_view() {
		let args = args(&[]);

		assert_eq!(args.pages, 1);
		assert_eq!(args.filters(), FilterState::default());
	}
}
