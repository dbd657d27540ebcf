//! Pieces shared by the `flowlib` binaries: version string, help styling, and log setup.

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

/// Level used when a directive does not parse.
pub const FALLBACK_LOG_LEVEL: &str = "info";

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default() | Effects::BOLD)
		.usage(AnsiColor::Green.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
}

pub fn env_filter(directive: &str) -> EnvFilter {
	EnvFilter::try_new(directive.trim()).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LOG_LEVEL))
}

/// Installs the global subscriber, writing to stderr so stdout stays free for command output.
pub fn init_tracing(directive: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(env_filter(directive))
		.with_writer(std::io::stderr)
		.init();
}
