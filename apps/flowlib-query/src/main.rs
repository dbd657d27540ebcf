use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = flowlib_query::Args::parse();

	flowlib_query::run(args).await
}
