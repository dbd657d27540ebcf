use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = flowlib_api::Args::parse();

	flowlib_api::run(args).await
}
