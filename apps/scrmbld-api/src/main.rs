use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = scrmbld_api::Args::parse();
	scrmbld_api::run(args).await
}
