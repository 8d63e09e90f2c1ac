use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = scrmbld_client::Args::parse();
	scrmbld_client::run(args).await
}
