use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = aisle_assistant::Args::parse();

	aisle_assistant::run(args).await
}
