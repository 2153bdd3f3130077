pub mod state;

use std::path::PathBuf;

use clap::{
	Parser, Subcommand,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

#[derive(Debug, Parser)]
#[command(
	version = VERSION,
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Command {
	/// Rank catalog products for a shopper query.
	Resolve { query: String },
	/// Match help and policy pages by keyword.
	Pages { query: String },
	/// Products, pages and, when no product matches, related embedded records.
	Retrieve { query: String },
	/// Pull the catalog, merge the overlay and persist the index.
	Sync,
	/// Embed a text snippet and append it to the record registry.
	IndexText {
		#[arg(long)]
		id: String,
		text: String,
	},
	/// Embed a query and search the record registry by cosine similarity.
	VectorSearch {
		query: String,
		#[arg(long, value_name = "N")]
		top_k: Option<usize>,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = aisle_config::load(&args.config)?;

	init_tracing(&config)?;

	tracing::info!(
		version = VERSION,
		config = %args.config.display(),
		"Starting aisle-assistant."
	);

	let state = AppState::new(config).await?;
	let output = execute(&state, args.command).await?;

	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

async fn execute(state: &AppState, command: Command) -> color_eyre::Result<Value> {
	let service = &state.service;
	let output = match command {
		Command::Resolve { query } => serde_json::to_value(service.resolve_products(&query).await)?,
		Command::Pages { query } => serde_json::to_value(service.resolve_pages(&query).await)?,
		Command::Retrieve { query } => serde_json::to_value(service.retrieve(&query).await)?,
		Command::Sync => serde_json::to_value(service.sync_catalog().await?)?,
		Command::IndexText { id, text } =>
			serde_json::to_value(service.index_text(&id, &text).await?)?,
		Command::VectorSearch { query, top_k } => {
			let top_k = top_k.unwrap_or(service.cfg.ranking.vector_top_k as usize);

			serde_json::to_value(service.search_text(&query, top_k).await?)?
		},
	};

	Ok(output)
}

fn init_tracing(config: &aisle_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
