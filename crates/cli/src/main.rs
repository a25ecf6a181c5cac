//! Bistro admin terminal front-end.
//!
//! Drives the list, create and edit pages against a REST backend and prints
//! what they render.

use std::sync::Arc;

use anyhow::Context;
use bistro_client::{ClientConfig, ConfigLayers, RestClient};
use bistro_pages::{History, PageContext};
use clap::Parser;

mod cli;
mod commands;
mod render;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	if matches!(cli.command, cli::Command::Entities) {
		print!("{}", render::entities());
		return Ok(());
	}

	let layers = ConfigLayers::from_env(cli.config.clone(), cli.base_url.clone());
	let config = ClientConfig::load(&layers).context("loading configuration")?;
	tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "config.loaded");

	let client = RestClient::new(&config).context("building HTTP client")?;
	let history = Arc::new(History::new());
	let ctx = PageContext::new(Arc::new(client), history.clone()).with_debounce(config.debounce);

	let output = commands::run(&ctx, &history, cli.command).await?;
	print!("{output}");
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("bistro_admin=debug,bistro_client=debug,bistro_forms=debug,bistro_pages=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
