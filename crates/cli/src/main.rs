use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use sigwatch_cli::cli::Cli;
use sigwatch_cli::config::{self, Settings};
use sigwatch_cli::{credentials, logging, run};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	let verbosity = if cli.debug { cli.verbose.max(2) } else { cli.verbose };
	logging::init_logging(verbosity);

	if let Err(err) = try_main(cli).await {
		eprintln!("{} {err:#}", "error:".red().bold());
		std::process::exit(1);
	}
}

async fn try_main(cli: Cli) -> anyhow::Result<()> {
	let file = config::load(cli.config.as_deref())?;
	let settings = Settings::resolve(&cli, file)?;
	let credentials = credentials::acquire(&settings.username)?;

	if settings.login_only {
		return run::login_only(&settings, credentials).await.context("login test failed");
	}

	let (stop_tx, stop_rx) = watch::channel(false);
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			info!(target = "sigwatch.cli", "interrupt received");
			let _ = stop_tx.send(true);
		}
	});

	run::monitor(&settings, credentials, stop_rx).await?;
	Ok(())
}
