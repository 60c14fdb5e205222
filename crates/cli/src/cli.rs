use std::path::PathBuf;

use clap::Parser;

use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "sigwatch")]
#[command(about = "Monitor 5G router signal quality through its web interface")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Show the browser window and log debug details
	#[arg(long)]
	pub debug: bool,

	/// Disable the audio cue after each reading
	#[arg(long)]
	pub no_audio: bool,

	/// Take a single reading and exit
	#[arg(long, conflicts_with = "login_only")]
	pub once: bool,

	/// Seconds between readings in continuous mode [default: 30]
	#[arg(long, value_name = "SECS")]
	pub interval: Option<u64>,

	/// Router base URL to try; repeat for fallbacks in order
	#[arg(long = "url", value_name = "URL")]
	pub urls: Vec<String>,

	/// Router login name [default: admin]
	#[arg(short, long, env = "SIGWATCH_USERNAME")]
	pub username: Option<String>,

	/// File receiving the latest reading as JSON [default: signal_data.json]
	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,

	/// Append every reading as one JSON line to this file
	#[arg(long, value_name = "FILE")]
	pub history: Option<PathBuf>,

	/// Config file [default: ~/.config/sigwatch/config.json]
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Attach to a running browser instead of launching one
	#[arg(long, value_name = "URL")]
	pub cdp_endpoint: Option<String>,

	/// Only check that the router accepts the credentials
	#[arg(long)]
	pub login_only: bool,
}
