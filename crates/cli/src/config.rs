//! Optional JSON config file and its merge with command-line flags.
//!
//! Precedence, highest first: flags, `--config FILE`, the default file at
//! `~/.config/sigwatch/config.json`, built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sigwatch::{RouterProfile, RunMode, default_candidates};
use url::Url;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Newest config schema this build understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Upper bound for every seconds value: one week.
pub const MAX_SECS: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_OUTPUT: &str = "signal_data.json";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_SOUND_DIR: &str = "sound";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
	#[serde(default)]
	pub schema: u32,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub urls: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub interval_secs: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub output: Option<PathBuf>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub history: Option<PathBuf>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub audio: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sound_dir: Option<PathBuf>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub headless: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cdp_endpoint: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub browser_path: Option<PathBuf>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub login_timeout_secs: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_timeout_secs: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_reauth: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profile: Option<RouterProfile>,
}

impl FileConfig {
	/// Overlays the values set in `other` onto `self`.
	pub fn merge(&mut self, other: &FileConfig) {
		if !other.urls.is_empty() {
			self.urls = other.urls.clone();
		}
		macro_rules! take {
			($($field:ident),*) => {
				$(if other.$field.is_some() {
					self.$field = other.$field.clone();
				})*
			};
		}
		take!(
			username,
			interval_secs,
			output,
			history,
			audio,
			sound_dir,
			headless,
			cdp_endpoint,
			browser_path,
			login_timeout_secs,
			page_timeout_secs,
			max_reauth,
			profile
		);
		self.schema = self.schema.max(other.schema);
	}
}

/// `~/.config/sigwatch/config.json` (platform config dir).
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("sigwatch").join("config.json"))
}

fn read(path: &Path) -> Result<FileConfig> {
	let content = fs::read_to_string(path).map_err(|err| CliError::Config {
		path: path.to_path_buf(),
		reason: err.to_string(),
	})?;
	let config: FileConfig = serde_json::from_str(&content).map_err(|err| CliError::Config {
		path: path.to_path_buf(),
		reason: err.to_string(),
	})?;
	if config.schema > SCHEMA_VERSION {
		return Err(CliError::Config {
			path: path.to_path_buf(),
			reason: format!("unsupported schema {} (newest known is {SCHEMA_VERSION})", config.schema),
		});
	}
	Ok(config)
}

/// Loads the default file when present, then `explicit`, which must exist.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
	let mut config = FileConfig::default();
	if let Some(path) = default_path().filter(|p| p.is_file()) {
		config.merge(&read(&path)?);
	}
	if let Some(path) = explicit {
		config.merge(&read(path)?);
	}
	Ok(config)
}

/// Fully resolved run parameters.
#[derive(Debug, Clone)]
pub struct Settings {
	pub candidates: Vec<Url>,
	pub username: String,
	pub mode: RunMode,
	pub login_only: bool,
	pub output: PathBuf,
	pub history: Option<PathBuf>,
	pub audio: bool,
	pub sound_dir: PathBuf,
	pub headless: bool,
	pub cdp_endpoint: Option<String>,
	pub browser_path: Option<PathBuf>,
	pub login_timeout: Option<Duration>,
	pub page_timeout: Option<Duration>,
	pub max_reauth: Option<u32>,
	pub profile: RouterProfile,
}

fn parse_url(raw: &str) -> Result<Url> {
	let with_scheme = if raw.contains("://") { raw.to_string() } else { format!("http://{raw}") };
	let url = Url::parse(&with_scheme).map_err(|err| CliError::InvalidUrl {
		url: raw.to_string(),
		reason: err.to_string(),
	})?;
	if url.host_str().is_none() {
		return Err(CliError::InvalidUrl {
			url: raw.to_string(),
			reason: "missing host".into(),
		});
	}
	Ok(url)
}

fn nonzero_secs(secs: Option<u64>, what: &str) -> Result<Option<Duration>> {
	match secs {
		Some(0) => Err(CliError::Usage(format!("{what} must be at least 1 second"))),
		Some(secs) if secs > MAX_SECS => Err(CliError::Usage(format!("{what} must be at most {MAX_SECS} seconds"))),
		other => Ok(other.map(Duration::from_secs)),
	}
}

impl Settings {
	pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
		let urls = if cli.urls.is_empty() { &file.urls } else { &cli.urls };
		let candidates = if urls.is_empty() {
			default_candidates()
		} else {
			urls.iter().map(|u| parse_url(u)).collect::<Result<Vec<_>>>()?
		};

		let interval = nonzero_secs(cli.interval.or(file.interval_secs), "--interval")?
			.unwrap_or(Duration::from_secs(DEFAULT_INTERVAL_SECS));
		let mode = if cli.once { RunMode::Once } else { RunMode::Continuous { interval } };

		Ok(Self {
			candidates,
			username: cli
				.username
				.clone()
				.or(file.username)
				.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
			mode,
			login_only: cli.login_only,
			output: cli.output.clone().or(file.output).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
			history: cli.history.clone().or(file.history),
			audio: !cli.no_audio && file.audio.unwrap_or(true),
			sound_dir: file.sound_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SOUND_DIR)),
			headless: !cli.debug && file.headless.unwrap_or(true),
			cdp_endpoint: cli.cdp_endpoint.clone().or(file.cdp_endpoint),
			browser_path: file.browser_path,
			login_timeout: nonzero_secs(file.login_timeout_secs, "loginTimeoutSecs")?,
			page_timeout: nonzero_secs(file.page_timeout_secs, "pageTimeoutSecs")?,
			max_reauth: file.max_reauth,
			profile: file.profile.unwrap_or_default(),
		})
	}
}
