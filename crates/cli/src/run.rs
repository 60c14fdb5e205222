//! Wires resolved settings into a monitor and runs it.

use std::io::IsTerminal;

use colored::Colorize;
use sigwatch::{
	CdpLauncher, Credentials, MetricExtractor, Monitor, MonitorConfig, PollPolicy, RunMode, RunSummary, SessionConfig,
	SessionManager,
};
use sigwatch_runtime::LaunchOptions;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::audio::AudioCue;
use crate::config::Settings;
use crate::error::Result;
use crate::sink::{Layout, TerminalSink};
use crate::store::SnapshotStore;

pub fn launcher(settings: &Settings) -> CdpLauncher {
	let launcher = match &settings.cdp_endpoint {
		Some(endpoint) => CdpLauncher::connect(endpoint.clone()),
		None => CdpLauncher::launch(LaunchOptions {
			headless: settings.headless,
			executable: settings.browser_path.clone(),
			..LaunchOptions::default()
		}),
	};
	match settings.page_timeout {
		Some(timeout) => launcher.with_load_timeout(timeout),
		None => launcher,
	}
}

pub fn session_config(settings: &Settings) -> SessionConfig {
	let config = SessionConfig {
		candidates: settings.candidates.clone(),
		profile: settings.profile.clone(),
		..SessionConfig::default()
	};
	match settings.login_timeout {
		Some(timeout) => config.with_step_timeout(timeout),
		None => config,
	}
}

pub fn extractor(settings: &Settings) -> MetricExtractor {
	match settings.page_timeout {
		Some(timeout) => MetricExtractor::new(PollPolicy::default().with_timeout(timeout)),
		None => MetricExtractor::default(),
	}
}

pub fn monitor_config(settings: &Settings) -> MonitorConfig {
	let mut config = MonitorConfig {
		mode: settings.mode,
		..MonitorConfig::default()
	};
	if let Some(max_reauth) = settings.max_reauth {
		config.max_reauth = max_reauth;
	}
	config
}

fn sink(settings: &Settings) -> TerminalSink {
	let layout = match settings.mode {
		RunMode::Once => Layout::Full,
		RunMode::Continuous { interval } => Layout::Compact {
			interval,
			clear: std::io::stdout().is_terminal(),
		},
	};
	let store = SnapshotStore::new(settings.output.clone(), settings.history.clone());
	let audio = settings.audio.then(|| AudioCue::new(settings.sound_dir.clone()));
	TerminalSink::stdout(layout, store, audio)
}

fn banner(settings: &Settings) {
	println!("{}", "5G Router Signal Monitor".cyan().bold());
	println!("{}", "=".repeat(50).cyan());
	if !settings.headless {
		println!("{}", "DEBUG MODE ENABLED - Browser will be visible".yellow());
	}
	if !settings.audio {
		println!("{}", "AUDIO FEEDBACK DISABLED".yellow());
	}
	if let RunMode::Continuous { interval } = settings.mode {
		println!("{}", "Starting signal monitoring...".green());
		println!("{}", format!("Refresh interval: {} seconds", interval.as_secs()).cyan());
		println!("{}", "Press Ctrl+C to stop monitoring".cyan());
	}
}

/// Monitors until the mode completes or `stop` turns true.
pub async fn monitor(settings: &Settings, credentials: Credentials, mut stop: watch::Receiver<bool>) -> Result<RunSummary> {
	banner(settings);
	let sessions = SessionManager::new(launcher(settings), session_config(settings));
	let mut monitor = Monitor::new(sessions, extractor(settings), credentials, monitor_config(settings));
	let mut sink = sink(settings);

	let summary = monitor.run(&mut sink, &mut stop).await?;
	info!(
		target = "sigwatch.cli",
		cycles = summary.cycles,
		snapshots = summary.snapshots,
		errors = summary.errors,
		reauthentications = summary.reauthentications,
		"monitoring finished"
	);
	if matches!(settings.mode, RunMode::Continuous { .. }) {
		println!("\n{}", "Monitoring stopped".yellow());
	}
	Ok(summary)
}

/// Logs in once, reports where, and releases the browser.
pub async fn login_only(settings: &Settings, credentials: Credentials) -> Result<()> {
	println!("{}", "Testing login process...".yellow());
	let mut sessions = SessionManager::new(launcher(settings), session_config(settings));
	let outcome = sessions.authenticate(&credentials).await;
	if let Ok(()) = outcome {
		println!("{}", "Login successful!".green());
		if let Some(url) = sessions.base_url() {
			println!("{}", format!("Router URL: {url}").cyan());
		}
	}
	if let Err(err) = sessions.close().await {
		warn!(target = "sigwatch.cli", error = %err, "browser shutdown failed");
	}
	Ok(outcome?)
}
