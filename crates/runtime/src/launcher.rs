//! Chromium discovery and process launch.
//!
//! The browser is started with `--remote-debugging-port` on a free local port
//! and a throwaway profile directory. Its DevTools WebSocket URL is discovered
//! by polling `/json/version` until the endpoint answers.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use sigwatch_protocol::VersionInfo;
use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::{Error, Result};

/// Options for launching a local browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
	/// Run without a visible window.
	pub headless: bool,
	/// Explicit browser executable; discovered from well-known paths when unset.
	pub executable: Option<PathBuf>,
	/// How long to wait for the DevTools endpoint after spawning.
	pub startup_timeout: Duration,
	/// Extra command-line switches appended after the defaults.
	pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
	fn default() -> Self {
		Self {
			headless: true,
			executable: None,
			startup_timeout: Duration::from_secs(15),
			extra_args: Vec::new(),
		}
	}
}

/// A browser process owned by this program.
///
/// The child is spawned with `kill_on_drop`, and the profile directory is
/// removed when the value is dropped.
#[derive(Debug)]
pub struct BrowserProcess {
	child: Child,
	port: u16,
	_profile: TempDir,
}

impl BrowserProcess {
	/// Spawns the browser and waits for its DevTools endpoint.
	pub async fn launch(options: &LaunchOptions) -> Result<(Self, VersionInfo)> {
		let executable = match &options.executable {
			Some(path) => path.clone(),
			None => find_chrome_executable().ok_or(Error::BrowserNotFound)?,
		};
		let port = free_local_port()?;
		let profile = tempfile::Builder::new().prefix("sigwatch-profile-").tempdir()?;
		let args = launch_args(options, port, profile.path());

		debug!(
			target = "sigwatch.browser",
			executable = %executable.display(),
			port,
			headless = options.headless,
			"launching browser"
		);

		let mut child = Command::new(&executable)
			.args(&args)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("{}: {e}", executable.display())))?;

		let deadline = tokio::time::Instant::now() + options.startup_timeout;
		let mut last_error = "endpoint not reachable".to_string();
		while tokio::time::Instant::now() < deadline {
			tokio::time::sleep(Duration::from_millis(200)).await;

			if let Ok(Some(status)) = child.try_wait() {
				return Err(Error::LaunchFailed(format!(
					"browser exited before the debugging endpoint became available (status: {status})"
				)));
			}

			match fetch_version(&format!("http://127.0.0.1:{port}")).await {
				Ok(info) => {
					debug!(target = "sigwatch.browser", port, browser = ?info.browser, "debugging endpoint ready");
					return Ok((
						Self {
							child,
							port,
							_profile: profile,
						},
						info,
					));
				}
				Err(err) => last_error = err.to_string(),
			}
		}

		Err(Error::LaunchFailed(format!(
			"debugging endpoint not available on port {port} after {}ms: {last_error}",
			options.startup_timeout.as_millis()
		)))
	}

	/// Remote debugging port of this process.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// Kills the process and waits for it to exit.
	pub async fn kill(&mut self) -> Result<()> {
		if self.child.try_wait()?.is_none() {
			self.child.kill().await?;
		}
		Ok(())
	}
}

/// Resolves the DevTools WebSocket URL from `/json/version` on an HTTP
/// endpoint such as `http://127.0.0.1:9222`.
pub async fn fetch_version(endpoint: &str) -> Result<VersionInfo> {
	let client = reqwest::Client::builder().timeout(Duration::from_millis(800)).build()?;
	let url = format!("{}/json/version", endpoint.trim_end_matches('/'));

	let response = client.get(&url).send().await.map_err(|e| Error::Discovery {
		endpoint: endpoint.to_string(),
		reason: e.to_string(),
	})?;
	if !response.status().is_success() {
		return Err(Error::Discovery {
			endpoint: endpoint.to_string(),
			reason: format!("unexpected status {}", response.status()),
		});
	}

	let info = response.json::<VersionInfo>().await.map_err(|e| Error::Discovery {
		endpoint: endpoint.to_string(),
		reason: format!("invalid /json/version payload: {e}"),
	})?;
	Ok(info)
}

fn launch_args(options: &LaunchOptions, port: u16, profile: &Path) -> Vec<String> {
	let mut args = vec![
		format!("--remote-debugging-port={port}"),
		format!("--user-data-dir={}", profile.display()),
		"--no-first-run".to_string(),
		"--no-default-browser-check".to_string(),
		"--disable-extensions".to_string(),
		"--disable-dev-shm-usage".to_string(),
		"--disable-gpu".to_string(),
		"--no-sandbox".to_string(),
		"--window-size=1920,1080".to_string(),
	];
	if options.headless {
		args.push("--headless=new".to_string());
	}
	args.extend(options.extra_args.iter().cloned());
	args.push("about:blank".to_string());
	args
}

fn free_local_port() -> Result<u16> {
	let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
	Ok(listener.local_addr()?.port())
}

/// Searches well-known install locations and `PATH` for a Chromium-family
/// browser.
pub fn find_chrome_executable() -> Option<PathBuf> {
	if let Some(path) = std::env::var_os("SIGWATCH_CHROME") {
		return Some(PathBuf::from(path));
	}

	let candidates: Vec<String> = if cfg!(target_os = "macos") {
		vec![
			"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
			"/Applications/Chromium.app/Contents/MacOS/Chromium",
			"/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
			"/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
		]
		.into_iter()
		.map(str::to_string)
		.collect()
	} else if cfg!(target_os = "windows") {
		windows_browser_candidates()
	} else {
		vec![
			"google-chrome-stable",
			"google-chrome",
			"chromium-browser",
			"chromium",
			"brave-browser",
			"microsoft-edge",
			"/usr/bin/google-chrome-stable",
			"/usr/bin/google-chrome",
			"/usr/bin/chromium-browser",
			"/usr/bin/chromium",
			"/snap/bin/chromium",
		]
		.into_iter()
		.map(str::to_string)
		.collect()
	};

	for candidate in candidates {
		if candidate.starts_with('/') || candidate.contains('\\') || candidate.contains(':') {
			let path = PathBuf::from(&candidate);
			if path.exists() {
				return Some(path);
			}
		} else if let Ok(path) = which::which(&candidate) {
			return Some(path);
		}
	}

	None
}

fn windows_browser_candidates() -> Vec<String> {
	let mut roots = Vec::new();
	for key in ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"] {
		if let Ok(value) = std::env::var(key) {
			roots.push(PathBuf::from(value));
		}
	}
	if roots.is_empty() {
		roots.push(PathBuf::from(r"C:\Program Files"));
		roots.push(PathBuf::from(r"C:\Program Files (x86)"));
	}

	let suffixes: &[&[&str]] = &[
		&["Google", "Chrome", "Application", "chrome.exe"],
		&["Microsoft", "Edge", "Application", "msedge.exe"],
		&["Chromium", "Application", "chrome.exe"],
	];

	let mut candidates = Vec::new();
	for root in roots {
		for suffix in suffixes {
			let mut path = root.clone();
			for component in *suffix {
				path.push(component);
			}
			candidates.push(path.to_string_lossy().to_string());
		}
	}
	candidates.extend(["chrome.exe", "msedge.exe", "chromium.exe"].map(str::to_string));
	candidates
}
