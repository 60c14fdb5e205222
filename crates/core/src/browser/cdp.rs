//! [`RouterBrowser`] over the DevTools protocol.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sigwatch_runtime::{Browser, Error as RuntimeError, LaunchOptions, Page};
use tracing::{debug, info, warn};

use super::{BrowserLauncher, Result, RouterBrowser, script};
use crate::capture::{LoginView, PageCapture};
use crate::error::BrowserError;
use crate::model::Credentials;
use crate::profile::RouterProfile;

/// How a [`CdpLauncher`] obtains its browser.
#[derive(Debug, Clone)]
pub enum CdpTarget {
	/// Start a private browser process.
	Launch(LaunchOptions),
	/// Attach to a running browser (`ws://` or `http://host:port`).
	Connect(String),
}

#[derive(Debug, Clone)]
pub struct CdpLauncher {
	target: CdpTarget,
	load_timeout: Duration,
}

impl CdpLauncher {
	pub fn launch(options: LaunchOptions) -> Self {
		Self {
			target: CdpTarget::Launch(options),
			load_timeout: sigwatch_runtime::DEFAULT_LOAD_TIMEOUT,
		}
	}

	pub fn connect(endpoint: impl Into<String>) -> Self {
		Self {
			target: CdpTarget::Connect(endpoint.into()),
			load_timeout: sigwatch_runtime::DEFAULT_LOAD_TIMEOUT,
		}
	}

	/// Bounds how long each navigation waits for the document.
	pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
		self.load_timeout = timeout;
		self
	}
}

#[async_trait]
impl BrowserLauncher for CdpLauncher {
	type Browser = CdpRouterBrowser;

	async fn launch(&self) -> Result<CdpRouterBrowser> {
		let browser = match &self.target {
			CdpTarget::Launch(options) => {
				info!(target = "sigwatch.browser", headless = options.headless, "launching browser");
				Browser::launch(options).await?
			}
			CdpTarget::Connect(endpoint) => {
				info!(target = "sigwatch.browser", %endpoint, "connecting to browser");
				Browser::connect(endpoint).await?
			}
		}
		.with_load_timeout(self.load_timeout);

		let page = browser.new_page().await?;
		Ok(CdpRouterBrowser {
			browser: Some(browser),
			page,
		})
	}
}

/// One browser tab driven through `Runtime.evaluate`.
pub struct CdpRouterBrowser {
	browser: Option<Browser>,
	page: Page,
}

impl CdpRouterBrowser {
	async fn evaluate<T: DeserializeOwned>(&self, expression: &str, what: &str) -> Result<T> {
		let value = self.page.evaluate_value(expression).await.map_err(|err| match err {
			RuntimeError::Evaluation(message) => BrowserError::Script(format!("{what}: {message}")),
			other => BrowserError::Runtime(other),
		})?;
		serde_json::from_value(value).map_err(|err| BrowserError::Script(format!("malformed {what} result: {err}")))
	}
}

fn script_error(err: serde_json::Error) -> BrowserError {
	BrowserError::Script(format!("could not build page script: {err}"))
}

#[async_trait]
impl RouterBrowser for CdpRouterBrowser {
	async fn open(&mut self, url: &str) -> Result<()> {
		match self.page.goto(url).await {
			Ok(()) => Ok(()),
			Err(RuntimeError::Navigation { reason, .. }) => Err(BrowserError::Unreachable {
				url: url.to_string(),
				reason,
			}),
			Err(err @ RuntimeError::Timeout { .. }) => Err(BrowserError::Unreachable {
				url: url.to_string(),
				reason: err.to_string(),
			}),
			Err(err) => Err(err.into()),
		}
	}

	async fn reload(&mut self) -> Result<()> {
		Ok(self.page.reload().await?)
	}

	async fn current_url(&mut self) -> Result<String> {
		Ok(self.page.url().await?)
	}

	async fn inspect_login(&mut self, profile: &RouterProfile) -> Result<LoginView> {
		let expression = script::login_view(profile).map_err(script_error)?;
		self.evaluate(&expression, "login view").await
	}

	async fn submit_login(&mut self, profile: &RouterProfile, credentials: &Credentials) -> Result<()> {
		let expression = script::submit(profile, credentials).map_err(script_error)?;
		debug!(target = "sigwatch.browser", username = credentials.username(), "submitting login form");
		let _: bool = self.evaluate(&expression, "login submit").await?;
		Ok(())
	}

	async fn capture(&mut self, profile: &RouterProfile) -> Result<PageCapture> {
		let expression = script::capture(profile).map_err(script_error)?;
		self.evaluate(&expression, "status capture").await
	}

	async fn close(&mut self) -> Result<()> {
		let Some(browser) = self.browser.take() else {
			return Ok(());
		};
		if let Err(err) = self.page.close().await {
			debug!(target = "sigwatch.browser", error = %err, "closing tab failed");
		}
		if let Err(err) = browser.close().await {
			warn!(target = "sigwatch.browser", error = %err, "browser did not shut down cleanly");
			return Err(err.into());
		}
		Ok(())
	}
}
