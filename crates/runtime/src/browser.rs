//! [`Browser`] owning the DevTools connection and, when launched locally,
//! the browser process.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use sigwatch_protocol::{AttachToTargetResult, CreateTargetResult};
use tracing::{debug, warn};

use crate::connection::{Connection, DEFAULT_COMMAND_TIMEOUT};
use crate::error::Result;
use crate::launcher::{BrowserProcess, LaunchOptions, fetch_version};
use crate::page::Page;

/// Default time for a document to become interactive after navigation.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Browser {
	connection: Arc<Connection>,
	process: Option<BrowserProcess>,
	ws_endpoint: String,
	load_timeout: Duration,
}

impl Browser {
	/// Launches a local browser and connects to it.
	pub async fn launch(options: &LaunchOptions) -> Result<Self> {
		let (process, info) = BrowserProcess::launch(options).await?;
		let connection = Connection::connect(&info.web_socket_debugger_url, DEFAULT_COMMAND_TIMEOUT).await?;
		Ok(Self {
			connection,
			process: Some(process),
			ws_endpoint: info.web_socket_debugger_url,
			load_timeout: DEFAULT_LOAD_TIMEOUT,
		})
	}

	/// Attaches to an already running browser.
	///
	/// `endpoint` is either a `ws://` debugger URL or an `http://host:port`
	/// DevTools endpoint to discover it from. The browser is left running on
	/// [`close`](Self::close).
	pub async fn connect(endpoint: &str) -> Result<Self> {
		let ws_endpoint = if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
			endpoint.to_string()
		} else {
			fetch_version(endpoint).await?.web_socket_debugger_url
		};
		let connection = Connection::connect(&ws_endpoint, DEFAULT_COMMAND_TIMEOUT).await?;
		Ok(Self {
			connection,
			process: None,
			ws_endpoint,
			load_timeout: DEFAULT_LOAD_TIMEOUT,
		})
	}

	/// Overrides how long page navigations wait for the document.
	pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
		self.load_timeout = timeout;
		self
	}

	/// Browser-level WebSocket endpoint.
	pub fn ws_endpoint(&self) -> &str {
		&self.ws_endpoint
	}

	/// Opens a new blank tab and attaches to it.
	pub async fn new_page(&self) -> Result<Page> {
		let created: CreateTargetResult = serde_json::from_value(
			self.connection
				.send("Target.createTarget", Some(json!({ "url": "about:blank" })), None)
				.await?,
		)?;
		let attached: AttachToTargetResult = serde_json::from_value(
			self.connection
				.send(
					"Target.attachToTarget",
					Some(json!({ "targetId": created.target_id, "flatten": true })),
					None,
				)
				.await?,
		)?;
		debug!(target = "sigwatch.browser", target_id = %created.target_id, "attached page");
		Ok(Page::new(self.connection.clone(), created.target_id, attached.session_id, self.load_timeout))
	}

	/// Shuts the browser down when it was launched by this handle; otherwise
	/// only the connection is dropped.
	pub async fn close(mut self) -> Result<()> {
		if let Some(mut process) = self.process.take() {
			if let Err(err) = self.connection.send("Browser.close", None, None).await {
				debug!(target = "sigwatch.browser", error = %err, "Browser.close failed; killing process");
			}
			if let Err(err) = process.kill().await {
				warn!(target = "sigwatch.browser", error = %err, "failed to reap browser process");
				return Err(err);
			}
			debug!(target = "sigwatch.browser", port = process.port(), "browser closed");
		}
		Ok(())
	}
}
