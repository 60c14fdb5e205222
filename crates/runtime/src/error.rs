//! Error types for the browser runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum Error {
	/// No Chromium-family executable was found on this machine.
	#[error("Chrome/Chromium executable not found. Install Chrome or pass an explicit executable path.")]
	BrowserNotFound,

	/// The browser process could not be started or exited during startup.
	#[error("Failed to launch browser: {0}")]
	LaunchFailed(String),

	/// The DevTools endpoint did not answer discovery.
	#[error("DevTools endpoint {endpoint} not reachable: {reason}")]
	Discovery { endpoint: String, reason: String },

	/// WebSocket transport failure.
	#[error("WebSocket error: {0}")]
	WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

	/// The browser rejected a command.
	#[error("{method} failed: {message} (code {code})")]
	Protocol { method: String, code: i64, message: String },

	/// Navigation reached no document (DNS failure, refused connection, ...).
	#[error("Navigation to {url} failed: {reason}")]
	Navigation { url: String, reason: String },

	/// Evaluated script threw.
	#[error("Script evaluation failed: {0}")]
	Evaluation(String),

	/// Timeout waiting for a command reply or page state.
	#[error("Timeout after {ms}ms waiting for {what}")]
	Timeout { what: String, ms: u64 },

	/// Connection closed while a command was in flight.
	#[error("DevTools connection closed")]
	ConnectionClosed,

	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns true when the failure is at transport level and the browser
	/// handle should be considered dead.
	pub fn is_disconnect(&self) -> bool {
		matches!(self, Error::ConnectionClosed | Error::WebSocket(_))
	}
}
