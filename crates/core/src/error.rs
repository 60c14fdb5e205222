//! Error types for session, extraction and monitoring.

use thiserror::Error;

/// Failure of the browser behind a [`RouterBrowser`](crate::browser::RouterBrowser).
#[derive(Debug, Error)]
pub enum BrowserError {
	/// Navigation reached no page (DNS failure, refused connection, timeout).
	#[error("{url} unreachable: {reason}")]
	Unreachable { url: String, reason: String },

	/// A page script failed or returned something unexpected.
	#[error("page script failed: {0}")]
	Script(String),

	#[error(transparent)]
	Runtime(#[from] sigwatch_runtime::Error),
}

impl BrowserError {
	/// Returns true when the browser handle is dead and must be replaced.
	pub fn is_disconnect(&self) -> bool {
		matches!(self, BrowserError::Runtime(err) if err.is_disconnect())
	}
}

/// Reasons [`SessionManager::authenticate`](crate::session::SessionManager::authenticate) fails.
#[derive(Debug, Error)]
pub enum AuthError {
	#[error("no router login page reachable (tried {})", .tried.join(", "))]
	AllEndpointsUnreachable { tried: Vec<String> },

	#[error("router at {url} rejected the credentials{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
	InvalidCredentials { url: String, reason: Option<String> },

	#[error("login at {url} not confirmed after {waited_ms}ms")]
	LoginTimeout { url: String, waited_ms: u64 },

	#[error(transparent)]
	Browser(#[from] BrowserError),
}

/// Reasons a metric fetch fails.
#[derive(Debug, Error)]
pub enum FetchError {
	/// The router sent us back to the login page.
	#[error("router session expired")]
	SessionExpired,

	#[error("status page layout not recognized: {0}")]
	PageLayoutUnexpected(String),

	#[error(transparent)]
	Browser(#[from] BrowserError),
}

/// Fatal outcome of a [`Monitor`](crate::monitor::Monitor) run.
#[derive(Debug, Error)]
pub enum MonitorError {
	#[error(transparent)]
	Auth(#[from] AuthError),

	#[error(transparent)]
	Fetch(#[from] FetchError),

	#[error("session kept expiring; gave up after {attempts} re-authentications")]
	ReauthExhausted { attempts: u32 },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_are_readable() {
		let err = AuthError::AllEndpointsUnreachable {
			tried: vec!["http://192.168.1.1/".into(), "http://zyxel.home/".into()],
		};
		assert_eq!(
			err.to_string(),
			"no router login page reachable (tried http://192.168.1.1/, http://zyxel.home/)"
		);

		let err = AuthError::InvalidCredentials {
			url: "http://192.168.1.1/".into(),
			reason: Some("Incorrect password".into()),
		};
		assert_eq!(
			err.to_string(),
			"router at http://192.168.1.1/ rejected the credentials: Incorrect password"
		);

		let err = AuthError::InvalidCredentials {
			url: "http://192.168.1.1/".into(),
			reason: None,
		};
		assert_eq!(err.to_string(), "router at http://192.168.1.1/ rejected the credentials");
	}

	#[test]
	fn disconnect_detection() {
		assert!(BrowserError::Runtime(sigwatch_runtime::Error::ConnectionClosed).is_disconnect());
		assert!(!BrowserError::Script("boom".into()).is_disconnect());
		assert!(
			!BrowserError::Unreachable {
				url: "http://x/".into(),
				reason: "dns".into()
			}
			.is_disconnect()
		);
	}
}
