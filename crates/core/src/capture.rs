//! Raw page observations returned by a [`RouterBrowser`](crate::browser::RouterBrowser).
//!
//! These are plain data: the browser reports what it sees, and the session
//! and extractor decide what it means.

use serde::{Deserialize, Serialize};

use crate::profile::RouterProfile;

/// Login-relevant state of the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
	pub url: String,
	/// The username field is rendered.
	#[serde(default)]
	pub login_form: bool,
	/// Visible text of a login error indicator.
	#[serde(default)]
	pub error_text: Option<String>,
	/// An element only shown to authenticated users is present.
	#[serde(default)]
	pub authenticated_marker: bool,
}

/// Interpretation of a [`LoginView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
	Authenticated,
	/// The router shows a login error.
	Rejected(String),
	/// The login form is shown without an error.
	LoginForm,
	/// Neither form nor authenticated content; the page is still changing.
	Pending,
}

impl LoginView {
	pub fn state(&self, profile: &RouterProfile) -> LoginState {
		if let Some(text) = self.error_text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
			return LoginState::Rejected(text.to_string());
		}
		if self.authenticated_marker {
			return LoginState::Authenticated;
		}
		if self.login_form {
			return LoginState::LoginForm;
		}
		if profile.is_login_url(&self.url) {
			LoginState::Pending
		} else {
			LoginState::Authenticated
		}
	}
}

/// Readiness of the status page marker element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerState {
	/// No marker element exists.
	#[default]
	Missing,
	/// A marker exists but has no text yet.
	Empty,
	/// A marker has text.
	Ready,
}

/// Text of the connection-info elements; `None` when the element is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConnection {
	pub status: Option<String>,
	pub rat_mode: Option<String>,
	pub operator: Option<String>,
	pub imsi: Option<String>,
	pub band: Option<String>,
}

/// Text of one band block's elements; `None` when the element is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBand {
	pub index: usize,
	#[serde(default)]
	pub rssi: Option<String>,
	#[serde(default)]
	pub sinr: Option<String>,
	#[serde(default)]
	pub rsrp: Option<String>,
	#[serde(default)]
	pub rsrq: Option<String>,
}

/// Everything read from the status page in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapture {
	pub url: String,
	#[serde(default)]
	pub login_form: bool,
	#[serde(default)]
	pub marker: MarkerState,
	#[serde(default)]
	pub connection: RawConnection,
	/// Blocks with at least one element present, in index order.
	#[serde(default)]
	pub bands: Vec<RawBand>,
}

impl PageCapture {
	/// Returns true when the page is the login page rather than status data.
	pub fn shows_login(&self, profile: &RouterProfile) -> bool {
		self.login_form || profile.is_login_url(&self.url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn view(url: &str) -> LoginView {
		LoginView {
			url: url.to_string(),
			..Default::default()
		}
	}

	#[test]
	fn error_text_wins_over_everything() {
		let profile = RouterProfile::default();
		let p = LoginView {
			login_form: true,
			authenticated_marker: true,
			error_text: Some(" Incorrect password ".into()),
			..view("http://192.168.1.1/login.html")
		};
		assert_eq!(p.state(&profile), LoginState::Rejected("Incorrect password".into()));
	}

	#[test]
	fn blank_error_text_is_ignored() {
		let profile = RouterProfile::default();
		let p = LoginView {
			login_form: true,
			error_text: Some("  ".into()),
			..view("http://192.168.1.1/login.html")
		};
		assert_eq!(p.state(&profile), LoginState::LoginForm);
	}

	#[test]
	fn leaving_login_page_counts_as_authenticated() {
		let profile = RouterProfile::default();
		assert_eq!(view("http://zyxel.home/index.html").state(&profile), LoginState::Authenticated);
		assert_eq!(view("http://zyxel.home/login.html").state(&profile), LoginState::Pending);
	}

	#[test]
	fn host_name_does_not_make_a_login_page() {
		let profile = RouterProfile::default();
		assert_eq!(view("http://loginbox.lan/index.html").state(&profile), LoginState::Authenticated);
		let page = PageCapture {
			url: "http://loginbox.lan/html/set_net_info.html".into(),
			..Default::default()
		};
		assert!(!page.shows_login(&profile));
	}

	#[test]
	fn capture_deserializes_from_script_output() {
		let json = r#"{
			"url": "http://192.168.1.1/html/set_net_info.html",
			"loginForm": false,
			"marker": "ready",
			"connection": {"status": "Connected", "band": "B7 + n78"},
			"bands": [{"index": 0, "rssi": "-40 dBm", "sinr": null}]
		}"#;
		let capture: PageCapture = serde_json::from_str(json).unwrap();
		assert_eq!(capture.marker, MarkerState::Ready);
		assert_eq!(capture.connection.band.as_deref(), Some("B7 + n78"));
		assert_eq!(capture.connection.imsi, None);
		assert_eq!(capture.bands[0].rssi.as_deref(), Some("-40 dBm"));
		assert!(!capture.shows_login(&RouterProfile::default()));
	}
}
