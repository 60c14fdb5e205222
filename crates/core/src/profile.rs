//! Page layout of the supported router UI.
//!
//! Everything the browser scripts look up (paths, selectors, element ids)
//! comes from a [`RouterProfile`], so firmware variations are a config change
//! rather than a code change.

use serde::{Deserialize, Serialize};
use url::Url;

/// Element ids of the connection-info section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionIds {
	pub status: String,
	pub rat_mode: String,
	pub operator: String,
	pub imsi: String,
	pub band: String,
}

impl Default for ConnectionIds {
	fn default() -> Self {
		Self {
			status: "connStatus".into(),
			rat_mode: "rat".into(),
			operator: "netOp".into(),
			imsi: "imsi".into(),
			band: "opBand".into(),
		}
	}
}

/// Element id stems of one band block. Block 0 uses the stem as is, block
/// `n >= 1` appends `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BandIds {
	pub rssi: String,
	pub sinr: String,
	pub rsrp: String,
	pub rsrq: String,
}

impl Default for BandIds {
	fn default() -> Self {
		Self {
			rssi: "sigStr".into(),
			sinr: "sinr".into(),
			rsrp: "rsrp".into(),
			rsrq: "rsrq".into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterProfile {
	pub login_path: String,
	pub status_path: String,
	pub username_selector: String,
	pub password_selector: String,
	pub submit_selector: String,
	/// Elements whose visible text means the router rejected the login.
	pub error_selectors: Vec<String>,
	/// Elements only rendered for an authenticated user.
	pub authenticated_selectors: Vec<String>,
	/// Ids whose non-empty text means the status page finished rendering,
	/// in order of preference.
	pub marker_ids: Vec<String>,
	pub connection_ids: ConnectionIds,
	pub band_ids: BandIds,
	/// Highest block count scanned on the status page.
	pub max_bands: usize,
}

impl Default for RouterProfile {
	fn default() -> Self {
		Self {
			login_path: "/login.html".into(),
			status_path: "/html/set_net_info.html".into(),
			username_selector: "#admin_username".into(),
			password_selector: "#admin_password".into(),
			submit_selector: "#btn_login".into(),
			error_selectors: vec!["#login_error".into(), "#errorMsg".into(), ".login-error".into()],
			authenticated_selectors: vec!["#logout".into(), "li.menu-item".into()],
			marker_ids: vec!["connStatus".into(), "sigStr".into()],
			connection_ids: ConnectionIds::default(),
			band_ids: BandIds::default(),
			max_bands: 8,
		}
	}
}

impl RouterProfile {
	/// Returns true when the path of `url` is the login page or has a
	/// `login` segment. The host is ignored.
	pub fn is_login_url(&self, url: &str) -> bool {
		let path = url_path(url).to_ascii_lowercase();
		path == self.login_path.to_ascii_lowercase() || path.split('/').any(|segment| segment.contains("login"))
	}

	/// Returns true when `url` is the status page.
	pub fn is_status_url(&self, url: &str) -> bool {
		url_path(url).ends_with(self.status_path.trim_start_matches('/'))
	}
}

/// Path of an absolute URL; anything unparseable is treated as a bare path.
fn url_path(url: &str) -> String {
	match Url::parse(url) {
		Ok(parsed) => parsed.path().to_string(),
		Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
	}
}
