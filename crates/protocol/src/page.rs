//! `Page` domain payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateParams {
	pub url: String,
}

/// Result of `Page.navigate`.
///
/// `error_text` is set for network-level failures such as
/// `net::ERR_NAME_NOT_RESOLVED`; the command itself still succeeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
	pub frame_id: String,
	#[serde(default)]
	pub loader_id: Option<String>,
	#[serde(default)]
	pub error_text: Option<String>,
}
