//! Browser discovery and target attachment payloads.

use serde::Deserialize;

/// `/json/version` response subset.
///
/// Chrome uses PascalCase keys here except for the debugger URL.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
	#[serde(rename = "Browser", default)]
	pub browser: Option<String>,
	#[serde(rename = "Protocol-Version", default)]
	pub protocol_version: Option<String>,
	#[serde(rename = "webSocketDebuggerUrl")]
	pub web_socket_debugger_url: String,
}

/// Result of `Target.createTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetResult {
	pub target_id: String,
}

/// Result of `Target.attachToTarget` with `flatten: true`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetResult {
	pub session_id: String,
}
