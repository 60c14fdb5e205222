//! Signal readings produced by one extraction cycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login credentials for the router web UI.
///
/// Deliberately not `Serialize`; `Debug` never prints the password.
#[derive(Clone)]
pub struct Credentials {
	username: String,
	password: String,
}

impl Credentials {
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			password: password.into(),
		}
	}

	pub fn username(&self) -> &str {
		&self.username
	}

	pub fn password(&self) -> &str {
		&self.password
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Radio metric reported per band block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
	Rssi,
	Rsrp,
	Rsrq,
	Sinr,
}

impl MetricKind {
	/// Every metric, in display order.
	pub const ALL: [MetricKind; 4] = [MetricKind::Rssi, MetricKind::Sinr, MetricKind::Rsrp, MetricKind::Rsrq];

	/// Native unit of the metric.
	pub fn unit(self) -> &'static str {
		match self {
			MetricKind::Rssi | MetricKind::Rsrp => "dBm",
			MetricKind::Rsrq | MetricKind::Sinr => "dB",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			MetricKind::Rssi => "RSSI",
			MetricKind::Rsrp => "RSRP",
			MetricKind::Rsrq => "RSRQ",
			MetricKind::Sinr => "SINR",
		}
	}

	/// Long-form name shown in the full report.
	pub fn description(self) -> &'static str {
		match self {
			MetricKind::Rssi => "Received Signal Strength Indicator",
			MetricKind::Rsrp => "Reference Signal Received Power",
			MetricKind::Rsrq => "Reference Signal Received Quality",
			MetricKind::Sinr => "Signal-to-Interference-plus-Noise Ratio",
		}
	}
}

impl fmt::Display for MetricKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Metrics of one active carrier. Absent fields stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandReading {
	pub band_label: String,
	#[serde(default)]
	pub rssi: Option<f64>,
	#[serde(default)]
	pub sinr: Option<f64>,
	#[serde(default)]
	pub rsrp: Option<f64>,
	#[serde(default)]
	pub rsrq: Option<f64>,
}

impl BandReading {
	pub fn new(band_label: impl Into<String>) -> Self {
		Self {
			band_label: band_label.into(),
			rssi: None,
			sinr: None,
			rsrp: None,
			rsrq: None,
		}
	}

	pub fn get(&self, kind: MetricKind) -> Option<f64> {
		match kind {
			MetricKind::Rssi => self.rssi,
			MetricKind::Sinr => self.sinr,
			MetricKind::Rsrp => self.rsrp,
			MetricKind::Rsrq => self.rsrq,
		}
	}

	pub fn set(&mut self, kind: MetricKind, value: Option<f64>) {
		match kind {
			MetricKind::Rssi => self.rssi = value,
			MetricKind::Sinr => self.sinr = value,
			MetricKind::Rsrp => self.rsrp = value,
			MetricKind::Rsrq => self.rsrq = value,
		}
	}

	/// Returns true when no metric was reported for this band.
	pub fn is_empty(&self) -> bool {
		MetricKind::ALL.iter().all(|kind| self.get(*kind).is_none())
	}
}

/// Best-effort connection summary from the status page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub rat_mode: Option<String>,
	#[serde(default)]
	pub operator: Option<String>,
	#[serde(default)]
	pub imsi: Option<String>,
	#[serde(default)]
	pub band: Option<String>,
}

impl ConnectionInfo {
	/// Placeholder rendered for fields the page did not report.
	pub const MISSING: &'static str = "N/A";

	/// Labeled fields in display order, with absent values rendered as
	/// [`MISSING`](Self::MISSING).
	pub fn fields(&self) -> [(&'static str, &str); 5] {
		fn show(v: &Option<String>) -> &str {
			v.as_deref().unwrap_or(ConnectionInfo::MISSING)
		}
		[
			("Connection Status", show(&self.status)),
			("RAT Mode", show(&self.rat_mode)),
			("Network Operator", show(&self.operator)),
			("IMSI", show(&self.imsi)),
			("Operation Band", show(&self.band)),
		]
	}

	/// Returns true when at least one field was reported.
	pub fn is_populated(&self) -> bool {
		[&self.status, &self.rat_mode, &self.operator, &self.imsi, &self.band]
			.iter()
			.any(|v| v.is_some())
	}
}

/// One complete, timestamped extraction result.
///
/// Immutable once built; fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSnapshot {
	timestamp: DateTime<Utc>,
	connection_info: ConnectionInfo,
	#[serde(default)]
	bands: Vec<BandReading>,
}

impl SignalSnapshot {
	pub fn new(timestamp: DateTime<Utc>, connection_info: ConnectionInfo, bands: Vec<BandReading>) -> Self {
		Self {
			timestamp,
			connection_info,
			bands,
		}
	}

	pub fn timestamp(&self) -> DateTime<Utc> {
		self.timestamp
	}

	pub fn connection_info(&self) -> &ConnectionInfo {
		&self.connection_info
	}

	pub fn bands(&self) -> &[BandReading] {
		&self.bands
	}
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;
	use serde_json::json;

	use super::*;

	#[test]
	fn credentials_debug_hides_password() {
		let creds = Credentials::new("admin", "hunter2");
		let printed = format!("{creds:?}");
		assert!(printed.contains("admin"));
		assert!(!printed.contains("hunter2"));
	}

	#[test]
	fn absent_metrics_serialize_as_null() {
		let mut band = BandReading::new("PSCC N78");
		band.set(MetricKind::Sinr, Some(16.0));
		let value = serde_json::to_value(&band).unwrap();
		assert_eq!(
			value,
			json!({ "bandLabel": "PSCC N78", "rssi": null, "sinr": 16.0, "rsrp": null, "rsrq": null })
		);
	}

	#[test]
	fn missing_connection_fields_render_as_na() {
		let info = ConnectionInfo {
			status: Some("Connected".into()),
			..Default::default()
		};
		let fields = info.fields();
		assert_eq!(fields[0], ("Connection Status", "Connected"));
		assert_eq!(fields[2], ("Network Operator", "N/A"));
		assert!(info.is_populated());
		assert!(!ConnectionInfo::default().is_populated());
	}

	#[test]
	fn snapshot_json_shape() {
		let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
		let snapshot = SignalSnapshot::new(ts, ConnectionInfo::default(), Vec::new());
		let value = serde_json::to_value(&snapshot).unwrap();
		assert_eq!(value["timestamp"], "2025-06-01T12:30:00Z");
		assert_eq!(value["bands"], json!([]));
		assert!(value["connectionInfo"]["status"].is_null());
	}

	#[test]
	fn empty_band_detection() {
		let mut band = BandReading::new("PCC");
		assert!(band.is_empty());
		band.set(MetricKind::Rsrq, Some(-9.0));
		assert!(!band.is_empty());
		assert_eq!(band.get(MetricKind::Rsrq), Some(-9.0));
	}
}
