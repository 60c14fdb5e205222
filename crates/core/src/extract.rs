//! Reading signal metrics from the status page.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::browser::RouterBrowser;
use crate::capture::{MarkerState, PageCapture, RawBand};
use crate::error::{BrowserError, FetchError};
use crate::model::{BandReading, ConnectionInfo, MetricKind, SignalSnapshot};
use crate::parse::{ParseWarning, ParsedField, band_label, parse_metric, text_field};
use crate::poll::PollPolicy;
use crate::session::Session;

/// Result of one fetch: the snapshot plus fields that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
	pub snapshot: SignalSnapshot,
	pub warnings: Vec<ParseWarning>,
}

fn raw_metric(band: &RawBand, kind: MetricKind) -> Option<&str> {
	match kind {
		MetricKind::Rssi => band.rssi.as_deref(),
		MetricKind::Sinr => band.sinr.as_deref(),
		MetricKind::Rsrp => band.rsrp.as_deref(),
		MetricKind::Rsrq => band.rsrq.as_deref(),
	}
}

/// Returns true when any connection-info element carries a reported value.
fn has_connection_info(capture: &PageCapture) -> bool {
	let raw = &capture.connection;
	[&raw.status, &raw.rat_mode, &raw.operator, &raw.imsi, &raw.band]
		.iter()
		.any(|field| text_field(field.as_deref()).is_some())
}

/// Turns a page capture into a snapshot. Never fails: unreadable fields are
/// left absent and reported as warnings.
pub fn parse_capture(capture: &PageCapture, timestamp: DateTime<Utc>) -> Extraction {
	let raw = &capture.connection;
	let connection_info = ConnectionInfo {
		status: text_field(raw.status.as_deref()),
		rat_mode: text_field(raw.rat_mode.as_deref()),
		operator: text_field(raw.operator.as_deref()),
		imsi: text_field(raw.imsi.as_deref()),
		band: text_field(raw.band.as_deref()),
	};

	let mut warnings = Vec::new();
	let bands = capture
		.bands
		.iter()
		.map(|block| {
			let mut reading = BandReading::new(band_label(block.index, connection_info.band.as_deref()));
			for kind in MetricKind::ALL {
				let Some(text) = raw_metric(block, kind) else {
					continue;
				};
				match parse_metric(text) {
					ParsedField::Value(v) => reading.set(kind, Some(v)),
					ParsedField::NotReported => {}
					ParsedField::Unparseable => warnings.push(ParseWarning {
						band_label: reading.band_label.clone(),
						kind,
						raw: text.to_string(),
					}),
				}
			}
			reading
		})
		.collect();

	Extraction {
		snapshot: SignalSnapshot::new(timestamp, connection_info, bands),
		warnings,
	}
}

/// Navigates to the status page and extracts a [`SignalSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct MetricExtractor {
	settle: PollPolicy,
}

impl MetricExtractor {
	/// `settle` bounds the wait for asynchronously rendered content.
	pub fn new(settle: PollPolicy) -> Self {
		Self { settle }
	}

	pub async fn fetch<B: RouterBrowser>(&self, session: &mut Session<'_, B>) -> Result<Extraction, FetchError> {
		let profile = session.profile();
		let status_url = session.page_url(&profile.status_path);
		let current = session.browser().current_url().await?;

		if profile.is_status_url(&current) {
			debug!(target = "sigwatch.extract", url = %status_url, "reloading status page");
			session.browser().reload().await?;
		} else {
			debug!(target = "sigwatch.extract", url = %status_url, "opening status page");
			session.browser().open(&status_url).await?;
		}

		let mut poller = self.settle.start();
		let capture = loop {
			let capture = session.browser().capture(profile).await.map_err(|err| match err {
				BrowserError::Script(reason) => FetchError::PageLayoutUnexpected(reason),
				other => FetchError::Browser(other),
			})?;

			if capture.shows_login(profile) {
				debug!(target = "sigwatch.extract", url = %capture.url, "redirected to login");
				return Err(FetchError::SessionExpired);
			}
			if capture.marker == MarkerState::Ready {
				break capture;
			}
			if !poller.wait().await {
				match capture.marker {
					MarkerState::Empty => {
						warn!(
							target = "sigwatch.extract",
							waited_ms = poller.elapsed_ms(),
							"status page still empty; using partial content"
						);
						break capture;
					}
					MarkerState::Missing if has_connection_info(&capture) => {
						warn!(
							target = "sigwatch.extract",
							url = %capture.url,
							waited_ms = poller.elapsed_ms(),
							"status marker missing; using connection info read without it"
						);
						break capture;
					}
					_ => {
						return Err(FetchError::PageLayoutUnexpected(format!(
							"none of {} found on {}",
							profile.marker_ids.join(", "),
							capture.url
						)));
					}
				}
			}
		};

		let extraction = parse_capture(&capture, Utc::now());
		for warning in &extraction.warnings {
			warn!(target = "sigwatch.extract", %warning, "field skipped");
		}
		debug!(
			target = "sigwatch.extract",
			bands = extraction.snapshot.bands().len(),
			warnings = extraction.warnings.len(),
			"status page parsed"
		);
		Ok(extraction)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::capture::RawConnection;

	fn block(index: usize, rssi: Option<&str>, sinr: &str, rsrp: &str, rsrq: &str) -> RawBand {
		RawBand {
			index,
			rssi: rssi.map(str::to_string),
			sinr: Some(sinr.to_string()),
			rsrp: Some(rsrp.to_string()),
			rsrq: Some(rsrq.to_string()),
		}
	}

	fn capture(bands: Vec<RawBand>) -> PageCapture {
		PageCapture {
			url: "http://192.168.1.1/html/set_net_info.html".into(),
			login_form: false,
			marker: MarkerState::Ready,
			connection: RawConnection {
				status: Some("Connected".into()),
				rat_mode: Some("5G NSA".into()),
				operator: Some("  ".into()),
				imsi: None,
				band: Some("B7 + n78".into()),
			},
			bands,
		}
	}

	#[test]
	fn zero_bands_still_yield_a_snapshot() {
		let extraction = parse_capture(&capture(Vec::new()), Utc::now());
		assert!(extraction.snapshot.bands().is_empty());
		assert!(extraction.warnings.is_empty());
		let info = extraction.snapshot.connection_info();
		assert_eq!(info.status.as_deref(), Some("Connected"));
		assert_eq!(info.operator, None);
		assert_eq!(info.imsi, None);
	}

	#[test]
	fn missing_rssi_leaves_other_fields_and_later_bands() {
		let extraction = parse_capture(
			&capture(vec![
				block(0, None, "22 dB", "-69 dBm", "-9 dB"),
				block(1, Some("-65 dBm"), "16", "-80", "-12"),
			]),
			Utc::now(),
		);
		let bands = extraction.snapshot.bands();
		assert_eq!(bands.len(), 2);
		assert_eq!(bands[0].band_label, "PCC B7");
		assert_eq!(bands[0].rssi, None);
		assert_eq!(bands[0].sinr, Some(22.0));
		assert_eq!(bands[0].rsrp, Some(-69.0));
		assert_eq!(bands[1].band_label, "PSCC N78");
		assert_eq!(bands[1].rssi, Some(-65.0));
		assert!(extraction.warnings.is_empty());
	}

	#[test]
	fn garbage_becomes_warning_not_error() {
		let extraction = parse_capture(
			&capture(vec![block(0, Some("N/A"), "weak", "-90 dBm", "--")]),
			Utc::now(),
		);
		let band = &extraction.snapshot.bands()[0];
		assert_eq!(band.rssi, None);
		assert_eq!(band.sinr, None);
		assert_eq!(band.rsrp, Some(-90.0));
		assert_eq!(band.rsrq, None);
		assert_eq!(
			extraction.warnings,
			vec![ParseWarning {
				band_label: "PCC B7".into(),
				kind: MetricKind::Sinr,
				raw: "weak".into(),
			}]
		);
	}

	#[test]
	fn connection_info_counts_only_reported_values() {
		let mut page = capture(Vec::new());
		assert!(has_connection_info(&page));
		page.connection = RawConnection {
			status: Some("N/A".into()),
			operator: Some("  ".into()),
			..Default::default()
		};
		assert!(!has_connection_info(&page));
	}

	#[test]
	fn labels_fall_back_to_roles() {
		let mut page = capture(vec![block(0, None, "1", "-95", "-11"), block(3, None, "2", "-96", "-12")]);
		page.connection.band = None;
		let extraction = parse_capture(&page, Utc::now());
		let labels: Vec<&str> = extraction.snapshot.bands().iter().map(|b| b.band_label.as_str()).collect();
		assert_eq!(labels, ["PCC", "SCC3"]);
	}
}
