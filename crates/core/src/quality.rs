//! Quality classification of radio metrics.
//!
//! Each [`MetricKind`] has its own threshold table. A value exactly on a
//! threshold belongs to the better tier.
//!
//! | Metric | Excellent | Good | Fair | Poor |
//! |---|---|---|---|---|
//! | RSSI (dBm) | >= -50 | >= -70 | >= -85 | < -85 |
//! | RSRP (dBm) | >= -80 | >= -90 | >= -100 | < -100 |
//! | RSRQ (dB) | >= -10 | >= -15 | >= -20 | < -20 |
//! | SINR (dB) | >= 20 | >= 13 | >= 0 | < 0 |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{BandReading, MetricKind, SignalSnapshot};

/// Ordered quality tier: `Poor < Fair < Good < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
	Poor,
	Fair,
	Good,
	Excellent,
}

impl QualityTier {
	/// Numeric score used when averaging several metrics (Poor = 1 .. Excellent = 4).
	pub fn score(self) -> u8 {
		match self {
			QualityTier::Poor => 1,
			QualityTier::Fair => 2,
			QualityTier::Good => 3,
			QualityTier::Excellent => 4,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			QualityTier::Poor => "Poor",
			QualityTier::Fair => "Fair",
			QualityTier::Good => "Good",
			QualityTier::Excellent => "Excellent",
		}
	}
}

impl fmt::Display for QualityTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Lower bounds of the Excellent, Good and Fair tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
	excellent: f64,
	good: f64,
	fair: f64,
}

const fn thresholds(kind: MetricKind) -> Thresholds {
	match kind {
		MetricKind::Rssi => Thresholds {
			excellent: -50.0,
			good: -70.0,
			fair: -85.0,
		},
		MetricKind::Rsrp => Thresholds {
			excellent: -80.0,
			good: -90.0,
			fair: -100.0,
		},
		MetricKind::Rsrq => Thresholds {
			excellent: -10.0,
			good: -15.0,
			fair: -20.0,
		},
		MetricKind::Sinr => Thresholds {
			excellent: 20.0,
			good: 13.0,
			fair: 0.0,
		},
	}
}

/// Maps a reading to its tier. Total: NaN falls through to `Poor`.
pub fn classify(kind: MetricKind, value: f64) -> QualityTier {
	let t = thresholds(kind);
	if value >= t.excellent {
		QualityTier::Excellent
	} else if value >= t.good {
		QualityTier::Good
	} else if value >= t.fair {
		QualityTier::Fair
	} else {
		QualityTier::Poor
	}
}

/// Per-field tiers of one band; `None` where the metric is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandQuality {
	pub rssi: Option<QualityTier>,
	pub sinr: Option<QualityTier>,
	pub rsrp: Option<QualityTier>,
	pub rsrq: Option<QualityTier>,
}

impl BandQuality {
	pub fn of(band: &BandReading) -> Self {
		let tier = |kind| band.get(kind).map(|v| classify(kind, v));
		Self {
			rssi: tier(MetricKind::Rssi),
			sinr: tier(MetricKind::Sinr),
			rsrp: tier(MetricKind::Rsrp),
			rsrq: tier(MetricKind::Rsrq),
		}
	}

	pub fn get(&self, kind: MetricKind) -> Option<QualityTier> {
		match kind {
			MetricKind::Rssi => self.rssi,
			MetricKind::Sinr => self.sinr,
			MetricKind::Rsrp => self.rsrp,
			MetricKind::Rsrq => self.rsrq,
		}
	}
}

/// Overall tier of a snapshot.
///
/// Takes one value per metric, preferring the first band and filling gaps
/// from later bands, then averages the tier scores. Returns `None` when no
/// metric is present.
pub fn overall_tier(snapshot: &SignalSnapshot) -> Option<QualityTier> {
	let scores: Vec<u8> = MetricKind::ALL
		.iter()
		.filter_map(|kind| {
			snapshot
				.bands()
				.iter()
				.find_map(|band| band.get(*kind))
				.map(|value| classify(*kind, value).score())
		})
		.collect();

	if scores.is_empty() {
		return None;
	}

	let mean = scores.iter().map(|s| f64::from(*s)).sum::<f64>() / scores.len() as f64;
	Some(if mean >= 3.5 {
		QualityTier::Excellent
	} else if mean >= 2.5 {
		QualityTier::Good
	} else if mean >= 1.5 {
		QualityTier::Fair
	} else {
		QualityTier::Poor
	})
}

#[cfg(test)]
mod tests {
	use chrono::Utc;

	use super::*;
	use crate::model::ConnectionInfo;

	#[test]
	fn boundaries_belong_to_better_tier() {
		assert_eq!(classify(MetricKind::Rssi, -50.0), QualityTier::Excellent);
		assert_eq!(classify(MetricKind::Rssi, -50.01), QualityTier::Good);
		assert_eq!(classify(MetricKind::Sinr, 0.0), QualityTier::Fair);
		assert_eq!(classify(MetricKind::Sinr, -0.01), QualityTier::Poor);
	}

	#[test]
	fn every_threshold_edge() {
		let cases = [
			(MetricKind::Rssi, [-50.0, -70.0, -85.0]),
			(MetricKind::Rsrp, [-80.0, -90.0, -100.0]),
			(MetricKind::Rsrq, [-10.0, -15.0, -20.0]),
			(MetricKind::Sinr, [20.0, 13.0, 0.0]),
		];
		for (kind, [excellent, good, fair]) in cases {
			assert_eq!(classify(kind, excellent), QualityTier::Excellent, "{kind} {excellent}");
			assert_eq!(classify(kind, good), QualityTier::Good, "{kind} {good}");
			assert_eq!(classify(kind, fair), QualityTier::Fair, "{kind} {fair}");
			assert_eq!(classify(kind, fair - 0.001), QualityTier::Poor, "{kind} below {fair}");
		}
	}

	#[test]
	fn tables_are_independent_per_metric() {
		// -75 is Good RSSI but Excellent RSRP; 15 is Good SINR but Excellent RSRQ.
		assert_eq!(classify(MetricKind::Rssi, -75.0), QualityTier::Fair);
		assert_eq!(classify(MetricKind::Rsrp, -75.0), QualityTier::Excellent);
		assert_eq!(classify(MetricKind::Sinr, 15.0), QualityTier::Good);
		assert_eq!(classify(MetricKind::Rsrq, 15.0), QualityTier::Excellent);
	}

	#[test]
	fn classification_is_monotone_and_total() {
		for kind in MetricKind::ALL {
			let mut previous = QualityTier::Poor;
			// -200.00 .. 80.00 dB(m) in 0.01 steps.
			for step in -20_000..=8_000 {
				let value = f64::from(step) / 100.0;
				let tier = classify(kind, value);
				assert!(tier >= previous, "{kind}: {value} gave {tier} after {previous}");
				previous = tier;
			}
			assert_eq!(classify(kind, f64::NEG_INFINITY), QualityTier::Poor);
			assert_eq!(classify(kind, f64::INFINITY), QualityTier::Excellent);
		}
	}

	#[test]
	fn tiers_are_ordered() {
		assert!(QualityTier::Excellent > QualityTier::Good);
		assert!(QualityTier::Good > QualityTier::Fair);
		assert!(QualityTier::Fair > QualityTier::Poor);
	}

	fn snapshot(bands: Vec<BandReading>) -> SignalSnapshot {
		SignalSnapshot::new(Utc::now(), ConnectionInfo::default(), bands)
	}

	#[test]
	fn overall_prefers_primary_band_and_fills_gaps() {
		let pcc = BandReading {
			band_label: "PCC B7".into(),
			rssi: Some(-40.0),
			sinr: None,
			rsrp: Some(-69.0),
			rsrq: Some(-9.0),
		};
		let pscc = BandReading {
			band_label: "PSCC N78".into(),
			rssi: None,
			sinr: Some(22.0),
			rsrp: Some(-110.0),
			rsrq: None,
		};
		// RSRP comes from PCC (Excellent), SINR only from PSCC (Excellent).
		assert_eq!(overall_tier(&snapshot(vec![pcc, pscc])), Some(QualityTier::Excellent));
	}

	#[test]
	fn overall_averages_scores() {
		let band = BandReading {
			band_label: "PCC".into(),
			rssi: Some(-90.0),
			sinr: Some(-3.0),
			rsrp: Some(-95.0),
			rsrq: Some(-12.0),
		};
		// Poor, Poor, Fair, Good -> mean 1.75 -> Fair.
		assert_eq!(overall_tier(&snapshot(vec![band])), Some(QualityTier::Fair));
	}

	#[test]
	fn overall_is_none_without_metrics() {
		assert_eq!(overall_tier(&snapshot(Vec::new())), None);
		assert_eq!(overall_tier(&snapshot(vec![BandReading::new("PCC")])), None);
	}

	#[test]
	fn band_quality_tracks_absent_fields() {
		let band = BandReading {
			band_label: "PSCC N78".into(),
			rssi: None,
			sinr: Some(16.0),
			rsrp: Some(-80.0),
			rsrq: Some(-12.0),
		};
		let quality = BandQuality::of(&band);
		assert_eq!(quality.rssi, None);
		assert_eq!(quality.get(MetricKind::Sinr), Some(QualityTier::Good));
		assert_eq!(quality.get(MetricKind::Rsrp), Some(QualityTier::Excellent));
		assert_eq!(quality.get(MetricKind::Rsrq), Some(QualityTier::Good));
	}
}
