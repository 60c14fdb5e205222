//! Terminal rendering of a reading.
//!
//! Metric values are colored by tier: excellent green, good and fair yellow,
//! poor red. Fields the router did not report show a red `N/A`.

use std::fmt::Write;

use chrono::Local;
use colored::{ColoredString, Colorize};
use sigwatch::{BandQuality, BandReading, ConnectionInfo, Extraction, MetricKind, QualityTier, SignalSnapshot, overall_tier};

const RULE: usize = 60;
const SUBRULE: usize = 30;

pub fn paint(text: &str, tier: QualityTier) -> ColoredString {
	match tier {
		QualityTier::Excellent => text.green(),
		QualityTier::Good | QualityTier::Fair => text.yellow(),
		QualityTier::Poor => text.red(),
	}
}

fn missing() -> ColoredString {
	ConnectionInfo::MISSING.red()
}

fn value_text(kind: MetricKind, value: f64) -> String {
	format!("{value} {}", kind.unit())
}

fn timestamp(snapshot: &SignalSnapshot) -> String {
	snapshot
		.timestamp()
		.with_timezone(&Local)
		.format("%Y-%m-%d %H:%M:%S")
		.to_string()
}

fn metric_line(out: &mut String, band: &BandReading, quality: &BandQuality, kind: MetricKind) {
	let name = format!("{} ({})", kind.label(), kind.description());
	match (band.get(kind), quality.get(kind)) {
		(Some(value), Some(tier)) => {
			let shown = format!("{:10}", value_text(kind, value));
			let _ = writeln!(out, "{name:45}: {} ({})", paint(&shown, tier), paint(tier.label(), tier));
		}
		_ => {
			let _ = writeln!(out, "{name:45}: {}", missing());
		}
	}
}

fn overall_line(out: &mut String, snapshot: &SignalSnapshot) {
	match overall_tier(snapshot) {
		Some(tier) => {
			let _ = writeln!(out, "{} {}", "Overall signal quality:".bold(), paint(tier.label(), tier).bold());
		}
		None => {
			let _ = writeln!(out, "{} {}", "Overall signal quality:".bold(), missing());
		}
	}
}

fn legend_line(out: &mut String) {
	let _ = writeln!(
		out,
		"{} {} | {} | {}",
		"Legend:".yellow(),
		"Excellent".green(),
		"Good/Fair".yellow(),
		"Poor".red()
	);
}

/// Full report used for single readings.
pub fn render_full(extraction: &Extraction) -> String {
	let snapshot = &extraction.snapshot;
	let mut out = String::new();
	let rule = "=".repeat(RULE);
	let subrule = "-".repeat(SUBRULE);

	let _ = writeln!(out, "{}", rule.cyan());
	let _ = writeln!(out, "{}", "5G ROUTER SIGNAL MONITOR".cyan().bold());
	let _ = writeln!(out, "{}", format!("Last Updated: {}", timestamp(snapshot)).cyan());
	let _ = writeln!(out, "{}", rule.cyan());

	let _ = writeln!(out, "\n{}", "CONNECTION INFORMATION".yellow());
	let _ = writeln!(out, "{}", subrule.yellow());
	let info = snapshot.connection_info();
	for (label, value) in info.fields() {
		let shown = if value == ConnectionInfo::MISSING { missing() } else { value.cyan() };
		let _ = writeln!(out, "{label:20}: {shown}");
	}

	if snapshot.bands().is_empty() {
		let _ = writeln!(out, "\n{}", "No active band reported".yellow());
	}
	for band in snapshot.bands() {
		let quality = BandQuality::of(band);
		let _ = writeln!(out, "\n{}", format!("{} SIGNAL DATA", band.band_label.to_uppercase()).yellow());
		let _ = writeln!(out, "{}", subrule.yellow());
		for kind in MetricKind::ALL {
			metric_line(&mut out, band, &quality, kind);
		}
	}

	if !extraction.warnings.is_empty() {
		let _ = writeln!(out, "\n{}", "PARSE WARNINGS".yellow());
		let _ = writeln!(out, "{}", subrule.yellow());
		for warning in &extraction.warnings {
			let _ = writeln!(out, "{warning}");
		}
	}

	out.push('\n');
	overall_line(&mut out, snapshot);
	out.push('\n');
	legend_line(&mut out);
	out
}

/// One screen per reading for continuous mode.
pub fn render_compact(extraction: &Extraction) -> String {
	let snapshot = &extraction.snapshot;
	let info = snapshot.connection_info();
	let show = |v: &Option<String>| v.as_deref().map_or_else(missing, |s| s.cyan());
	let mut out = String::new();

	let _ = writeln!(out, "{}", format!("5G SIGNAL MONITOR - {}", timestamp(snapshot)).cyan().bold());
	let _ = writeln!(out, "{}", "=".repeat(RULE).cyan());
	let _ = writeln!(
		out,
		"Status: {} | RAT: {} | Band: {}",
		show(&info.status),
		show(&info.rat_mode),
		show(&info.band)
	);

	for band in snapshot.bands() {
		let quality = BandQuality::of(band);
		let _ = write!(out, "\n{}", format!("{}:", band.band_label).yellow());
		for kind in MetricKind::ALL {
			match (band.get(kind), quality.get(kind)) {
				(Some(value), Some(tier)) => {
					let _ = write!(out, "  {} {}", kind.label(), paint(&value_text(kind, value), tier));
				}
				_ => {
					let _ = write!(out, "  {} {}", kind.label(), missing());
				}
			}
		}
		out.push('\n');
	}
	if !extraction.warnings.is_empty() {
		let _ = writeln!(out, "\n{} parse warning(s)", extraction.warnings.len().to_string().yellow());
	}

	out.push('\n');
	overall_line(&mut out, snapshot);
	legend_line(&mut out);
	out
}
