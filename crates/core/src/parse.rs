//! Text-to-number parsing for status page fields.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::MetricKind;

// Literal patterns; compilation cannot fail.
static NUMBER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^([+-]?\d+(?:[.,]\d+)?)\s*(?:dbm|db)?$").expect("metric pattern"));

static BAND_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b([bn]\d{1,3})\b").expect("band pattern"));

/// Outcome of parsing one metric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedField {
	Value(f64),
	/// Blank or an explicit placeholder such as `N/A` or `--`.
	NotReported,
	/// Text that is neither a number nor a known placeholder.
	Unparseable,
}

/// Parses `"<label>: <number><unit>"` or a bare `"<number><unit>"`.
///
/// Accepts ASCII and Unicode minus, a leading `+` and `,` as decimal
/// separator. Units `dBm`/`dB` are stripped case-insensitively.
pub fn parse_metric(raw: &str) -> ParsedField {
	let text = raw.trim();
	let text = match text.rsplit_once(':') {
		Some((_, value)) => value.trim(),
		None => text,
	};

	if is_placeholder(text) {
		return ParsedField::NotReported;
	}

	let normalized = text.replace(['\u{2212}', '\u{2013}'], "-");
	let Some(caps) = NUMBER.captures(&normalized) else {
		return ParsedField::Unparseable;
	};

	match caps[1].replace(',', ".").parse::<f64>() {
		Ok(v) if v.is_finite() => ParsedField::Value(v),
		_ => ParsedField::Unparseable,
	}
}

fn is_placeholder(text: &str) -> bool {
	text.is_empty() || text == "-" || text == "--" || text.eq_ignore_ascii_case("n/a") || text.eq_ignore_ascii_case("na")
}

/// Normalizes a connection field: blank and `N/A` become `None`.
pub fn text_field(raw: Option<&str>) -> Option<String> {
	let text = raw?.trim();
	if is_placeholder(text) { None } else { Some(text.to_string()) }
}

/// Role of a carrier block by its index on the page.
pub fn band_role(index: usize) -> String {
	match index {
		0 => "PCC".to_string(),
		1 => "PSCC".to_string(),
		n => format!("SCC{n}"),
	}
}

/// Band names listed in the operation band field, e.g. `"B7 + n78"` gives
/// `["B7", "N78"]`.
pub fn band_names(op_band: &str) -> Vec<String> {
	BAND_NAME
		.captures_iter(op_band)
		.map(|caps| caps[1].to_ascii_uppercase())
		.collect()
}

/// Display label for block `index`: the role, followed by the matching band
/// name when the operation band field lists one.
pub fn band_label(index: usize, op_band: Option<&str>) -> String {
	let role = band_role(index);
	match op_band.and_then(|b| band_names(b).into_iter().nth(index)) {
		Some(name) => format!("{role} {name}"),
		None => role,
	}
}

/// A metric cell that was present but could not be read as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
	pub band_label: String,
	pub kind: MetricKind,
	pub raw: String,
}

impl fmt::Display for ParseWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}: could not parse {:?}", self.band_label, self.kind, self.raw)
	}
}
