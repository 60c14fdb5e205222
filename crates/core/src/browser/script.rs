//! Page scripts run through `Runtime.evaluate`.
//!
//! Each script is an arrow function applied to a JSON config, so selectors
//! and ids never need string escaping. The login script embeds the password;
//! expressions built here must never be logged.

use serde::Serialize;
use serde_json::json;

use crate::model::Credentials;
use crate::profile::RouterProfile;

const LOGIN_VIEW: &str = r#"(cfg) => {
	const visible = (el) => !!el && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
	let errorText = null;
	for (const sel of cfg.errors) {
		const el = document.querySelector(sel);
		if (!visible(el)) continue;
		const text = (el.innerText || el.textContent || "").trim();
		if (text) { errorText = text; break; }
	}
	return {
		url: window.location.href,
		loginForm: visible(document.querySelector(cfg.username)),
		errorText,
		authenticatedMarker: cfg.authenticated.some((sel) => !!document.querySelector(sel)),
	};
}"#;

const SUBMIT: &str = r#"(cfg) => {
	const fill = (sel, value) => {
		const el = document.querySelector(sel);
		if (!el) throw new Error("login field not found: " + sel);
		el.focus();
		const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, "value").set;
		setter.call(el, value);
		el.dispatchEvent(new Event("input", { bubbles: true }));
		el.dispatchEvent(new Event("change", { bubbles: true }));
	};
	fill(cfg.username, cfg.user);
	fill(cfg.password, cfg.pass);
	const button = document.querySelector(cfg.submit);
	if (!button) throw new Error("login button not found: " + cfg.submit);
	button.click();
	return true;
}"#;

const CAPTURE: &str = r#"(cfg) => {
	const text = (id) => {
		const el = document.getElementById(id);
		return el ? (el.innerText || el.textContent || "").trim() : null;
	};
	const visible = (el) => !!el && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
	const markers = cfg.markers.map(text);
	const marker = markers.some((t) => t) ? "ready" : markers.some((t) => t !== null) ? "empty" : "missing";
	const connection = {};
	for (const [key, id] of Object.entries(cfg.connection)) connection[key] = text(id);
	const bands = [];
	for (let i = 0; i < cfg.maxBands; i++) {
		const suffix = i === 0 ? "" : String(i);
		const block = { index: i };
		let present = false;
		for (const [key, id] of Object.entries(cfg.bands)) {
			block[key] = text(id + suffix);
			if (block[key] !== null) present = true;
		}
		if (present) bands.push(block);
	}
	return {
		url: window.location.href,
		loginForm: visible(document.querySelector(cfg.loginForm)),
		marker,
		connection,
		bands,
	};
}"#;

fn apply(function: &str, config: &impl Serialize) -> serde_json::Result<String> {
	Ok(format!("({function})({})", serde_json::to_string(config)?))
}

pub(crate) fn login_view(profile: &RouterProfile) -> serde_json::Result<String> {
	apply(
		LOGIN_VIEW,
		&json!({
			"username": profile.username_selector,
			"errors": profile.error_selectors,
			"authenticated": profile.authenticated_selectors,
		}),
	)
}

pub(crate) fn submit(profile: &RouterProfile, credentials: &Credentials) -> serde_json::Result<String> {
	apply(
		SUBMIT,
		&json!({
			"username": profile.username_selector,
			"password": profile.password_selector,
			"submit": profile.submit_selector,
			"user": credentials.username(),
			"pass": credentials.password(),
		}),
	)
}

pub(crate) fn capture(profile: &RouterProfile) -> serde_json::Result<String> {
	apply(
		CAPTURE,
		&json!({
			"markers": profile.marker_ids,
			"connection": profile.connection_ids,
			"bands": profile.band_ids,
			"maxBands": profile.max_bands,
			"loginForm": profile.username_selector,
		}),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn config_is_passed_as_json_argument() {
		let expr = capture(&RouterProfile::default()).unwrap();
		assert!(expr.starts_with("((cfg) =>"));
		assert!(expr.contains(r#""markers":["connStatus","sigStr"]"#));
		assert!(expr.contains(r#""ratMode":"rat""#));
		assert!(expr.contains(r#""maxBands":8"#));
	}

	#[test]
	fn credentials_are_json_escaped() {
		let creds = Credentials::new("admin", r#"pa"ss\word"#);
		let expr = submit(&RouterProfile::default(), &creds).unwrap();
		assert!(expr.contains(r#""pass":"pa\"ss\\word""#));
	}
}
