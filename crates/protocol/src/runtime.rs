//! `Runtime.evaluate` payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
	pub expression: String,
	pub return_by_value: bool,
	pub await_promise: bool,
}

impl EvaluateParams {
	/// Evaluates `expression` and returns its JSON value.
	pub fn by_value(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			return_by_value: true,
			await_promise: true,
		}
	}
}

/// Mirror object for a value returned by the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub subtype: Option<String>,
	#[serde(default)]
	pub value: Option<Value>,
	#[serde(default)]
	pub description: Option<String>,
}

/// Details about an exception thrown by an evaluated expression.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	pub text: String,
	#[serde(default)]
	pub line_number: i64,
	#[serde(default)]
	pub column_number: i64,
	#[serde(default)]
	pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
	/// Best human-readable description of the thrown value.
	pub fn message(&self) -> String {
		self.exception
			.as_ref()
			.and_then(|e| e.description.clone())
			.unwrap_or_else(|| self.text.clone())
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
	pub result: RemoteObject,
	#[serde(default)]
	pub exception_details: Option<ExceptionDetails>,
}
