//! Command/response framing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent to the browser.
///
/// `session_id` routes the command to an attached target when the connection
/// uses flattened sessions; browser-level commands leave it empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
	pub id: u64,
	pub method: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub params: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

impl Request {
	pub fn new(id: u64, method: impl Into<String>, params: Option<Value>, session_id: Option<&str>) -> Self {
		Self {
			id,
			method: method.into(),
			params,
			session_id: session_id.map(str::to_string),
		}
	}
}

/// Error object carried by a failed command reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtocolError {
	pub code: i64,
	pub message: String,
	#[serde(default)]
	pub data: Option<String>,
}

/// Any frame received from the browser.
///
/// Replies carry the `id` of the originating [`Request`]; events carry a
/// `method` and no `id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Incoming {
	Response {
		id: u64,
		#[serde(default)]
		result: Option<Value>,
		#[serde(default)]
		error: Option<ProtocolError>,
		#[serde(default, rename = "sessionId")]
		session_id: Option<String>,
	},
	Event {
		method: String,
		#[serde(default)]
		params: Option<Value>,
		#[serde(default, rename = "sessionId")]
		session_id: Option<String>,
	},
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn request_omits_empty_fields() {
		let req = Request::new(7, "Browser.getVersion", None, None);
		let value = serde_json::to_value(&req).unwrap();
		assert_eq!(value, json!({ "id": 7, "method": "Browser.getVersion" }));
	}

	#[test]
	fn request_routes_to_session() {
		let req = Request::new(3, "Runtime.evaluate", Some(json!({ "expression": "1" })), Some("S1"));
		let value = serde_json::to_value(&req).unwrap();
		assert_eq!(value["sessionId"], "S1");
		assert_eq!(value["params"]["expression"], "1");
	}

	#[test]
	fn incoming_distinguishes_replies_from_events() {
		let reply: Incoming = serde_json::from_str(r#"{"id":4,"result":{"frameId":"F"}}"#).unwrap();
		assert!(matches!(reply, Incoming::Response { id: 4, error: None, .. }));

		let failed: Incoming = serde_json::from_str(r#"{"id":5,"error":{"code":-32000,"message":"Cannot navigate"}}"#).unwrap();
		match failed {
			Incoming::Response { error: Some(err), .. } => assert_eq!(err.code, -32000),
			other => panic!("unexpected frame: {other:?}"),
		}

		let event: Incoming = serde_json::from_str(r#"{"method":"Page.loadEventFired","params":{"timestamp":1.5},"sessionId":"S1"}"#).unwrap();
		match event {
			Incoming::Event { method, session_id, .. } => {
				assert_eq!(method, "Page.loadEventFired");
				assert_eq!(session_id.as_deref(), Some("S1"));
			}
			other => panic!("unexpected frame: {other:?}"),
		}
	}
}
