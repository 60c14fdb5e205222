//! [`Page`] handle for one attached browser tab.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use sigwatch_protocol::{EvaluateParams, EvaluateResult, NavigateParams, NavigateResult};
use tracing::debug;

use crate::connection::Connection;
use crate::error::{Error, Result};

const READY_POLL: Duration = Duration::from_millis(100);

/// `performance.timeOrigin` is fixed per document, so a new value means the
/// navigation committed.
const DOCUMENT_STATE: &str = "[performance.timeOrigin, document.readyState]";

#[derive(Debug, Clone, Copy, PartialEq)]
struct DocumentState {
	origin: f64,
	ready: bool,
}

impl DocumentState {
	fn from_value(value: &Value) -> Option<Self> {
		let [origin, state] = value.as_array()?.as_slice() else {
			return None;
		};
		Some(Self {
			origin: origin.as_f64()?,
			ready: matches!(state.as_str(), Some("interactive" | "complete")),
		})
	}

	/// True once a document other than `previous` is interactive.
	fn replaced(&self, previous: Option<f64>) -> bool {
		self.ready && previous.is_none_or(|origin| origin != self.origin)
	}
}

/// A browser tab attached through a flattened DevTools session.
pub struct Page {
	connection: Arc<Connection>,
	target_id: String,
	session_id: String,
	load_timeout: Duration,
}

impl Page {
	pub(crate) fn new(connection: Arc<Connection>, target_id: String, session_id: String, load_timeout: Duration) -> Self {
		Self {
			connection,
			target_id,
			session_id,
			load_timeout,
		}
	}

	/// Target id of this tab.
	pub fn target_id(&self) -> &str {
		&self.target_id
	}

	async fn call(&self, method: &str, params: Option<Value>) -> Result<Value> {
		self.connection.send(method, params, Some(&self.session_id)).await
	}

	/// Navigates to `url` and waits for the document to become interactive.
	///
	/// Network-level failures (DNS, refused connection) surface as
	/// [`Error::Navigation`].
	pub async fn goto(&self, url: &str) -> Result<()> {
		let previous = self.document_origin().await;
		let params = serde_json::to_value(NavigateParams { url: url.to_string() })?;
		let result: NavigateResult = serde_json::from_value(self.call("Page.navigate", Some(params)).await?)?;

		if let Some(reason) = result.error_text.filter(|t| !t.is_empty()) {
			return Err(Error::Navigation {
				url: url.to_string(),
				reason,
			});
		}

		// Fragment-only navigations keep the document and carry no loader.
		let previous = previous.filter(|_| result.loader_id.is_some());
		self.wait_for_document(previous).await?;
		debug!(target = "sigwatch.page", %url, frame = %result.frame_id, "navigated");
		Ok(())
	}

	/// Reloads the current document and waits for its replacement.
	pub async fn reload(&self) -> Result<()> {
		let previous = self.document_origin().await;
		self.call("Page.reload", Some(json!({ "ignoreCache": true }))).await?;
		self.wait_for_document(previous).await
	}

	async fn document_state(&self) -> Option<DocumentState> {
		// Evaluation can fail transiently while the old document is torn down.
		let value = self.evaluate_value(DOCUMENT_STATE).await.ok()?;
		DocumentState::from_value(&value)
	}

	async fn document_origin(&self) -> Option<f64> {
		self.document_state().await.map(|state| state.origin)
	}

	/// Polls until a document other than `previous` is interactive.
	async fn wait_for_document(&self, previous: Option<f64>) -> Result<()> {
		let deadline = tokio::time::Instant::now() + self.load_timeout;
		loop {
			if self.document_state().await.is_some_and(|state| state.replaced(previous)) {
				return Ok(());
			}
			if tokio::time::Instant::now() >= deadline {
				return Err(Error::Timeout {
					what: "document ready".to_string(),
					ms: self.load_timeout.as_millis() as u64,
				});
			}
			tokio::time::sleep(READY_POLL).await;
		}
	}

	/// Evaluates `expression` and returns its JSON value.
	pub async fn evaluate_value(&self, expression: &str) -> Result<Value> {
		let params = serde_json::to_value(EvaluateParams::by_value(expression))?;
		let result: EvaluateResult = serde_json::from_value(self.call("Runtime.evaluate", Some(params)).await?)?;

		if let Some(details) = result.exception_details {
			return Err(Error::Evaluation(details.message()));
		}
		Ok(result.result.value.unwrap_or(Value::Null))
	}

	/// Current document URL.
	pub async fn url(&self) -> Result<String> {
		match self.evaluate_value("window.location.href").await? {
			Value::String(url) => Ok(url),
			other => Err(Error::Evaluation(format!("unexpected location value: {other}"))),
		}
	}

	/// Closes the tab.
	pub async fn close(&self) -> Result<()> {
		self.connection
			.send("Target.closeTarget", Some(json!({ "targetId": self.target_id })), None)
			.await?;
		Ok(())
	}
}
