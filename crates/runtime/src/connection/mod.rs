//! DevTools WebSocket connection.
//!
//! A [`Connection`] multiplexes commands over one socket: each command gets a
//! fresh id, a oneshot callback is parked under that id, and the reader task
//! resolves it when the matching reply arrives. Events are only traced; the
//! page logic in this crate polls page state instead of subscribing.


use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use sigwatch_protocol::{Incoming, ProtocolError, Request};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

type Callback = oneshot::Sender<std::result::Result<Value, ProtocolError>>;

/// Default time to wait for a single command reply.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Connection {
	last_id: AtomicU64,
	callbacks: Mutex<HashMap<u64, Callback>>,
	outbound: mpsc::UnboundedSender<String>,
	command_timeout: Duration,
	tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Connection {
	pub(crate) fn new(outbound: mpsc::UnboundedSender<String>, command_timeout: Duration) -> Self {
		Self {
			last_id: AtomicU64::new(1),
			callbacks: Mutex::new(HashMap::new()),
			outbound,
			command_timeout,
			tasks: Mutex::new(Vec::new()),
		}
	}

	/// Opens the browser-level WebSocket at `ws_url` and starts the reader and
	/// writer tasks.
	pub async fn connect(ws_url: &str, command_timeout: Duration) -> Result<Arc<Self>> {
		let (stream, _) = tokio_tungstenite::connect_async(ws_url).await?;
		let (mut sink, mut source) = stream.split();
		let (tx, mut rx) = mpsc::unbounded_channel::<String>();

		let connection = Arc::new(Self::new(tx, command_timeout));

		let writer = tokio::spawn(async move {
			while let Some(frame) = rx.recv().await {
				if let Err(err) = sink.send(Message::Text(frame)).await {
					warn!(target = "sigwatch.cdp", error = %err, "write failed; closing writer");
					break;
				}
			}
			let _ = sink.close().await;
		});

		let weak: Weak<Self> = Arc::downgrade(&connection);
		let reader = tokio::spawn(async move {
			while let Some(frame) = source.next().await {
				let Some(connection) = weak.upgrade() else {
					break;
				};
				match frame {
					Ok(Message::Text(text)) => {
						trace!(target = "sigwatch.cdp", len = text.len(), "recv");
						match serde_json::from_str::<Incoming>(&text) {
							Ok(incoming) => connection.dispatch(incoming),
							Err(err) => warn!(target = "sigwatch.cdp", error = %err, "unparseable frame"),
						}
					}
					Ok(Message::Close(_)) => {
						debug!(target = "sigwatch.cdp", "socket closed by browser");
						break;
					}
					Ok(_) => {}
					Err(err) => {
						warn!(target = "sigwatch.cdp", error = %err, "socket error");
						break;
					}
				}
			}
			if let Some(connection) = weak.upgrade() {
				connection.fail_pending();
			}
		});

		connection.tasks.lock().extend([writer, reader]);
		debug!(target = "sigwatch.cdp", %ws_url, "connected");
		Ok(connection)
	}

	/// Sends a command and waits for its reply.
	///
	/// `session_id` routes the command to an attached page target.
	pub async fn send(&self, method: &str, params: Option<Value>, session_id: Option<&str>) -> Result<Value> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst);
		let request = Request::new(id, method, params, session_id);
		let frame = serde_json::to_string(&request)?;

		let (tx, rx) = oneshot::channel();
		self.callbacks.lock().insert(id, tx);

		trace!(target = "sigwatch.cdp", id, %method, "send");
		if self.outbound.send(frame).is_err() {
			self.callbacks.lock().remove(&id);
			return Err(Error::ConnectionClosed);
		}

		match tokio::time::timeout(self.command_timeout, rx).await {
			Ok(Ok(Ok(value))) => Ok(value),
			Ok(Ok(Err(err))) => Err(Error::Protocol {
				method: method.to_string(),
				code: err.code,
				message: err.message,
			}),
			Ok(Err(_)) => Err(Error::ConnectionClosed),
			Err(_) => {
				self.callbacks.lock().remove(&id);
				Err(Error::Timeout {
					what: method.to_string(),
					ms: self.command_timeout.as_millis() as u64,
				})
			}
		}
	}

	/// Routes one incoming frame to its waiting caller.
	pub(crate) fn dispatch(&self, incoming: Incoming) {
		match incoming {
			Incoming::Response { id, result, error, .. } => {
				let Some(callback) = self.callbacks.lock().remove(&id) else {
					debug!(target = "sigwatch.cdp", id, "reply for unknown command");
					return;
				};
				let outcome = match error {
					Some(err) => Err(err),
					None => Ok(result.unwrap_or(Value::Null)),
				};
				let _ = callback.send(outcome);
			}
			Incoming::Event { method, session_id, .. } => {
				trace!(target = "sigwatch.cdp", %method, session = ?session_id, "event");
			}
		}
	}

	/// Drops every parked callback so in-flight callers observe
	/// [`Error::ConnectionClosed`].
	fn fail_pending(&self) {
		let drained: Vec<_> = self.callbacks.lock().drain().collect();
		if !drained.is_empty() {
			debug!(target = "sigwatch.cdp", count = drained.len(), "failing in-flight commands");
		}
	}

	/// Returns true once the writer side has shut down.
	pub fn is_closed(&self) -> bool {
		self.outbound.is_closed()
	}
}

impl Drop for Connection {
	fn drop(&mut self) {
		for task in self.tasks.lock().drain(..) {
			task.abort();
		}
	}
}
