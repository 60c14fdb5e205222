//! Wire types for the subset of the Chrome DevTools Protocol used by sigwatch.
//!
//! Every frame on the CDP WebSocket is a JSON object. Commands flow from the
//! client as [`Request`]; the browser answers with a matching
//! [`Incoming::Response`] or pushes an [`Incoming::Event`].
//!
//! # Main Types
//!
//! - [`Request`] / [`Incoming`] - command and reply framing
//! - [`VersionInfo`] - `/json/version` discovery payload
//! - [`EvaluateParams`] / [`EvaluateResult`] - `Runtime.evaluate`
//! - [`NavigateResult`] - `Page.navigate`

mod message;
mod page;
mod runtime;
mod target;

pub use message::{Incoming, ProtocolError, Request};
pub use page::{NavigateParams, NavigateResult};
pub use runtime::{EvaluateParams, EvaluateResult, ExceptionDetails, RemoteObject};
pub use target::{AttachToTargetResult, CreateTargetResult, VersionInfo};
