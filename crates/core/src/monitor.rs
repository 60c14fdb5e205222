//! The authenticate, fetch, report cycle.
//!
//! [`Monitor`] owns the retry policy so it can be driven in tests without a
//! browser; the shell only supplies a [`SnapshotSink`] and a stop signal.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::browser::BrowserLauncher;
use crate::error::{FetchError, MonitorError};
use crate::extract::{Extraction, MetricExtractor};
use crate::model::Credentials;
use crate::poll::deadline_after;
use crate::session::SessionManager;

/// Consecutive re-authentications allowed before giving up.
pub const DEFAULT_MAX_REAUTH: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
	/// One cycle; any failure is returned.
	Once,
	/// Cycles started `interval` apart until stopped.
	Continuous { interval: Duration },
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
	pub mode: RunMode,
	/// Re-authentications within one cycle before [`MonitorError::ReauthExhausted`].
	pub max_reauth: u32,
	/// Delay after a failed cycle in continuous mode. Defaults to the interval.
	pub error_backoff: Option<Duration>,
}

impl Default for MonitorConfig {
	fn default() -> Self {
		Self {
			mode: RunMode::Once,
			max_reauth: DEFAULT_MAX_REAUTH,
			error_backoff: None,
		}
	}
}

/// Progress reported to the shell.
#[derive(Debug)]
pub enum MonitorEvent<'a> {
	Authenticated { base_url: &'a Url },
	/// The router logged us out; `attempt` counts re-authentications in this cycle.
	SessionExpired { attempt: u32 },
	Snapshot(&'a Extraction),
	/// A continuous-mode cycle failed and will be retried.
	CycleFailed { error: &'a MonitorError, retry_in: Duration },
}

/// Receives [`MonitorEvent`]s. Display, persistence and audio live behind it.
pub trait SnapshotSink: Send {
	fn handle(&mut self, event: MonitorEvent<'_>);
}

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
	pub cycles: u32,
	pub snapshots: u32,
	pub errors: u32,
	pub reauthentications: u32,
}

pub struct Monitor<L: BrowserLauncher> {
	sessions: SessionManager<L>,
	extractor: MetricExtractor,
	credentials: Credentials,
	config: MonitorConfig,
}

impl<L: BrowserLauncher> Monitor<L> {
	pub fn new(sessions: SessionManager<L>, extractor: MetricExtractor, credentials: Credentials, config: MonitorConfig) -> Self {
		Self {
			sessions,
			extractor,
			credentials,
			config,
		}
	}

	/// Runs until the mode completes, a fatal error occurs or `stop` turns
	/// true. The browser is released on every exit path.
	pub async fn run(&mut self, sink: &mut dyn SnapshotSink, stop: &mut watch::Receiver<bool>) -> Result<RunSummary, MonitorError> {
		let result = self.run_cycles(sink, stop).await;
		if let Err(err) = self.sessions.close().await {
			warn!(target = "sigwatch.monitor", error = %err, "browser shutdown failed");
		}
		result
	}

	async fn run_cycles(&mut self, sink: &mut dyn SnapshotSink, stop: &mut watch::Receiver<bool>) -> Result<RunSummary, MonitorError> {
		let mut summary = RunSummary::default();

		loop {
			if *stop.borrow() {
				info!(target = "sigwatch.monitor", "stop requested");
				break;
			}

			let started = Instant::now();
			summary.cycles += 1;
			debug!(target = "sigwatch.monitor", cycle = summary.cycles, "cycle started");

			let next = match self.cycle(sink, &mut summary).await {
				Ok(()) => match self.config.mode {
					RunMode::Once => break,
					RunMode::Continuous { interval } => deadline_after(started, interval),
				},
				Err(err) => {
					summary.errors += 1;
					let RunMode::Continuous { interval } = self.config.mode else {
						return Err(err);
					};
					if matches!(err, MonitorError::ReauthExhausted { .. }) {
						return Err(err);
					}
					let retry_in = self.config.error_backoff.unwrap_or(interval);
					error!(target = "sigwatch.monitor", error = %err, retry_in_ms = retry_in.as_millis() as u64, "cycle failed");
					sink.handle(MonitorEvent::CycleFailed { error: &err, retry_in });
					deadline_after(Instant::now(), retry_in)
				}
			};

			if !pause(next, stop).await {
				info!(target = "sigwatch.monitor", "stop requested");
				break;
			}
		}

		Ok(summary)
	}

	/// Authenticates when needed and fetches one snapshot, re-authenticating
	/// after at most `max_reauth` session expiries.
	async fn cycle(&mut self, sink: &mut dyn SnapshotSink, summary: &mut RunSummary) -> Result<(), MonitorError> {
		let mut expiries = 0;

		loop {
			if !self.sessions.is_authenticated() {
				self.sessions.authenticate(&self.credentials).await?;
				if expiries > 0 {
					summary.reauthentications += 1;
				}
				if let Some(base_url) = self.sessions.base_url() {
					sink.handle(MonitorEvent::Authenticated { base_url });
				}
			}

			let fetched = match self.sessions.session() {
				Some(mut session) => self.extractor.fetch(&mut session).await,
				None => continue,
			};

			match fetched {
				Ok(extraction) => {
					summary.snapshots += 1;
					sink.handle(MonitorEvent::Snapshot(&extraction));
					return Ok(());
				}
				Err(FetchError::SessionExpired) => {
					expiries += 1;
					self.sessions.invalidate();
					warn!(target = "sigwatch.monitor", attempt = expiries, "session expired");
					sink.handle(MonitorEvent::SessionExpired { attempt: expiries });
					if expiries > self.config.max_reauth {
						return Err(MonitorError::ReauthExhausted {
							attempts: self.config.max_reauth,
						});
					}
				}
				Err(FetchError::Browser(err)) if err.is_disconnect() => {
					self.sessions.reset().await;
					return Err(FetchError::Browser(err).into());
				}
				Err(err) => return Err(err.into()),
			}
		}
	}
}

/// Sleeps until `deadline`. Returns false when `stop` turns true first.
async fn pause(deadline: Instant, stop: &mut watch::Receiver<bool>) -> bool {
	tokio::select! {
		() = tokio::time::sleep_until(deadline) => return true,
		stopped = stop.wait_for(|stopped| *stopped) => {
			if stopped.is_ok() {
				return false;
			}
		}
	}
	// The sender is gone, so nothing can stop us any more.
	tokio::time::sleep_until(deadline).await;
	true
}
