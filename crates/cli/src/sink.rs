//! The shell side of the monitor: renders, stores and announces readings.

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;
use sigwatch::{MonitorEvent, SnapshotSink, overall_tier};
use tracing::{info, warn};

use crate::audio::AudioCue;
use crate::display::{render_compact, render_full};
use crate::store::SnapshotStore;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
	/// Full report, printed once.
	Full,
	/// Screen redrawn every cycle.
	Compact { interval: Duration, clear: bool },
}

pub struct TerminalSink<W: Write + Send = io::Stdout> {
	out: W,
	layout: Layout,
	store: SnapshotStore,
	audio: Option<AudioCue>,
}

impl TerminalSink {
	pub fn stdout(layout: Layout, store: SnapshotStore, audio: Option<AudioCue>) -> Self {
		Self::new(io::stdout(), layout, store, audio)
	}
}

impl<W: Write + Send> TerminalSink<W> {
	pub fn new(out: W, layout: Layout, store: SnapshotStore, audio: Option<AudioCue>) -> Self {
		Self {
			out,
			layout,
			store,
			audio,
		}
	}

	pub fn into_inner(self) -> W {
		self.out
	}

	fn write(&mut self, text: &str) {
		if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
			warn!(target = "sigwatch.cli", error = %err, "terminal write failed");
		}
	}
}

impl<W: Write + Send> SnapshotSink for TerminalSink<W> {
	fn handle(&mut self, event: MonitorEvent<'_>) {
		match event {
			MonitorEvent::Authenticated { base_url } => {
				info!(target = "sigwatch.cli", url = %base_url, "logged in");
				self.write(&format!("{}\n", format!("Logged in to {base_url}").green()));
			}
			MonitorEvent::SessionExpired { attempt } => {
				self.write(&format!("{}\n", format!("Session expired, logging in again (attempt {attempt})").yellow()));
			}
			MonitorEvent::Snapshot(extraction) => {
				let text = match self.layout {
					Layout::Full => render_full(extraction),
					Layout::Compact { interval, clear } => {
						let mut text = String::new();
						if clear {
							text.push_str(CLEAR_SCREEN);
						}
						text.push_str(&render_compact(extraction));
						text.push_str(&format!(
							"\n{}\n",
							format!("Next update in {}s | Press Ctrl+C to stop", interval.as_secs()).cyan()
						));
						text
					}
				};
				self.write(&text);

				if let Err(err) = self.store.save(&extraction.snapshot) {
					warn!(target = "sigwatch.cli", error = %err, "could not save reading");
					self.write(&format!("{}\n", format!("Could not save reading: {err}").red()));
				}
				if let (Some(audio), Some(tier)) = (&self.audio, overall_tier(&extraction.snapshot)) {
					audio.play(tier);
				}
			}
			MonitorEvent::CycleFailed { error, retry_in } => {
				self.write(&format!(
					"{}\n{}\n",
					format!("Error: {error}").red(),
					format!("Retrying in {} seconds...", retry_in.as_secs()).cyan()
				));
			}
		}
	}
}
