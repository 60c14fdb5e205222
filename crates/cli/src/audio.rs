//! Audio cue for the overall tier of a reading.
//!
//! Sounds are played through whatever the platform ships with; a missing
//! player or sound file only logs a warning.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use sigwatch::QualityTier;
use tokio::process::Command;
use tracing::{debug, warn};

/// Which of the three sound files a tier maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
	Positive,
	Neutral,
	Negative,
}

impl Cue {
	pub fn for_tier(tier: QualityTier) -> Self {
		match tier {
			QualityTier::Excellent => Cue::Positive,
			QualityTier::Good | QualityTier::Fair => Cue::Neutral,
			QualityTier::Poor => Cue::Negative,
		}
	}

	pub fn file_name(self) -> &'static str {
		match self {
			Cue::Positive => "excellent_signal.wav",
			Cue::Neutral => "good_signal.wav",
			Cue::Negative => "bad_signal.wav",
		}
	}
}

/// Candidate player invocations for this platform, tried in order.
fn players(file: &Path) -> Vec<(&'static str, Vec<String>)> {
	let path = file.display().to_string();
	if cfg!(target_os = "macos") {
		vec![("afplay", vec![path])]
	} else if cfg!(windows) {
		let script = format!("(New-Object Media.SoundPlayer '{}').PlaySync()", path.replace('\'', "''"));
		vec![("powershell", vec!["-NoProfile".into(), "-Command".into(), script])]
	} else {
		vec![("paplay", vec![path.clone()]), ("aplay", vec!["-q".into(), path])]
	}
}

#[derive(Debug, Clone)]
pub struct AudioCue {
	sound_dir: PathBuf,
}

impl AudioCue {
	pub fn new(sound_dir: impl Into<PathBuf>) -> Self {
		Self {
			sound_dir: sound_dir.into(),
		}
	}

	pub fn path_for(&self, cue: Cue) -> PathBuf {
		self.sound_dir.join(cue.file_name())
	}

	/// Starts playback in the background and returns immediately.
	pub fn play(&self, tier: QualityTier) {
		let cue = Cue::for_tier(tier);
		let file = self.path_for(cue);
		if !file.is_file() {
			warn!(target = "sigwatch.audio", path = %file.display(), "sound file not found");
			return;
		}

		for (program, args) in players(&file) {
			let spawned = Command::new(program)
				.args(&args)
				.stdin(Stdio::null())
				.stdout(Stdio::null())
				.stderr(Stdio::null())
				.kill_on_drop(false)
				.spawn();
			match spawned {
				Ok(mut child) => {
					debug!(target = "sigwatch.audio", program, ?cue, "playing");
					tokio::spawn(async move {
						let _ = child.wait().await;
					});
					return;
				}
				Err(err) => debug!(target = "sigwatch.audio", program, error = %err, "player unavailable"),
			}
		}
		warn!(target = "sigwatch.audio", "no audio player available");
	}
}
