//! Persistence of readings: the latest snapshot as pretty JSON, plus an
//! optional append-only history with one compact JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use sigwatch::SignalSnapshot;
use tracing::debug;

use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
	latest: PathBuf,
	history: Option<PathBuf>,
}

fn store_err(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
	move |source| CliError::Store {
		path: path.to_path_buf(),
		source,
	}
}

fn ensure_parent(path: &Path) -> Result<()> {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).map_err(store_err(parent)),
		_ => Ok(()),
	}
}

impl SnapshotStore {
	pub fn new(latest: impl Into<PathBuf>, history: Option<PathBuf>) -> Self {
		Self {
			latest: latest.into(),
			history,
		}
	}

	pub fn latest_path(&self) -> &Path {
		&self.latest
	}

	/// Overwrites the latest file and appends to the history, if any.
	pub fn save(&self, snapshot: &SignalSnapshot) -> Result<()> {
		ensure_parent(&self.latest)?;
		fs::write(&self.latest, serde_json::to_string_pretty(snapshot)?).map_err(store_err(&self.latest))?;
		debug!(target = "sigwatch.store", path = %self.latest.display(), "latest reading written");

		if let Some(history) = &self.history {
			ensure_parent(history)?;
			let mut line = serde_json::to_string(snapshot)?;
			line.push('\n');
			OpenOptions::new()
				.create(true)
				.append(true)
				.open(history)
				.and_then(|mut file| file.write_all(line.as_bytes()))
				.map_err(store_err(history))?;
		}
		Ok(())
	}

	/// Reads the latest file back.
	pub fn load_latest(&self) -> Result<SignalSnapshot> {
		let content = fs::read_to_string(&self.latest)?;
		Ok(serde_json::from_str(&content)?)
	}
}
