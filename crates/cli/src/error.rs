use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("invalid router URL {url}: {reason}")]
	InvalidUrl { url: String, reason: String },

	#[error("config file {path}: {reason}")]
	Config { path: PathBuf, reason: String },

	#[error("{0}")]
	Usage(String),

	#[error("no password given (set SIGWATCH_PASSWORD or run in a terminal)")]
	MissingPassword,

	#[error("failed to write {path}")]
	Store {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Monitor(#[from] sigwatch::MonitorError),

	#[error(transparent)]
	Auth(#[from] sigwatch::AuthError),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
