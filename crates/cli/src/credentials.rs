//! Password acquisition. The password comes from `SIGWATCH_PASSWORD` or an
//! interactive prompt with echo disabled; it is never stored or logged.

use std::io::{self, BufRead, IsTerminal, Write};

use sigwatch::Credentials;

use crate::error::{CliError, Result};

pub const PASSWORD_ENV: &str = "SIGWATCH_PASSWORD";

/// Builds credentials from the resolved username and a password source.
pub fn acquire(username: &str) -> Result<Credentials> {
	let password = match std::env::var(PASSWORD_ENV) {
		Ok(value) if !value.is_empty() => value,
		_ => prompt_password(&format!("Router password for {username}: "))?,
	};
	if password.is_empty() {
		return Err(CliError::MissingPassword);
	}
	Ok(Credentials::new(username, password))
}

fn prompt_password(prompt: &str) -> Result<String> {
	let stdin = io::stdin();
	if !stdin.is_terminal() {
		return Err(CliError::MissingPassword);
	}

	let mut stderr = io::stderr();
	write!(stderr, "{prompt}")?;
	stderr.flush()?;

	let line = {
		let _echo = EchoGuard::disable();
		let mut line = String::new();
		stdin.lock().read_line(&mut line)?;
		line
	};
	writeln!(stderr)?;
	Ok(trim_line(&line).to_string())
}

fn trim_line(line: &str) -> &str {
	line.trim_end_matches(['\n', '\r'])
}

/// Turns terminal echo off for its lifetime.
#[cfg(unix)]
struct EchoGuard {
	saved: Option<libc::termios>,
}

#[cfg(unix)]
impl EchoGuard {
	fn disable() -> Self {
		let fd = libc::STDIN_FILENO;
		// SAFETY: termios is plain data; tcgetattr fills it or fails.
		let mut term: libc::termios = unsafe { std::mem::zeroed() };
		if unsafe { libc::tcgetattr(fd, &mut term) } != 0 {
			return Self { saved: None };
		}
		let saved = term;
		term.c_lflag &= !libc::ECHO;
		term.c_lflag |= libc::ECHONL;
		// SAFETY: fd is stdin and term came from tcgetattr.
		if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &term) } != 0 {
			return Self { saved: None };
		}
		Self { saved: Some(saved) }
	}
}

#[cfg(unix)]
impl Drop for EchoGuard {
	fn drop(&mut self) {
		if let Some(saved) = self.saved.take() {
			// SAFETY: restores the attributes read in `disable`.
			unsafe {
				libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &saved);
			}
		}
	}
}

/// Echo control is unix-only; elsewhere the prompt reads a plain line.
#[cfg(not(unix))]
struct EchoGuard;

#[cfg(not(unix))]
impl EchoGuard {
	fn disable() -> Self {
		EchoGuard
	}
}
