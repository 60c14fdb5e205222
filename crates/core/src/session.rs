//! Authentication against the router web UI.
//!
//! [`SessionManager`] owns the browser and the knowledge of which base URL is
//! logged in. The extractor borrows both per fetch through a [`Session`].

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::browser::{BrowserLauncher, RouterBrowser};
use crate::capture::LoginState;
use crate::error::{AuthError, BrowserError};
use crate::model::Credentials;
use crate::poll::PollPolicy;
use crate::profile::RouterProfile;

/// Base URLs tried when none are configured.
pub const DEFAULT_CANDIDATES: [&str; 2] = ["http://192.168.1.1", "http://zyxel.home"];

/// Ordered [`DEFAULT_CANDIDATES`] as parsed URLs.
pub fn default_candidates() -> Vec<Url> {
	DEFAULT_CANDIDATES.iter().filter_map(|raw| Url::parse(raw).ok()).collect()
}

/// Configuration of a [`SessionManager`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
	/// Base URLs tried in order.
	pub candidates: Vec<Url>,
	/// Page layout of the router UI.
	pub profile: RouterProfile,
	/// Bounds each wait on the login page (form rendering, post-submit).
	pub poll: PollPolicy,
	/// Login attempts per candidate when confirmation times out.
	pub login_attempts: u32,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			candidates: default_candidates(),
			profile: RouterProfile::default(),
			poll: PollPolicy::default(),
			login_attempts: 2,
		}
	}
}

impl SessionConfig {
	/// Same config with the login wait bounded by `timeout`.
	pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
		self.poll = self.poll.with_timeout(timeout);
		self
	}
}

#[derive(Debug, Clone)]
struct ActiveSession {
	base_url: Url,
}

/// Authenticated view of the browser, borrowed for one fetch.
pub struct Session<'a, B> {
	browser: &'a mut B,
	base_url: &'a Url,
	profile: &'a RouterProfile,
}

impl<'a, B: RouterBrowser> Session<'a, B> {
	pub fn browser(&mut self) -> &mut B {
		self.browser
	}

	pub fn base_url(&self) -> &'a Url {
		self.base_url
	}

	pub fn profile(&self) -> &'a RouterProfile {
		self.profile
	}

	/// Absolute URL of `path` on the authenticated router.
	pub fn page_url(&self, path: &str) -> String {
		page_url(self.base_url, path)
	}
}

fn page_url(base: &Url, path: &str) -> String {
	match base.join(path) {
		Ok(url) => url.into(),
		Err(_) => format!("{}{}", base.as_str().trim_end_matches('/'), path),
	}
}

/// How one login attempt against one candidate ended.
enum LoginFailure {
	Unreachable(String),
	Rejected(Option<String>),
	Timeout { waited_ms: u64 },
	Browser(BrowserError),
}

impl From<BrowserError> for LoginFailure {
	fn from(err: BrowserError) -> Self {
		match err {
			BrowserError::Unreachable { reason, .. } => LoginFailure::Unreachable(reason),
			other => LoginFailure::Browser(other),
		}
	}
}

pub struct SessionManager<L: BrowserLauncher> {
	launcher: L,
	config: SessionConfig,
	browser: Option<L::Browser>,
	active: Option<ActiveSession>,
}

impl<L: BrowserLauncher> SessionManager<L> {
	pub fn new(launcher: L, config: SessionConfig) -> Self {
		Self {
			launcher,
			config,
			browser: None,
			active: None,
		}
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn is_authenticated(&self) -> bool {
		self.active.is_some() && self.browser.is_some()
	}

	/// Base URL of the authenticated router.
	pub fn base_url(&self) -> Option<&Url> {
		self.active.as_ref().map(|a| &a.base_url)
	}

	/// Borrows the authenticated browser. `None` unless authenticated.
	pub fn session(&mut self) -> Option<Session<'_, L::Browser>> {
		let active = self.active.as_ref()?;
		let browser = self.browser.as_mut()?;
		Some(Session {
			browser,
			base_url: &active.base_url,
			profile: &self.config.profile,
		})
	}

	/// Forgets the authenticated state; the browser is kept for the next login.
	pub fn invalidate(&mut self) {
		if let Some(active) = self.active.take() {
			debug!(target = "sigwatch.session", url = %active.base_url, "session invalidated");
		}
	}

	/// Establishes an authenticated session.
	///
	/// On an already authenticated manager the current page is re-inspected and
	/// the login form is only submitted again when the router logged us out.
	pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
		if self.active.is_some() {
			match self.revalidate().await {
				Ok(true) => return Ok(()),
				Ok(false) => info!(target = "sigwatch.session", "router session ended; logging in again"),
				Err(err) if err.is_disconnect() => {
					warn!(target = "sigwatch.session", error = %err, "browser connection lost; relaunching");
					self.reset().await;
				}
				Err(err) => debug!(target = "sigwatch.session", error = %err, "revalidation failed"),
			}
			self.active = None;
		}

		if self.browser.is_none() {
			self.browser = Some(self.launcher.launch().await?);
		}

		let mut tried = Vec::with_capacity(self.config.candidates.len());
		let mut timed_out = None;

		for base in self.config.candidates.clone() {
			tried.push(base.to_string());
			let Some(browser) = self.browser.as_mut() else {
				break;
			};

			match login_at(browser, &self.config, &base, credentials).await {
				Ok(()) => {
					info!(target = "sigwatch.session", url = %base, "authenticated");
					self.active = Some(ActiveSession { base_url: base });
					return Ok(());
				}
				Err(LoginFailure::Unreachable(reason)) => {
					warn!(target = "sigwatch.session", url = %base, %reason, "candidate unreachable");
				}
				Err(LoginFailure::Timeout { waited_ms }) => {
					warn!(target = "sigwatch.session", url = %base, waited_ms, "login not confirmed");
					timed_out = Some(AuthError::LoginTimeout {
						url: base.to_string(),
						waited_ms,
					});
				}
				Err(LoginFailure::Rejected(reason)) => {
					warn!(target = "sigwatch.session", url = %base, "credentials rejected");
					return Err(AuthError::InvalidCredentials {
						url: base.to_string(),
						reason,
					});
				}
				Err(LoginFailure::Browser(err)) => {
					if err.is_disconnect() {
						self.reset().await;
					}
					return Err(err.into());
				}
			}
		}

		Err(timed_out.unwrap_or(AuthError::AllEndpointsUnreachable { tried }))
	}

	/// Releases the browser.
	pub async fn close(&mut self) -> Result<(), BrowserError> {
		self.active = None;
		match self.browser.take() {
			Some(mut browser) => browser.close().await,
			None => Ok(()),
		}
	}

	async fn revalidate(&mut self) -> Result<bool, BrowserError> {
		let Some(browser) = self.browser.as_mut() else {
			return Ok(false);
		};
		let view = browser.inspect_login(&self.config.profile).await?;
		Ok(view.state(&self.config.profile) == LoginState::Authenticated)
	}

	/// Drops the session and the browser; the next [`authenticate`](Self::authenticate)
	/// launches a fresh one.
	pub async fn reset(&mut self) {
		self.active = None;
		if let Some(mut browser) = self.browser.take() {
			if let Err(err) = browser.close().await {
				debug!(target = "sigwatch.session", error = %err, "closing dead browser failed");
			}
		}
	}
}

/// Runs up to `login_attempts` logins against one candidate.
async fn login_at<B: RouterBrowser>(
	browser: &mut B,
	config: &SessionConfig,
	base: &Url,
	credentials: &Credentials,
) -> Result<(), LoginFailure> {
	let profile = &config.profile;
	let login_url = page_url(base, &profile.login_path);
	let attempts = config.login_attempts.max(1);
	let mut waited_ms = 0;

	for attempt in 1..=attempts {
		debug!(target = "sigwatch.session", url = %login_url, attempt, "opening login page");
		browser.open(&login_url).await?;

		match wait_for_login_page(browser, config).await? {
			Some(LoginState::Authenticated) => {
				debug!(target = "sigwatch.session", url = %base, "existing session adopted");
				return Ok(());
			}
			Some(_) => {}
			None => return Err(LoginFailure::Unreachable(format!("no login form at {login_url}"))),
		}

		browser.submit_login(profile, credentials).await?;

		let mut poller = config.poll.start();
		let last = loop {
			let state = browser.inspect_login(profile).await?.state(profile);
			match state {
				LoginState::Authenticated => return Ok(()),
				LoginState::Rejected(reason) => return Err(LoginFailure::Rejected(Some(reason))),
				LoginState::LoginForm | LoginState::Pending => {}
			}
			if !poller.wait().await {
				break state;
			}
		};

		// A form that never went away after submit means the router refused us.
		if last == LoginState::LoginForm {
			return Err(LoginFailure::Rejected(None));
		}
		waited_ms = poller.elapsed_ms();
		debug!(target = "sigwatch.session", url = %base, attempt, waited_ms, "login confirmation timed out");
	}

	Err(LoginFailure::Timeout { waited_ms })
}

/// Waits for the login page to show either the form or authenticated
/// content. `None` when it shows neither within the poll timeout.
async fn wait_for_login_page<B: RouterBrowser>(browser: &mut B, config: &SessionConfig) -> Result<Option<LoginState>, BrowserError> {
	let profile = &config.profile;
	let mut poller = config.poll.start();
	loop {
		match browser.inspect_login(profile).await?.state(profile) {
			LoginState::Pending => {}
			state => return Ok(Some(state)),
		}
		if !poller.wait().await {
			return Ok(None);
		}
	}
}
