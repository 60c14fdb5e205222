//! The seam between router logic and browser automation.
//!
//! [`RouterBrowser`] is the narrow set of page operations the session manager
//! and extractor need. [`CdpRouterBrowser`] implements it over the DevTools
//! protocol; tests substitute a scripted fake.

mod cdp;
mod script;

use async_trait::async_trait;

pub use cdp::{CdpLauncher, CdpRouterBrowser, CdpTarget};

use crate::capture::{LoginView, PageCapture};
use crate::error::BrowserError;
use crate::model::Credentials;
use crate::profile::RouterProfile;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[async_trait]
pub trait RouterBrowser: Send {
	/// Navigates to `url`. Network failures are [`BrowserError::Unreachable`].
	async fn open(&mut self, url: &str) -> Result<()>;

	/// Reloads the current document.
	async fn reload(&mut self) -> Result<()>;

	async fn current_url(&mut self) -> Result<String>;

	async fn inspect_login(&mut self, profile: &RouterProfile) -> Result<LoginView>;

	/// Fills the login form and clicks the submit button.
	async fn submit_login(&mut self, profile: &RouterProfile, credentials: &Credentials) -> Result<()>;

	async fn capture(&mut self, profile: &RouterProfile) -> Result<PageCapture>;

	/// Releases the underlying browser. Further calls may fail.
	async fn close(&mut self) -> Result<()>;
}

/// Produces fresh [`RouterBrowser`] instances.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
	type Browser: RouterBrowser;

	async fn launch(&self) -> Result<Self::Browser>;
}
