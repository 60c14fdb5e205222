// Scripted stand-in for the router UI and the browser driving it.
//
// `Router` holds the simulated device state; `FakeBrowser` implements the
// browser seam against it so session, extraction and monitor logic can run
// without Chromium. Tests mutate the router through the shared handle.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use sigwatch::browser::Result;
use sigwatch::{
	BrowserError, BrowserLauncher, Credentials, LoginView, MarkerState, MonitorEvent, PageCapture, RawBand,
	RawConnection, RouterBrowser, RouterProfile, SessionConfig, SnapshotSink,
};
use url::Url;

pub const PASSWORD: &str = "correct horse";

/// What the router does after the login form is submitted with a wrong
/// password, or always when `accept` is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
	/// Shows a visible error message next to the form.
	ErrorIndicator,
	/// Redraws the form without any message.
	FormStays,
	/// Shows a blank page on the login URL.
	Hang,
}

#[derive(Debug)]
pub struct Router {
	pub reachable: HashSet<String>,
	pub password: String,
	pub rejection: Rejection,
	/// Serve a blank page instead of the login form.
	pub no_login_form: bool,
	pub logged_in: bool,
	pub current_url: String,
	submitted: bool,
	/// Upcoming captures that find the session expired.
	pub expire_captures: u32,
	/// Next login inspection fails as if the DevTools socket died.
	pub disconnect_next_inspect: bool,
	pub marker: MarkerState,
	pub connection: RawConnection,
	pub bands: Vec<RawBand>,

	pub launches: u32,
	pub submits: u32,
	pub captures: u32,
	pub reloads: u32,
	pub closes: u32,
	pub opened: Vec<String>,
}

impl Router {
	fn origin(url: &str) -> String {
		Url::parse(url)
			.map(|u| u.origin().ascii_serialization())
			.unwrap_or_default()
	}

	fn page(&self, path: &str) -> String {
		format!("{}{path}", Self::origin(&self.current_url))
	}

	fn on_login_page(&self) -> bool {
		self.current_url.contains("login")
	}
}

#[derive(Clone)]
pub struct RouterHandle(Arc<Mutex<Router>>);

impl RouterHandle {
	/// A router reachable at the given origins, serving the two-band fixture.
	pub fn new(reachable: &[&str]) -> Self {
		Self(Arc::new(Mutex::new(Router {
			reachable: reachable.iter().map(|r| Router::origin(r)).collect(),
			password: PASSWORD.to_string(),
			rejection: Rejection::ErrorIndicator,
			no_login_form: false,
			logged_in: false,
			current_url: "about:blank".to_string(),
			submitted: false,
			expire_captures: 0,
			disconnect_next_inspect: false,
			marker: MarkerState::Ready,
			connection: fixture_connection(),
			bands: fixture_bands(),
			launches: 0,
			submits: 0,
			captures: 0,
			reloads: 0,
			closes: 0,
			opened: Vec::new(),
		})))
	}

	pub fn lock(&self) -> MutexGuard<'_, Router> {
		self.0.lock().unwrap()
	}

	pub fn launcher(&self) -> FakeLauncher {
		FakeLauncher(self.clone())
	}
}

/// Connection fields as the status page renders them.
pub fn fixture_connection() -> RawConnection {
	RawConnection {
		status: Some("Connected".into()),
		rat_mode: Some("5G NSA".into()),
		operator: Some("Telia".into()),
		imsi: Some("240011234567890".into()),
		band: Some("B7 + n78".into()),
	}
}

/// PCC with every metric Excellent, PSCC without an RSSI element.
pub fn fixture_bands() -> Vec<RawBand> {
	vec![
		RawBand {
			index: 0,
			rssi: Some("-40 dBm".into()),
			sinr: Some("22 dB".into()),
			rsrp: Some("-69 dBm".into()),
			rsrq: Some("-9 dB".into()),
		},
		RawBand {
			index: 1,
			rssi: None,
			sinr: Some("16 dB".into()),
			rsrp: Some("-80 dBm".into()),
			rsrq: Some("-12 dB".into()),
		},
	]
}

pub fn credentials() -> Credentials {
	Credentials::new("admin", PASSWORD)
}

pub fn config(candidates: &[&str]) -> SessionConfig {
	SessionConfig {
		candidates: candidates.iter().map(|c| Url::parse(c).unwrap()).collect(),
		..SessionConfig::default()
	}
}

pub struct FakeLauncher(RouterHandle);

#[async_trait]
impl BrowserLauncher for FakeLauncher {
	type Browser = FakeBrowser;

	async fn launch(&self) -> Result<FakeBrowser> {
		self.0.lock().launches += 1;
		Ok(FakeBrowser(self.0.clone()))
	}
}

pub struct FakeBrowser(RouterHandle);

#[async_trait]
impl RouterBrowser for FakeBrowser {
	async fn open(&mut self, url: &str) -> Result<()> {
		let mut router = self.0.lock();
		router.opened.push(url.to_string());
		if !router.reachable.contains(&Router::origin(url)) {
			return Err(BrowserError::Unreachable {
				url: url.to_string(),
				reason: "net::ERR_NAME_NOT_RESOLVED".into(),
			});
		}
		router.current_url = url.to_string();
		router.submitted = false;
		if !router.logged_in && !router.on_login_page() {
			router.current_url = router.page("/login.html");
		}
		Ok(())
	}

	async fn reload(&mut self) -> Result<()> {
		let mut router = self.0.lock();
		router.reloads += 1;
		if !router.logged_in && !router.on_login_page() {
			router.current_url = router.page("/login.html");
		}
		Ok(())
	}

	async fn current_url(&mut self) -> Result<String> {
		Ok(self.0.lock().current_url.clone())
	}

	async fn inspect_login(&mut self, _profile: &RouterProfile) -> Result<LoginView> {
		let mut router = self.0.lock();
		if router.disconnect_next_inspect {
			router.disconnect_next_inspect = false;
			return Err(sigwatch_runtime::Error::ConnectionClosed.into());
		}
		if !router.on_login_page() {
			return Ok(LoginView {
				url: router.current_url.clone(),
				..Default::default()
			});
		}

		let hanging = router.no_login_form || (router.submitted && router.rejection == Rejection::Hang);
		let error_text = (router.submitted && router.rejection == Rejection::ErrorIndicator)
			.then(|| "Incorrect username or password".to_string());
		Ok(LoginView {
			url: router.current_url.clone(),
			login_form: !hanging,
			error_text,
			authenticated_marker: false,
		})
	}

	async fn submit_login(&mut self, _profile: &RouterProfile, credentials: &Credentials) -> Result<()> {
		let mut router = self.0.lock();
		router.submits += 1;
		if credentials.password() == router.password {
			router.logged_in = true;
			router.current_url = router.page("/index.html");
		} else {
			router.submitted = true;
		}
		Ok(())
	}

	async fn capture(&mut self, _profile: &RouterProfile) -> Result<PageCapture> {
		let mut router = self.0.lock();
		router.captures += 1;
		if router.logged_in && router.expire_captures > 0 {
			router.expire_captures -= 1;
			router.logged_in = false;
			router.current_url = router.page("/login.html");
		}
		if !router.logged_in {
			return Ok(PageCapture {
				url: router.current_url.clone(),
				login_form: true,
				..Default::default()
			});
		}
		Ok(PageCapture {
			url: router.current_url.clone(),
			login_form: false,
			marker: router.marker,
			connection: router.connection.clone(),
			bands: router.bands.clone(),
		})
	}

	async fn close(&mut self) -> Result<()> {
		self.0.lock().closes += 1;
		Ok(())
	}
}

/// Owned copy of a [`MonitorEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
	Authenticated(String),
	SessionExpired(u32),
	Snapshot { bands: usize, warnings: usize },
	CycleFailed(String),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
	pub events: Vec<Seen>,
}

impl SnapshotSink for RecordingSink {
	fn handle(&mut self, event: MonitorEvent<'_>) {
		self.events.push(match event {
			MonitorEvent::Authenticated { base_url } => Seen::Authenticated(base_url.to_string()),
			MonitorEvent::SessionExpired { attempt } => Seen::SessionExpired(attempt),
			MonitorEvent::Snapshot(extraction) => Seen::Snapshot {
				bands: extraction.snapshot.bands().len(),
				warnings: extraction.warnings.len(),
			},
			MonitorEvent::CycleFailed { error, .. } => Seen::CycleFailed(error.to_string()),
		});
	}
}
