//! Session and signal-extraction core for 5G router web interfaces.
//!
//! The router UI is not an API: pages render asynchronously, the login flow
//! is a form, and the number of carrier blocks depends on what the modem is
//! attached to. This crate turns that into typed data:
//!
//! * [`SessionManager`] logs in against one of several candidate base URLs.
//! * [`MetricExtractor`] reads the status page into a [`SignalSnapshot`].
//! * [`classify`] maps each metric to a [`QualityTier`].
//! * [`Monitor`] runs the cycle once or continuously and reports to a
//!   [`SnapshotSink`].
//!
//! Browser automation sits behind [`RouterBrowser`]; [`CdpRouterBrowser`]
//! is the DevTools implementation.
//!
//! ```ignore
//! use sigwatch::{CdpLauncher, Credentials, Monitor, MonitorConfig, MetricExtractor, SessionConfig, SessionManager};
//! use sigwatch_runtime::LaunchOptions;
//!
//! let sessions = SessionManager::new(CdpLauncher::launch(LaunchOptions::default()), SessionConfig::default());
//! let mut monitor = Monitor::new(sessions, MetricExtractor::default(), Credentials::new("admin", password), MonitorConfig::default());
//! let summary = monitor.run(&mut sink, &mut stop_rx).await?;
//! ```

pub mod browser;
pub mod capture;
pub mod error;
pub mod extract;
pub mod model;
pub mod monitor;
pub mod parse;
pub mod poll;
pub mod profile;
pub mod quality;
pub mod session;

pub use browser::{BrowserLauncher, CdpLauncher, CdpRouterBrowser, CdpTarget, RouterBrowser};
pub use capture::{LoginState, LoginView, MarkerState, PageCapture, RawBand, RawConnection};
pub use error::{AuthError, BrowserError, FetchError, MonitorError};
pub use extract::{Extraction, MetricExtractor, parse_capture};
pub use model::{BandReading, ConnectionInfo, Credentials, MetricKind, SignalSnapshot};
pub use monitor::{Monitor, MonitorConfig, MonitorEvent, RunMode, RunSummary, SnapshotSink};
pub use parse::ParseWarning;
pub use poll::PollPolicy;
pub use profile::RouterProfile;
pub use quality::{BandQuality, QualityTier, classify, overall_tier};
pub use session::{Session, SessionConfig, SessionManager, default_candidates};
