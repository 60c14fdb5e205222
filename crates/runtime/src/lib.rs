//! Chromium lifecycle and DevTools connection for sigwatch.
//!
//! [`Browser::launch`] starts a local Chromium-family browser with remote
//! debugging enabled (or [`Browser::connect`] attaches to one), and
//! [`Browser::new_page`] yields a [`Page`] that can navigate and evaluate
//! JavaScript. Everything router-specific lives in the `sigwatch` crate.

pub mod browser;
pub mod connection;
pub mod error;
pub mod launcher;
pub mod page;

pub use browser::{Browser, DEFAULT_LOAD_TIMEOUT};
pub use error::{Error, Result};
pub use launcher::{LaunchOptions, find_chrome_executable};
pub use page::Page;
