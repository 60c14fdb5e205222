//! Terminal shell around the `sigwatch` core: flags and config file,
//! password prompt, rendering, persistence and audio cues.

pub mod audio;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod display;
pub mod error;
pub mod logging;
pub mod run;
pub mod sink;
pub mod store;
pub mod styles;
