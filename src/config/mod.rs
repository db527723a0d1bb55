//! Configuration module
//!
//! Settings are persisted as TOML under the user config directory and every
//! section falls back to defaults, so a partial file is always valid.

pub mod config;

pub use config::Config;
