//! Logging setup.
//!
//! The bridge logs through the `log` facade only. Hosts call `init_logging`
//! early to install `env_logger`, or install their own backend.

mod init;

pub use init::{LOG_ENV, LoggingConfig, init_logging};
