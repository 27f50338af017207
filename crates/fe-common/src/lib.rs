//! Shared logging bootstrap for the fueleconomy workspace.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
