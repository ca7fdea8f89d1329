//! Driftboard Application
//!
//! Native shell around the board engine: configuration, opening or seeding
//! a board, replaying recorded UI events, and auto-save.

mod app;
mod config;

pub use app::{App, AppError, ReplayStats, read_analysis, read_script};
pub use config::{AppConfig, ConfigError};
