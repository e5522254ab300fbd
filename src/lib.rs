//! # Tempo Balance
//!
//! Computes the overtime balance of a Jira/Tempo user.
//!
//! ## Overview
//!
//! One linear run per invocation:
//! - load credentials and the Jira base URL from `config.toml`
//! - submit the Jira login form, keeping the session cookies
//! - scrape the Tempo user key from the returned page
//! - fetch the timesheet approval statuses for the last N periods
//! - sum worked minus required-to-date seconds into a single balance
//!
//! Any failure aborts the run; see [`Error`].
//!
//! ## Features
//!
//! - `colors` (default): Colors the balance via owo-colors

/// Overtime aggregation and duration formatting
pub mod balance;

/// Command-line argument parsing
pub mod cli;

/// TOML config loading
pub mod config;

/// Text and JSON output
pub mod display;

/// Error taxonomy shared by all stages
pub mod error;

/// tracing subscriber setup
pub mod logging;

/// Data models for the Tempo REST API
pub mod models;

/// User key extraction from Jira HTML
pub mod scrape;

/// Login and approval-status requests against Jira/Tempo
pub mod tempo_api;

/// The login → scrape → fetch → aggregate pipeline
pub mod workflow;

pub use balance::Balance;
pub use config::Config;
pub use error::{Error, Result};
