//! PitchLens CLI Library
//!
//! Typed client for the presentation analysis API plus the `pitchlensctl`
//! command-line tool built on top of it.
//!
//! # Public API
//!
//! The primary public API is [`client::ApiClient`]. Configuration for the
//! CLI lives in [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use pitchlensctl::client::ApiClient;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ApiClient::builder("http://localhost:5000/api/v1", "my-api-key")
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! let health = client.check_health().await?;
//! println!("API version: {}", health.version);
//!
//! let page = client.list_presentations(10, 0).await?;
//! println!("{} presentations stored", page.total);
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the presentation analysis API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

#[cfg(test)]
pub mod test_utils;
