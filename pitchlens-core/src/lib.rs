//! PitchLens Core Library
//!
//! Shared types, wire models, and errors for the presentation analysis API.
//! Used by the `pitchlensctl` client and CLI.

pub mod api;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::*;
pub use types::*;
