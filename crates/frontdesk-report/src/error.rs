//! # Report Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Report Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Source      │  │      Domain             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Source         │  │  Core (CoreError)       │ │
//! │  │  ConfigLoad...  │  │  Io / Json      │  │                         │ │
//! │  │  Toml           │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A reconciliation discrepancy is NOT an error: it is logged and carried on
//! the report.

use frontdesk_core::CoreError;
use thiserror::Error;

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values that cannot be used.
    #[error("Invalid report configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Source Errors
    // =========================================================================
    /// A snapshot fetch failed. `what` is rooms, bookings or transactions.
    #[error("Failed to fetch {what}: {reason}")]
    Source { what: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ReportError {
    /// Wraps any displayable failure as a fetch error for `what`.
    pub fn fetch(what: &'static str, err: impl std::fmt::Display) -> Self {
        ReportError::Source {
            what,
            reason: err.to_string(),
        }
    }
}
