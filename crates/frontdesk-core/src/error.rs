//! # Error Types
//!
//! Domain-specific error types for frontdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  frontdesk-core errors (this file)                                     │
//! │  ├── CoreError        - Booking lifecycle / folio rule violations      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  frontdesk-report errors (separate crate)                              │
//! │  └── ReportError      - Config, snapshot source and I/O failures       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ReportError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Evaluating eligibility or aggregating a report never produces an error.
//! These types only cover invalid *requests*: an illegal status change, an
//! inverted date range, attaching a service to an ineligible booking.

use thiserror::Error;

use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Booking status change not allowed by the lifecycle.
    ///
    /// ## When This Occurs
    /// - Any change out of `cancelled`, `checked_out` or `no_show`
    /// - Skipping a step (`pending` straight to `checked_in`)
    #[error("Booking cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Report range whose start is after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    /// A service line cannot be attached to or removed from this booking.
    #[error("Cannot change services on booking {booking_id}: {reason}")]
    ServiceNotAllowed { booking_id: i64, reason: String },

    /// Service line id not present on the booking's folio.
    #[error("Service line not found: {0}")]
    ServiceLineNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
