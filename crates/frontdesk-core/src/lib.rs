//! # frontdesk-core: Pure Business Logic for Frontdesk
//!
//! Decision and aggregation logic behind the hotel front-desk client. Every
//! function is pure: no I/O, no clock reads, no shared state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Frontdesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Booking web client (excluded)                   │   │
//! │  │    Booking list ──► Cancel / Add service buttons ──► Reports    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               frontdesk-report (fan-out / fan-in)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ frontdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌─────────┐  ┌────────────┐  │   │
//! │  │   │   types   │  │ eligibility │  │  folio  │  │ reconcile  │  │   │
//! │  │   │  Booking  │  │  can_cancel │  │ service │  │ RoomSummary│  │   │
//! │  │   │  Room     │  │  can_add_   │  │ lines   │  │ totals     │  │   │
//! │  │   │  Tx       │  │  service    │  │         │  │            │  │   │
//! │  │   └───────────┘  └─────────────┘  └─────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • PURE FUNCTIONS                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Room, Booking, Transaction, service lines, DateRange
//! - [`money`] - Integer money type
//! - [`eligibility`] - Cancel / add-service predicates and reasons
//! - [`folio`] - Attaching and removing service lines, guest charge
//! - [`reconciliation`] - Per-room occupancy and revenue summaries
//! - [`validation`] - Request validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use frontdesk_core::{reconciliation, DateRange};
//!
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
//! )
//! .unwrap();
//!
//! let report = reconciliation::reconcile(&[], &[], &[], &range);
//! assert!(report.rows.is_empty());
//! assert!(!report.has_discrepancy());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod eligibility;
pub mod error;
pub mod folio;
pub mod money;
pub mod reconciliation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use eligibility::{CancelBlockReason, EligibilityFlags, ServiceBlockReason};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use reconciliation::{GlobalTotals, ReconciliationReport, RoomSummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Hours after creation during which an unpaid booking may be cancelled.
pub const CANCEL_GRACE_WINDOW_HOURS: i64 = 2;

/// Maximum quantity on a single service line.
///
/// ## Business Reason
/// Catches typos at the desk (typing 100 instead of 1).
pub const MAX_SERVICE_QUANTITY: i64 = 99;
