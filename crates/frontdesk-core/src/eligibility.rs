//! # Booking Eligibility
//!
//! Decides whether a booking may be cancelled or have services attached.
//! Every action button in the client asks this module instead of
//! re-implementing the rules.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cancel                                            │
//! │                                                                         │
//! │  status == cancelled ?──────────► AlreadyCancelled                      │
//! │  status == checked_out ?────────► AlreadyCheckedOut                     │
//! │  transaction success/completed ?► AlreadyPaid                           │
//! │  now - created_at >= 2h ?───────► GraceWindowExpired (also if unknown)  │
//! │  status not pending/confirmed ?─► StatusNotCancellable                  │
//! │  otherwise ─────────────────────► can cancel                            │
//! │                                                                         │
//! │                       Add service                                       │
//! │                                                                         │
//! │  status == cancelled ?──────────► BookingCancelled                      │
//! │  status == checked_out ?────────► BookingCheckedOut                     │
//! │  status unrecognised ?──────────► StatusUnknown                         │
//! │  check_out < today ?────────────► StayEnded                             │
//! │  status == pending ?────────────► AwaitingConfirmation                  │
//! │  ── predicate is true from here ──                                      │
//! │  no paid transaction ?──────────► Unpaid (message only)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Unpaid` is reported by the reason selector but does not gate
//! [`can_add_service`]. Both are kept as the client currently shows them.
//!
//! Nothing here reads the clock: `now` and `today` come from the caller.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::types::{Booking, BookingStatus, Transaction};
use crate::CANCEL_GRACE_WINDOW_HOURS;

/// Time after creation during which an unpaid booking may be cancelled.
pub fn cancel_grace_window() -> Duration {
    Duration::hours(CANCEL_GRACE_WINDOW_HOURS)
}

// =============================================================================
// Reasons
// =============================================================================

/// Why a booking cannot be cancelled. Variants are listed in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CancelBlockReason {
    AlreadyCancelled,
    AlreadyCheckedOut,
    AlreadyPaid,
    GraceWindowExpired,
    /// Checked in, no-show or unrecognised.
    StatusNotCancellable,
}

impl CancelBlockReason {
    /// Message shown next to the disabled cancel button.
    pub fn message(&self) -> &'static str {
        match self {
            CancelBlockReason::AlreadyCancelled => "This booking has already been cancelled",
            CancelBlockReason::AlreadyCheckedOut => "The guest has already checked out",
            CancelBlockReason::AlreadyPaid => {
                "This booking has been paid and cannot be cancelled here"
            }
            CancelBlockReason::GraceWindowExpired => {
                "Bookings can only be cancelled within 2 hours of being made"
            }
            CancelBlockReason::StatusNotCancellable => {
                "Only pending or confirmed bookings can be cancelled"
            }
        }
    }
}

impl fmt::Display for CancelBlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Why services cannot (or should not) be attached. Variants in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ServiceBlockReason {
    BookingCancelled,
    BookingCheckedOut,
    StatusUnknown,
    StayEnded,
    AwaitingConfirmation,
    /// Informational only, see module docs.
    Unpaid,
}

impl ServiceBlockReason {
    /// Message shown next to the add-service form.
    pub fn message(&self) -> &'static str {
        match self {
            ServiceBlockReason::BookingCancelled => "Services cannot be added to a cancelled booking",
            ServiceBlockReason::BookingCheckedOut => "Services cannot be added after check-out",
            ServiceBlockReason::StatusUnknown => "The booking status is not recognised",
            ServiceBlockReason::StayEnded => "The stay has already ended",
            ServiceBlockReason::AwaitingConfirmation => {
                "The booking must be confirmed before services can be added"
            }
            ServiceBlockReason::Unpaid => "The booking has not been paid yet",
        }
    }

    /// Whether this reason actually disables the action.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, ServiceBlockReason::Unpaid)
    }
}

impl fmt::Display for ServiceBlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// Payment State
// =============================================================================

/// A missing transaction means "unpaid".
pub fn is_paid(transaction: Option<&Transaction>) -> bool {
    transaction.is_some_and(|tx| tx.status.is_paid())
}

/// Picks the transaction the engine should see for a booking.
///
/// A paid transaction wins; otherwise the most recently created one linked to
/// the booking; otherwise `None`.
pub fn booking_transaction(transactions: &[Transaction], booking_id: i64) -> Option<&Transaction> {
    let mut latest: Option<&Transaction> = None;
    for tx in transactions
        .iter()
        .filter(|tx| tx.booking_id == Some(booking_id))
    {
        if tx.status.is_paid() {
            return Some(tx);
        }
        if latest.map_or(true, |l| tx.created_at > l.created_at) {
            latest = Some(tx);
        }
    }
    latest
}

// =============================================================================
// Cancel
// =============================================================================

/// First failing cancel condition, or `None` when cancellation is allowed.
pub fn cancel_block_reason(
    booking: &Booking,
    transaction: Option<&Transaction>,
    now: DateTime<Utc>,
) -> Option<CancelBlockReason> {
    match booking.status {
        BookingStatus::Cancelled => return Some(CancelBlockReason::AlreadyCancelled),
        BookingStatus::CheckedOut => return Some(CancelBlockReason::AlreadyCheckedOut),
        _ => {}
    }

    if is_paid(transaction) {
        return Some(CancelBlockReason::AlreadyPaid);
    }

    // Without a creation time the window cannot be shown to be open
    let inside_window = booking
        .created_at
        .is_some_and(|created_at| now - created_at < cancel_grace_window());
    if !inside_window {
        return Some(CancelBlockReason::GraceWindowExpired);
    }

    if !matches!(booking.status, BookingStatus::Pending | BookingStatus::Confirmed) {
        return Some(CancelBlockReason::StatusNotCancellable);
    }

    None
}

/// Whether the booking may be cancelled at `now`.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, NaiveDate, TimeZone, Utc};
/// use frontdesk_core::{eligibility, Booking, BookingStatus, Money};
///
/// let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
/// let booking = Booking {
///     id: 1,
///     code: "BK-1".into(),
///     room_code: Some("101".into()),
///     room_id: None,
///     room_number: None,
///     status: BookingStatus::Pending,
///     check_in: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
///     check_out: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
///     created_at: Some(created),
///     price_total: Money::from_minor(900_000),
///     guest_count: 2,
/// };
///
/// assert!(eligibility::can_cancel(&booking, None, created + Duration::minutes(30)));
/// assert!(!eligibility::can_cancel(&booking, None, created + Duration::hours(2)));
/// ```
pub fn can_cancel(booking: &Booking, transaction: Option<&Transaction>, now: DateTime<Utc>) -> bool {
    cancel_block_reason(booking, transaction, now).is_none()
}

// =============================================================================
// Add Service
// =============================================================================

/// Whether a service line may be attached (or removed) on `today`.
///
/// Payment state is not consulted. See [`ServiceBlockReason::is_blocking`].
pub fn can_add_service(booking: &Booking, today: NaiveDate) -> bool {
    matches!(
        booking.status,
        BookingStatus::Confirmed | BookingStatus::CheckedIn | BookingStatus::NoShow
    ) && booking.check_out >= today
}

/// First applicable service reason, including the informational `Unpaid`.
pub fn service_block_reason(
    booking: &Booking,
    transaction: Option<&Transaction>,
    today: NaiveDate,
) -> Option<ServiceBlockReason> {
    match booking.status {
        BookingStatus::Cancelled => return Some(ServiceBlockReason::BookingCancelled),
        BookingStatus::CheckedOut => return Some(ServiceBlockReason::BookingCheckedOut),
        BookingStatus::Unknown => return Some(ServiceBlockReason::StatusUnknown),
        _ => {}
    }

    if booking.check_out < today {
        return Some(ServiceBlockReason::StayEnded);
    }

    if booking.status == BookingStatus::Pending {
        return Some(ServiceBlockReason::AwaitingConfirmation);
    }

    if !is_paid(transaction) {
        return Some(ServiceBlockReason::Unpaid);
    }

    None
}

// =============================================================================
// Flags
// =============================================================================

/// Action flags consumed by the booking screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityFlags {
    pub booking_id: i64,
    pub can_cancel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub cancel_reason: Option<String>,
    pub can_add_service: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub service_disabled_reason: Option<String>,
}

impl EligibilityFlags {
    /// Evaluates both predicates and their reasons for one booking.
    pub fn evaluate(
        booking: &Booking,
        transaction: Option<&Transaction>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Self {
        let cancel_reason = cancel_block_reason(booking, transaction, now);
        let service_reason = service_block_reason(booking, transaction, today);

        EligibilityFlags {
            booking_id: booking.id,
            can_cancel: cancel_reason.is_none(),
            cancel_reason: cancel_reason.map(|r| r.message().to_string()),
            can_add_service: can_add_service(booking, today),
            service_disabled_reason: service_reason.map(|r| r.message().to_string()),
        }
    }
}

/// Flags for every booking, pairing each with [`booking_transaction`].
pub fn evaluate_all(
    bookings: &[Booking],
    transactions: &[Transaction],
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Vec<EligibilityFlags> {
    bookings
        .iter()
        .map(|booking| {
            let tx = booking_transaction(transactions, booking.id);
            EligibilityFlags::evaluate(booking, tx, now, today)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
