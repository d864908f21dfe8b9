//! # Reconciliation
//!
//! Associates bookings and transactions with rooms to produce the per-room
//! occupancy/revenue rows behind dashboards and exported reports.
//!
//! ## Per-Room Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bookings ──► matches_room(b, room) ──► matched (all statuses, all      │
//! │                                          dates)                         │
//! │                                            │                            │
//! │                     ┌──────────────────────┴───────────────┐            │
//! │                     ▼                                      ▼            │
//! │       drop cancelled / no_show            matched booking ids           │
//! │       keep stays overlapping range                 │                    │
//! │                     │                              ▼                    │
//! │                     ▼                 Σ success transaction amounts     │
//! │       is_booked, booking_count                     │                    │
//! │                     └──────────────┬───────────────┘                    │
//! │                                    ▼                                    │
//! │                               RoomSummary                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Revenue is computed over the UNFILTERED matched set: a paid stay outside
//! the range still counts towards the room's revenue. Report totals downstream
//! are calibrated against this, so it stays.
//!
//! A booking whose references collide across rooms is counted for each room
//! it matches. There is no cross-room deduplication.
//!
//! Transactions are placed on a report day by their creation instant, read at
//! the range's UTC offset. A transaction without a creation time belongs to
//! no day and is left out of the direct total.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Booking, DateRange, Room, RoomStatus, Transaction};

// =============================================================================
// Matching
// =============================================================================

/// Whether `booking` refers to `room`.
///
/// Upstream systems fill whichever room reference they know, so this is a
/// disjunction rather than a join key:
///
/// - `room_code == room.code`
/// - `room_id == room.id`
/// - `room_number == room.number`
/// - `room_code == room.number`
///
/// An absent value on either side never matches.
pub fn matches_room(booking: &Booking, room: &Room) -> bool {
    let room_number = room.number.as_deref();

    booking.room_code.as_deref() == Some(room.code.as_str())
        || booking.room_id == Some(room.id)
        || (room_number.is_some() && booking.room_number.as_deref() == room_number)
        || (room_number.is_some() && booking.room_code.as_deref() == room_number)
}

// =============================================================================
// Output Types
// =============================================================================

/// One row of the occupancy/revenue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub code: String,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
    pub status: RoomStatus,
    pub is_booked: bool,
    pub booking_count: usize,
    /// Nightly price.
    pub price: Money,
    pub revenue: Money,
}

/// Reduction over all rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GlobalTotals {
    /// Rooms with at least one stay in range.
    pub booked_count: usize,
    pub total_bookings: usize,
    pub total_revenue: Money,
}

/// Rows, totals and the audit figures for one range.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub range: DateRange,
    pub rows: Vec<RoomSummary>,
    pub totals: GlobalTotals,
    /// Σ success transactions created in range, room match ignored.
    pub direct_transaction_total: Money,
    /// `direct_transaction_total - totals.total_revenue`.
    pub revenue_gap: Money,
}

impl ReconciliationReport {
    /// Whether the room-derived revenue disagrees with the direct total.
    pub fn has_discrepancy(&self) -> bool {
        !self.revenue_gap.is_zero()
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds one summary row per room, in room order.
pub fn build_room_summary(
    rooms: &[Room],
    bookings: &[Booking],
    transactions: &[Transaction],
    range: &DateRange,
) -> Vec<RoomSummary> {
    let revenue_by_booking = revenue_by_booking(transactions);

    rooms
        .iter()
        .map(|room| summarize_room(room, bookings, &revenue_by_booking, range))
        .collect()
}

fn summarize_room(
    room: &Room,
    bookings: &[Booking],
    revenue_by_booking: &HashMap<i64, Money>,
    range: &DateRange,
) -> RoomSummary {
    let matched: Vec<&Booking> = bookings.iter().filter(|b| matches_room(b, room)).collect();

    let booking_count = matched
        .iter()
        .filter(|b| !b.status.is_void() && range.overlaps(b.check_in, b.check_out))
        .count();

    let matched_ids: HashSet<i64> = matched.iter().map(|b| b.id).collect();
    let revenue = matched_ids
        .iter()
        .filter_map(|id| revenue_by_booking.get(id))
        .sum();

    RoomSummary {
        code: room.code.clone(),
        title: room.title.clone(),
        room_type: room.type_name().map(str::to_string),
        status: room.status,
        is_booked: booking_count > 0,
        booking_count,
        price: room.price,
        revenue,
    }
}

/// Σ success amounts per linked booking id.
fn revenue_by_booking(transactions: &[Transaction]) -> HashMap<i64, Money> {
    let mut totals: HashMap<i64, Money> = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.status.counts_as_revenue()) {
        if let Some(booking_id) = tx.booking_id {
            *totals.entry(booking_id).or_default() += tx.amount;
        }
    }
    totals
}

/// Reduces rows to the report footer.
pub fn global_totals(rows: &[RoomSummary]) -> GlobalTotals {
    rows.iter().fold(GlobalTotals::default(), |mut acc, row| {
        if row.is_booked {
            acc.booked_count += 1;
        }
        acc.total_bookings += row.booking_count;
        acc.total_revenue += row.revenue;
        acc
    })
}

/// Success transaction created on a local day inside `range`.
fn is_revenue_in_range(tx: &Transaction, range: &DateRange) -> bool {
    tx.status.counts_as_revenue() && tx.created_at.is_some_and(|at| range.contains_instant(at))
}

/// Σ success transactions whose creation day falls in `range`.
pub fn direct_transaction_total(transactions: &[Transaction], range: &DateRange) -> Money {
    transactions
        .iter()
        .filter(|tx| is_revenue_in_range(tx, range))
        .map(|tx| tx.amount)
        .sum()
}

/// Success transactions in range that no room's revenue can pick up: no
/// booking id, an unknown booking id, or a booking that matches no room.
pub fn unmatched_transactions<'a>(
    rooms: &[Room],
    bookings: &[Booking],
    transactions: &'a [Transaction],
    range: &DateRange,
) -> Vec<&'a Transaction> {
    let matched_ids: HashSet<i64> = bookings
        .iter()
        .filter(|b| rooms.iter().any(|room| matches_room(b, room)))
        .map(|b| b.id)
        .collect();

    transactions
        .iter()
        .filter(|tx| is_revenue_in_range(tx, range))
        .filter(|tx| tx.booking_id.map_or(true, |id| !matched_ids.contains(&id)))
        .collect()
}

/// Runs the whole aggregation for one range.
pub fn reconcile(
    rooms: &[Room],
    bookings: &[Booking],
    transactions: &[Transaction],
    range: &DateRange,
) -> ReconciliationReport {
    let rows = build_room_summary(rooms, bookings, transactions, range);
    let totals = global_totals(&rows);
    let direct = direct_transaction_total(transactions, range);

    ReconciliationReport {
        range: *range,
        rows,
        totals,
        direct_transaction_total: direct,
        revenue_gap: direct - totals.total_revenue,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
