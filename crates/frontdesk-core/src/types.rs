//! # Domain Types
//!
//! Records supplied by the booking API, and the date range used by reports.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Room       │   │     Booking     │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄ ─│  room_code?     │◄──│  booking_id?    │       │
//! │  │  code           │◄ ─│  room_id?       │   │  amount         │       │
//! │  │  number?        │◄ ─│  room_number?   │   │  status         │       │
//! │  │  price          │   │  status         │   │  provider       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  The dashed arrows are NOT a foreign key: upstream systems fill         │
//! │  whichever of the three room references they happen to know.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Booking Lifecycle
//! ```text
//!   pending ──► confirmed ──► checked_in ──► checked_out
//!      │            │
//!      ├────────────┼──► cancelled
//!      └────────────┴──► no_show
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Room
// =============================================================================

/// Operational status of a room, owned by inventory management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Available,
    Cleaning,
    Maintenance,
    Booked,
    /// A status this build does not know yet.
    #[serde(other)]
    Unknown,
}

/// Room category as nested by the booking API (`type: { name }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomType {
    pub name: String,
}

/// A sellable room.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,

    /// Business code, e.g. "DLX-101".
    #[serde(deserialize_with = "lenient::string")]
    pub code: String,

    /// Door number. Some properties send it as a JSON number.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub number: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, rename = "type")]
    pub room_type: Option<RoomType>,

    /// Nightly price.
    #[serde(default)]
    pub price: Money,

    #[serde(default)]
    pub status: RoomStatus,
}

impl Room {
    /// Returns the room type name, if the API sent one.
    pub fn type_name(&self) -> Option<&str> {
        self.room_type.as_ref().map(|t| t.name.as_str())
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle status of a booking. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
    /// Missing or unrecognised on the wire. Every action is refused.
    #[default]
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::CheckedOut | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// Statuses that never occupy a room in a report range.
    pub fn is_void(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::NoShow | BookingStatus::Unknown
        )
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (*self, next),
            (Pending, Confirmed)
                | (Confirmed, CheckedIn)
                | (CheckedIn, CheckedOut)
                | (Pending | Confirmed, Cancelled)
                | (Pending | Confirmed, NoShow)
        )
    }

    /// Validates a status change and returns the new status.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::BookingStatus;
    ///
    /// let next = BookingStatus::Pending.transition(BookingStatus::Confirmed).unwrap();
    /// assert_eq!(next, BookingStatus::Confirmed);
    /// assert!(BookingStatus::Cancelled.transition(BookingStatus::Confirmed).is_err());
    /// ```
    pub fn transition(self, next: BookingStatus) -> CoreResult<BookingStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Wire name, as used by the booking API.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
            BookingStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A reservation of a room for a date range.
///
/// `price_total` covers the room only; service lines are charged on top
/// (see [`crate::folio::guest_charge_total`]).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,

    #[serde(default)]
    pub code: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub room_code: Option<String>,

    #[serde(default)]
    pub room_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub room_number: Option<String>,

    #[serde(default)]
    pub status: BookingStatus,

    #[serde(with = "stay_date")]
    #[ts(as = "String")]
    pub check_in: NaiveDate,

    #[serde(with = "stay_date")]
    #[ts(as = "String")]
    pub check_out: NaiveDate,

    /// Absent on some legacy records; such bookings are never cancellable.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub price_total: Money,

    #[serde(default)]
    pub guest_count: u32,
}

// =============================================================================
// Transaction
// =============================================================================

/// Payment attempt status as reported by the payment layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Initiated,
    Success,
    Failed,
    Refunded,
    /// Legacy settlement status still emitted by some providers.
    Completed,
    /// Missing or unrecognised. Neither paid nor revenue.
    #[default]
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Whether the booking counts as paid for eligibility purposes.
    pub fn is_paid(&self) -> bool {
        matches!(self, TransactionStatus::Success | TransactionStatus::Completed)
    }

    /// Whether the amount counts towards revenue. Only `success` does.
    pub fn counts_as_revenue(&self) -> bool {
        matches!(self, TransactionStatus::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    #[default]
    Cash,
    Online,
    #[serde(other)]
    Other,
}

/// A payment record, optionally linked to a booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,

    #[serde(default)]
    pub booking_id: Option<i64>,

    #[serde(default)]
    pub amount: Money,

    #[serde(default)]
    pub status: TransactionStatus,

    #[serde(default)]
    pub provider: PaymentProvider,

    /// Without it the payment cannot be placed on a report day.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Additional Services
// =============================================================================

/// A catalog service that can be attached to a stay (laundry, breakfast...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalService {
    pub id: i64,
    pub name: String,
    pub price: Money,
}

/// A service attached to a booking.
/// Uses snapshot pattern: the unit price is frozen when the line is created.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalServiceLine {
    /// UUID v4.
    pub id: String,
    pub booking_id: i64,
    pub service_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub total: Money,
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive report range at day granularity, in the property's local time.
///
/// Day granularity is equivalent to normalizing the start bound to local
/// midnight and the end bound to 23:59:59.999 of the same local day. Instants
/// (transaction times) are placed on a day using `utc_offset_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[ts(as = "String")]
    start: NaiveDate,
    #[ts(as = "String")]
    end: NaiveDate,
    utc_offset_minutes: i32,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateRange {
            start,
            end,
            utc_offset_minutes: 0,
        })
    }

    /// Places instants on local days at `offset` instead of UTC.
    pub fn with_offset(self, offset: FixedOffset) -> Self {
        DateRange {
            utc_offset_minutes: offset.local_minus_utc() / 60,
            ..self
        }
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `day` falls inside the range (both bounds inclusive).
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Whether the local day of `at` falls inside the range.
    pub fn contains_instant(&self, at: DateTime<Utc>) -> bool {
        self.contains(at.with_timezone(&self.offset()).date_naive())
    }

    /// Overlap test for a stay: `check_in ≤ end ∧ check_out ≥ start`.
    ///
    /// A stay that checks out on the first day of the range still overlaps.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        check_in <= self.end && check_out >= self.start
    }

    /// Number of calendar days covered.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Stay dates: written as `YYYY-MM-DD`, read from either a plain date or an
/// RFC 3339 timestamp.
///
/// Serde only sees the raw value, so a timestamp is read as its UTC day.
/// Snapshot loaders that know the property offset rewrite timestamps with
/// [`stay_date::parse_in`] before decoding.
pub mod stay_date {
    use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid stay date: {raw}")))
    }

    /// Parses a plain date or an RFC 3339 timestamp (UTC day).
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        parse_in(raw, Utc.fix())
    }

    /// Parses a plain date as-is, or an RFC 3339 timestamp as its day at
    /// `offset`.
    pub fn parse_in(raw: &str, offset: FixedOffset) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&offset).date_naive())
    }

    /// Formats a day the way [`serialize`] writes it.
    pub fn format(date: NaiveDate) -> String {
        date.format(FORMAT).to_string()
    }
}

/// Room references arrive as strings or numbers depending on the source.
mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Int(i64),
    }

    impl StringOrNumber {
        fn into_string(self) -> String {
            match self {
                StringOrNumber::Text(s) => s,
                StringOrNumber::Int(n) => n.to_string(),
            }
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(StringOrNumber::deserialize(deserializer)?.into_string())
    }

    /// Empty strings are treated as absent.
    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<StringOrNumber>::deserialize(deserializer)?;
        Ok(value
            .map(StringOrNumber::into_string)
            .filter(|s| !s.trim().is_empty()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_lifecycle_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(CheckedIn));
        assert!(CheckedIn.can_transition_to(CheckedOut));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(NoShow));

        assert!(!Pending.can_transition_to(CheckedIn));
        assert!(!CheckedIn.can_transition_to(Cancelled));
        for terminal in [CheckedOut, Cancelled, NoShow] {
            assert!(terminal.is_terminal());
            for next in [Pending, Confirmed, CheckedIn, CheckedOut, Cancelled, NoShow] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_transition_error() {
        let err = BookingStatus::CheckedOut
            .transition(BookingStatus::CheckedIn)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn test_transaction_status_flags() {
        assert!(TransactionStatus::Success.is_paid());
        assert!(TransactionStatus::Completed.is_paid());
        assert!(!TransactionStatus::Initiated.is_paid());
        assert!(!TransactionStatus::Refunded.is_paid());

        assert!(TransactionStatus::Success.counts_as_revenue());
        assert!(!TransactionStatus::Completed.counts_as_revenue());
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(day("2024-01-20"), day("2024-01-10")).is_err());
        let single = DateRange::new(day("2024-01-10"), day("2024-01-10")).unwrap();
        assert_eq!(single.days(), 1);
        assert!(single.contains(day("2024-01-10")));
    }

    #[test]
    fn test_overlap_boundaries() {
        let range = DateRange::new(day("2024-01-11"), day("2024-01-20")).unwrap();
        assert!(range.overlaps(day("2024-01-10"), day("2024-01-12")));
        // Checking out on the first day still touches the range
        assert!(range.overlaps(day("2024-01-05"), day("2024-01-11")));
        // Checking in on the last day too
        assert!(range.overlaps(day("2024-01-20"), day("2024-01-22")));
        assert!(!range.overlaps(day("2024-01-05"), day("2024-01-10")));
        assert!(!range.overlaps(day("2024-01-21"), day("2024-01-23")));
    }

    #[test]
    fn test_booking_from_api_json() {
        let json = r#"{
            "id": 10,
            "code": "BK-10",
            "roomCode": "101",
            "roomNumber": 101,
            "status": "checked_in",
            "checkIn": "2024-03-01T14:00:00Z",
            "checkOut": "2024-03-03",
            "createdAt": "2024-02-01T00:00:00Z",
            "priceTotal": 1000000
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.room_code.as_deref(), Some("101"));
        assert_eq!(booking.room_number.as_deref(), Some("101"));
        assert_eq!(booking.room_id, None);
        assert_eq!(booking.status, BookingStatus::CheckedIn);
        assert_eq!(booking.check_in, day("2024-03-01"));
        assert_eq!(booking.check_out, day("2024-03-03"));
        assert_eq!(booking.price_total.minor(), 1_000_000);
        assert_eq!(booking.guest_count, 0);

        let out = serde_json::to_value(&booking).unwrap();
        assert_eq!(out["checkIn"], "2024-03-01");
    }

    #[test]
    fn test_empty_room_reference_is_absent() {
        let json = r#"{
            "id": 11, "roomCode": "", "roomNumber": null, "status": "pending",
            "checkIn": "2024-03-01", "checkOut": "2024-03-02",
            "createdAt": "2024-02-01T00:00:00Z"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.room_code, None);
        assert_eq!(booking.room_number, None);
    }

    #[test]
    fn test_room_from_api_json() {
        let json = r#"{
            "id": 7, "code": "R1", "number": "101", "title": "Deluxe King",
            "type": { "name": "Deluxe" }, "price": 450000, "status": "cleaning"
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.type_name(), Some("Deluxe"));
        assert_eq!(room.status, RoomStatus::Cleaning);
        assert_eq!(room.price.minor(), 450_000);
    }

    #[test]
    fn test_unknown_statuses_fall_back() {
        let json = r#"{
            "id": 12, "status": "on_hold",
            "checkIn": "2024-03-01", "checkOut": "2024-03-02"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Unknown);
        assert!(booking.status.is_void());
        assert_eq!(booking.created_at, None);

        let tx: Transaction =
            serde_json::from_str(r#"{ "id": 1, "status": "chargeback", "provider": "card" }"#).unwrap();
        assert_eq!(tx.status, TransactionStatus::Unknown);
        assert_eq!(tx.provider, PaymentProvider::Other);
        assert!(!tx.status.is_paid());
        assert!(!tx.status.counts_as_revenue());
        assert!(tx.amount.is_zero());
        assert_eq!(tx.created_at, None);

        let room: Room = serde_json::from_str(r#"{ "id": 1, "code": "R1", "status": "renovating" }"#).unwrap();
        assert_eq!(room.status, RoomStatus::Unknown);
    }

    #[test]
    fn test_odd_amount_types_are_read() {
        let tx: Transaction = serde_json::from_str(
            r#"{ "id": 1, "amount": "1000000", "status": "success", "createdAt": "2024-03-01T08:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(tx.amount.minor(), 1_000_000);

        let tx: Transaction =
            serde_json::from_str(r#"{ "id": 2, "amount": 1000000.0, "status": "success" }"#).unwrap();
        assert_eq!(tx.amount.minor(), 1_000_000);
    }

    #[test]
    fn test_stay_date_at_property_offset() {
        let plus7 = FixedOffset::east_opt(7 * 3600).unwrap();
        // Local midnight of Mar 2 at UTC+7
        assert_eq!(
            stay_date::parse_in("2024-03-01T17:00:00.000Z", plus7),
            Some(day("2024-03-02"))
        );
        assert_eq!(stay_date::parse("2024-03-01T17:00:00.000Z"), Some(day("2024-03-01")));
        // Plain dates are already local
        assert_eq!(stay_date::parse_in("2024-03-01", plus7), Some(day("2024-03-01")));
    }

    #[test]
    fn test_range_places_instants_on_local_days() {
        use chrono::TimeZone;

        let plus7 = FixedOffset::east_opt(7 * 3600).unwrap();
        let range = DateRange::new(day("2024-03-02"), day("2024-03-05")).unwrap();
        let evening_utc = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

        assert!(!range.contains_instant(evening_utc));
        assert!(range.with_offset(plus7).contains_instant(evening_utc));

        let json = serde_json::to_value(range.with_offset(plus7)).unwrap();
        assert_eq!(json["utcOffsetMinutes"], 420);
        assert_eq!(json["start"], "2024-03-02");
    }

    #[test]
    fn test_stay_date_rejects_garbage() {
        assert!(stay_date::parse("next tuesday").is_none());
        assert_eq!(stay_date::parse(" 2024-01-10 "), Some(day("2024-01-10")));
    }
}
