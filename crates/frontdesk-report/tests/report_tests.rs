//! End-to-end report tests over in-memory and on-disk snapshots.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use frontdesk_core::{eligibility, Booking, DateRange, Money, Room, Transaction};
use frontdesk_report::{
    booking_flags, JsonDirSource, MemorySource, ReportBuilder, ReportConfig, ReportError, ReportResult,
    SnapshotSource,
};

// =============================================================================
// Fixtures
// =============================================================================

const ROOMS_JSON: &str = r#"[
    { "id": 1, "code": "101", "title": "Deluxe 101", "type": { "name": "Deluxe" }, "price": 900000, "status": "available" },
    { "id": 2, "code": "102", "number": 102, "price": 700000 }
]"#;

const BOOKINGS_JSON: &str = r#"[
    {
        "id": 10, "code": "BK-10", "roomCode": "101", "status": "confirmed",
        "checkIn": "2024-03-01", "checkOut": "2024-03-03",
        "createdAt": "2024-02-01T00:00:00Z", "priceTotal": 1000000, "guestCount": 2
    }
]"#;

const TRANSACTIONS_JSON: &str = r#"[
    { "id": 100, "bookingId": 10, "amount": 1000000, "status": "success", "createdAt": "2024-03-01T08:00:00Z" }
]"#;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march_range() -> DateRange {
    DateRange::new(day(2024, 3, 1), day(2024, 3, 5)).unwrap()
}

fn scenario() -> (Vec<Room>, Vec<Booking>, Vec<Transaction>) {
    (
        serde_json::from_str(ROOMS_JSON).unwrap(),
        serde_json::from_str(BOOKINGS_JSON).unwrap(),
        serde_json::from_str(TRANSACTIONS_JSON).unwrap(),
    )
}

/// Writes the fixture lists into a fresh directory under the temp dir.
fn snapshot_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("frontdesk-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("rooms.json"), ROOMS_JSON).unwrap();
    std::fs::write(dir.join("bookings.json"), BOOKINGS_JSON).unwrap();
    std::fs::write(dir.join("transactions.json"), TRANSACTIONS_JSON).unwrap();
    dir
}

/// Writes `bookings` and `transactions` over the fixture lists.
fn snapshot_dir_with(name: &str, bookings: &str, transactions: &str) -> PathBuf {
    let dir = snapshot_dir(name);
    std::fs::write(dir.join("bookings.json"), bookings).unwrap();
    std::fs::write(dir.join("transactions.json"), transactions).unwrap();
    dir
}

/// Delays every fetch; optionally fails the transactions fetch.
struct SlowSource {
    inner: MemorySource,
    delay: StdDuration,
    fail_transactions: bool,
}

#[async_trait]
impl SnapshotSource for SlowSource {
    async fn fetch_rooms(&self) -> ReportResult<Vec<Room>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_rooms().await
    }

    async fn fetch_bookings(&self) -> ReportResult<Vec<Booking>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_bookings().await
    }

    async fn fetch_transactions(&self) -> ReportResult<Vec<Transaction>> {
        tokio::time::sleep(self.delay).await;
        if self.fail_transactions {
            return Err(ReportError::fetch("transactions", "gateway timeout"));
        }
        self.inner.fetch_transactions().await
    }
}

// =============================================================================
// Report Tests
// =============================================================================

#[tokio::test]
async fn test_scenario_report_from_memory() {
    let (rooms, bookings, transactions) = scenario();
    let builder = ReportBuilder::new(Arc::new(MemorySource::new(rooms, bookings, transactions)));

    let report = builder.build(&march_range()).await.unwrap();

    assert_eq!(report.rows.len(), 2);
    let row = &report.rows[0];
    assert_eq!(row.code, "101");
    assert!(row.is_booked);
    assert_eq!(row.booking_count, 1);
    assert_eq!(row.revenue, Money::from_minor(1_000_000));

    let empty = &report.rows[1];
    assert!(!empty.is_booked);
    assert_eq!(empty.revenue, Money::zero());

    assert_eq!(report.totals.booked_count, 1);
    assert_eq!(report.totals.total_bookings, 1);
    assert_eq!(report.direct_transaction_total, Money::from_minor(1_000_000));
    assert!(!report.has_discrepancy());
}

#[tokio::test]
async fn test_scenario_report_from_json_dir() {
    let dir = snapshot_dir("json-dir");
    let builder = ReportBuilder::new(Arc::new(JsonDirSource::new(&dir)));

    let report = builder.build(&march_range()).await.unwrap();

    assert_eq!(report.rows[0].room_type.as_deref(), Some("Deluxe"));
    assert_eq!(report.rows[1].code, "102");
    assert_eq!(report.totals.total_revenue, Money::from_minor(1_000_000));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rows"][0]["isBooked"], true);
    assert_eq!(json["rows"][0]["bookingCount"], 1);
    assert_eq!(json["rows"][0]["revenue"], 1_000_000);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test(start_paused = true)]
async fn test_fetches_run_concurrently() {
    let (rooms, bookings, transactions) = scenario();
    let source = SlowSource {
        inner: MemorySource::new(rooms, bookings, transactions),
        delay: StdDuration::from_millis(100),
        fail_transactions: false,
    };
    let builder = ReportBuilder::new(Arc::new(source));

    let started = tokio::time::Instant::now();
    let report = builder.build(&march_range()).await.unwrap();

    // Sequential fetches would take 300ms
    assert!(started.elapsed() < StdDuration::from_millis(200));
    assert_eq!(report.totals.booked_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_any_fetch_error_aborts_report() {
    let (rooms, bookings, transactions) = scenario();
    let source = SlowSource {
        inner: MemorySource::new(rooms, bookings, transactions),
        delay: StdDuration::from_millis(10),
        fail_transactions: true,
    };
    let builder = ReportBuilder::new(Arc::new(source));

    let err = builder.build(&march_range()).await.unwrap_err();
    assert!(matches!(err, ReportError::Source { what: "transactions", .. }));
}

#[tokio::test]
async fn test_malformed_snapshot_is_fetch_error() {
    let dir = snapshot_dir("malformed");
    std::fs::write(dir.join("bookings.json"), "{ not json").unwrap();
    let builder = ReportBuilder::new(Arc::new(JsonDirSource::new(&dir)));

    let err = builder.build(&march_range()).await.unwrap_err();
    assert!(matches!(err, ReportError::Source { what: "bookings", .. }));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_orphan_transaction_reported_as_gap() {
    let (rooms, bookings, mut transactions) = scenario();
    let mut orphan = transactions[0].clone();
    orphan.id = 101;
    orphan.booking_id = None;
    orphan.amount = Money::from_minor(250_000);
    transactions.push(orphan);

    let builder = ReportBuilder::new(Arc::new(MemorySource::new(rooms, bookings, transactions)));
    let report = builder.build(&march_range()).await.unwrap();

    assert!(report.has_discrepancy());
    assert_eq!(report.revenue_gap, Money::from_minor(250_000));
    assert_eq!(report.totals.total_revenue, Money::from_minor(1_000_000));
}

#[tokio::test]
async fn test_malformed_records_degrade_instead_of_failing() {
    let dir = snapshot_dir_with(
        "degrade",
        r#"[
            {
                "id": 10, "roomCode": "101", "status": "confirmed",
                "checkIn": "2024-03-01", "checkOut": "2024-03-03", "priceTotal": 1000000.0
            },
            { "id": 11, "roomCode": "102", "status": "awaiting_deposit",
              "checkIn": "2024-03-02", "checkOut": "2024-03-04", "createdAt": "2024-02-01T00:00:00Z" },
            { "id": 12, "roomCode": "102", "status": "confirmed" }
        ]"#,
        r#"[
            { "id": 100, "bookingId": 10, "amount": "1000000", "status": "success", "createdAt": "2024-03-01T08:00:00Z" },
            { "id": 101, "bookingId": 10, "amount": 5, "status": "failed" },
            { "id": 102, "bookingId": 10, "amount": 1000000.0, "status": "settled", "createdAt": "2024-03-01T09:00:00Z" },
            { "id": 103, "bookingId": 10, "amount": 7, "status": "success" }
        ]"#,
    );
    let source = Arc::new(JsonDirSource::new(&dir));

    let report = ReportBuilder::new(source.clone()).build(&march_range()).await.unwrap();

    // Booking 12 has no stay dates and is skipped; the others still aggregate
    assert_eq!(report.rows[0].booking_count, 1);
    assert!(report.rows[0].is_booked);
    // Unknown booking status does not occupy the room
    assert!(!report.rows[1].is_booked);
    // Success amounts count towards revenue, the unknown status does not
    assert_eq!(report.rows[0].revenue, Money::from_minor(1_000_007));
    // The undated success transaction belongs to no report day
    assert_eq!(report.direct_transaction_total, Money::from_minor(1_000_000));

    let now = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
    let flags = booking_flags(source.as_ref(), &ReportConfig::default(), now).await.unwrap();
    assert_eq!(flags.len(), 2);
    // Paid, and also lacks createdAt
    assert!(!flags[0].can_cancel);
    assert!(!flags[1].can_cancel);
    assert!(!flags[1].can_add_service);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_timestamp_stay_dates_use_property_offset() {
    let dir = snapshot_dir_with(
        "offset",
        r#"[
            {
                "id": 10, "roomCode": "101", "status": "confirmed",
                "checkIn": "2024-02-27T17:00:00.000Z", "checkOut": "2024-03-01T17:00:00.000Z",
                "createdAt": "2024-02-01T00:00:00Z"
            }
        ]"#,
        r#"[
            { "id": 100, "bookingId": 10, "amount": 1000000, "status": "success", "createdAt": "2024-03-01T18:00:00Z" }
        ]"#,
    );
    let mut config = ReportConfig::default();
    config.clock.utc_offset_minutes = 420;
    let plus7 = FixedOffset::east_opt(420 * 60).unwrap();
    let source = Arc::new(JsonDirSource::new(&dir).with_utc_offset(config.utc_offset()));

    let bookings = source.fetch_bookings().await.unwrap();
    assert_eq!(bookings[0].check_in, day(2024, 2, 28));
    assert_eq!(bookings[0].check_out, day(2024, 3, 2));

    // Checkout day is local Mar 2, inside the range
    let range = DateRange::new(day(2024, 3, 2), day(2024, 3, 5)).unwrap().with_offset(plus7);
    let report = ReportBuilder::new(source.clone()).build(&range).await.unwrap();
    assert!(report.rows[0].is_booked);
    // Paid at 01:00 local on Mar 2
    assert_eq!(report.direct_transaction_total, Money::from_minor(1_000_000));
    assert!(!report.has_discrepancy());

    // 10:00 local on Mar 2: checkout is today
    let now = Utc.with_ymd_and_hms(2024, 3, 2, 3, 0, 0).unwrap();
    let flags = booking_flags(source.as_ref(), &config, now).await.unwrap();
    assert!(flags[0].can_add_service);

    let _ = std::fs::remove_dir_all(&dir);
}

// =============================================================================
// Booking Flags
// =============================================================================

#[tokio::test]
async fn test_scenario_booking_flags() {
    let (rooms, bookings, transactions) = scenario();
    let source = MemorySource::new(rooms, bookings.clone(), transactions.clone());
    let now = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();

    let flags = booking_flags(&source, &ReportConfig::default(), now).await.unwrap();

    assert_eq!(flags.len(), 1);
    assert!(!flags[0].can_cancel);
    assert!(flags[0].can_add_service);
    assert_eq!(flags[0].service_disabled_reason, None);
    assert!(!eligibility::can_cancel(&bookings[0], Some(&transactions[0]), now));
}
