//! # Snapshot Sources
//!
//! Where rooms, bookings and transactions come from. The report only needs
//! three independent list fetches, so any backend (JSON export, in-memory
//! fixture, HTTP API) fits behind [`SnapshotSource`].
//!
//! ## JSON Directory Layout
//! ```text
//! snapshot/
//! ├── rooms.json          [Room, ...]
//! ├── bookings.json       [Booking, ...]
//! └── transactions.json   [Transaction, ...]
//! ```
//!
//! Each list must be a JSON array. Records are decoded one by one: a record
//! that cannot be decoded is logged and skipped, and the rest of the list is
//! still returned. Timestamp stay dates are moved to the property's local day
//! before decoding.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use frontdesk_core::types::stay_date;
use frontdesk_core::{Booking, Room, Transaction};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ReportError, ReportResult};

pub const ROOMS_FILE: &str = "rooms.json";
pub const BOOKINGS_FILE: &str = "bookings.json";
pub const TRANSACTIONS_FILE: &str = "transactions.json";

// =============================================================================
// Trait
// =============================================================================

/// Provides the three lists a report is built from.
///
/// Fetches are independent of each other and may run concurrently.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_rooms(&self) -> ReportResult<Vec<Room>>;

    async fn fetch_bookings(&self) -> ReportResult<Vec<Booking>>;

    async fn fetch_transactions(&self) -> ReportResult<Vec<Transaction>>;
}

// =============================================================================
// In-Memory Source
// =============================================================================

/// Fixed lists, handed out as clones.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    transactions: Vec<Transaction>,
}

impl MemorySource {
    pub fn new(rooms: Vec<Room>, bookings: Vec<Booking>, transactions: Vec<Transaction>) -> Self {
        Self {
            rooms,
            bookings,
            transactions,
        }
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn fetch_rooms(&self) -> ReportResult<Vec<Room>> {
        Ok(self.rooms.clone())
    }

    async fn fetch_bookings(&self) -> ReportResult<Vec<Booking>> {
        Ok(self.bookings.clone())
    }

    async fn fetch_transactions(&self) -> ReportResult<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }
}

// =============================================================================
// JSON Directory Source
// =============================================================================

/// Booking fields holding stay dates.
const STAY_DATE_FIELDS: [&str; 2] = ["checkIn", "checkOut"];

/// Reads one JSON array per list from a snapshot directory.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
    offset: FixedOffset,
}

impl JsonDirSource {
    /// Source reading timestamp stay dates as UTC days.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            offset: Utc.fix(),
        }
    }

    /// Reads timestamp stay dates as local days at `offset`.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_records(&self, what: &'static str, file: &str) -> ReportResult<Vec<Value>> {
        let path = self.dir.join(file);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ReportError::fetch(what, format!("{}: {e}", path.display())))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ReportError::fetch(what, format!("{}: {e}", path.display())))
    }

    async fn read_list<T: DeserializeOwned>(&self, what: &'static str, file: &str) -> ReportResult<Vec<T>> {
        let records = self.read_records(what, file).await?;
        Ok(decode_records(what, records))
    }
}

/// Decodes every record it can. Undecodable records are skipped with a warning.
pub fn decode_records<T: DeserializeOwned>(what: &'static str, records: Vec<Value>) -> Vec<T> {
    let total = records.len();
    let items: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let id = record.get("id").cloned().unwrap_or(Value::Null);
            serde_json::from_value(record)
                .map_err(|e| warn!(what, index, %id, error = %e, "Skipping malformed snapshot record"))
                .ok()
        })
        .collect();

    debug!(what, count = items.len(), skipped = total - items.len(), "Decoded snapshot list");
    items
}

/// Rewrites RFC 3339 stay dates on a booking record to `YYYY-MM-DD` local days.
pub fn localize_stay_dates(record: &mut Value, offset: FixedOffset) {
    for field in STAY_DATE_FIELDS {
        if let Some(slot) = record.get_mut(field) {
            let local = slot.as_str().and_then(|raw| stay_date::parse_in(raw, offset));
            if let Some(day) = local {
                *slot = Value::String(stay_date::format(day));
            }
        }
    }
}

#[async_trait]
impl SnapshotSource for JsonDirSource {
    async fn fetch_rooms(&self) -> ReportResult<Vec<Room>> {
        self.read_list("rooms", ROOMS_FILE).await
    }

    async fn fetch_bookings(&self) -> ReportResult<Vec<Booking>> {
        let mut records = self.read_records("bookings", BOOKINGS_FILE).await?;
        for record in &mut records {
            localize_stay_dates(record, self.offset);
        }
        Ok(decode_records("bookings", records))
    }

    async fn fetch_transactions(&self) -> ReportResult<Vec<Transaction>> {
        self.read_list("transactions", TRANSACTIONS_FILE).await
    }
}
