//! Action flags for the booking list screen.
//!
//! Pairs every booking with its transaction and evaluates both predicates
//! against the property's local "today".

use chrono::{DateTime, Utc};
use frontdesk_core::eligibility::{self, EligibilityFlags};
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::ReportResult;
use crate::source::SnapshotSource;

/// Flags for every booking the source knows about.
pub async fn booking_flags(
    source: &dyn SnapshotSource,
    config: &ReportConfig,
    now: DateTime<Utc>,
) -> ReportResult<Vec<EligibilityFlags>> {
    let (bookings, transactions) =
        tokio::try_join!(source.fetch_bookings(), source.fetch_transactions())?;

    let today = config.today(now);
    let flags = eligibility::evaluate_all(&bookings, &transactions, now, today);

    debug!(
        bookings = flags.len(),
        cancellable = flags.iter().filter(|f| f.can_cancel).count(),
        serviceable = flags.iter().filter(|f| f.can_add_service).count(),
        %today,
        "Evaluated booking flags"
    );

    Ok(flags)
}
