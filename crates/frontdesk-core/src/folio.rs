//! # Folio
//!
//! Additional service lines attached to a stay, and the guest-facing total.
//!
//! ```text
//! guest charge = booking.price_total + Σ line.total   (lines of that booking)
//! ```
//!
//! Lines can be attached and removed only while
//! [`can_add_service`](crate::eligibility::can_add_service) holds.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::eligibility::{can_add_service, service_block_reason};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{AdditionalService, AdditionalServiceLine, Booking};
use crate::validation::{validate_service_quantity, validate_unit_price};

/// Creates a new line for `service` on `booking`, freezing the catalog price.
///
/// ## Errors
/// - `CoreError::Validation` for a bad quantity or negative price
/// - `CoreError::ServiceNotAllowed` when the booking is not eligible
pub fn attach_service(
    booking: &Booking,
    service: &AdditionalService,
    quantity: i64,
    today: NaiveDate,
) -> CoreResult<AdditionalServiceLine> {
    validate_service_quantity(quantity)?;
    validate_unit_price(service.price)?;
    ensure_eligible(booking, today)?;

    Ok(AdditionalServiceLine {
        id: Uuid::new_v4().to_string(),
        booking_id: booking.id,
        service_id: service.id,
        quantity,
        unit_price: service.price,
        total: service.price.multiply_quantity(quantity),
    })
}

/// Removes the line with `line_id` and returns it.
pub fn remove_service_line(
    booking: &Booking,
    lines: &mut Vec<AdditionalServiceLine>,
    line_id: &str,
    today: NaiveDate,
) -> CoreResult<AdditionalServiceLine> {
    ensure_eligible(booking, today)?;

    let index = lines
        .iter()
        .position(|line| line.id == line_id && line.booking_id == booking.id)
        .ok_or_else(|| CoreError::ServiceLineNotFound(line_id.to_string()))?;

    Ok(lines.remove(index))
}

/// Room price plus every service line that belongs to this booking.
pub fn guest_charge_total(booking: &Booking, lines: &[AdditionalServiceLine]) -> Money {
    booking.price_total
        + lines
            .iter()
            .filter(|line| line.booking_id == booking.id)
            .map(|line| line.total)
            .sum::<Money>()
}

fn ensure_eligible(booking: &Booking, today: NaiveDate) -> CoreResult<()> {
    if can_add_service(booking, today) {
        return Ok(());
    }

    let reason = service_block_reason(booking, None, today)
        .map(|r| r.message().to_string())
        .unwrap_or_default();

    Err(CoreError::ServiceNotAllowed {
        booking_id: booking.id,
        reason,
    })
}
