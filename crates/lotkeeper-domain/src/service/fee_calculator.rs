//! Parking fee calculation
//!
//! Billing is per started hour with a minimum of one hour:
//!
//! ```text
//! billed = max(ceil(elapsed_seconds / 3600), 1)
//! fee    = first_hour                                  if billed == 1
//!        = first_hour + (billed - 1) * extra_hour      otherwise
//! ```
//!
//! A stay of zero or negative length (exit before entry after a clock change)
//! is billed as one hour.

use chrono::{DateTime, Utc};
use lotkeeper_types::VehicleType;

use crate::model::TariffTable;

/// Number of hours billed for a stay, never less than 1
pub fn billed_hours(entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> u32 {
    let elapsed_hours = (exit_time - entry_time).num_seconds() as f64 / 3600.0;
    let rounded = elapsed_hours.ceil();
    if rounded <= 1.0 {
        1
    } else {
        rounded.min(u32::MAX as f64) as u32
    }
}

/// Amount due for a stay
pub fn compute_fee(
    tariffs: &TariffTable,
    vehicle_type: VehicleType,
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
) -> f64 {
    let rate = tariffs.get(vehicle_type);
    let hours = billed_hours(entry_time, exit_time);
    if hours <= 1 {
        return rate.first_hour;
    }
    rate.first_hour + f64::from(hours - 1) * rate.extra_hour
}
