//! Time-slot rules
//!
//! Pure functions; "local" always means the business time zone in
//! [`BookingRules`].

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use super::BookingRules;
use crate::core::{BookingError, BookingResult};
use crate::utils::time::local_hour;

/// Longest bookable slot, in minutes
pub const MAX_DURATION_MINUTES: i32 = 12 * 60;

/// A start time is bookable if it is not in the past and not before opening.
pub fn is_valid_reservation_time(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    rules: &BookingRules,
) -> bool {
    if start < now {
        return false;
    }
    local_hour(start, rules.timezone) >= rules.opening_hour
}

/// Default slot length by local start hour
///
/// | 本地开始时间 | 时长 |
/// |---|---|
/// | < 11:00 | 120 |
/// | 11:00 - 14:59 | 180 |
/// | 15:00 - 16:59 | 120 |
/// | >= 17:00 | 360 |
pub fn default_duration(local_start: DateTime<Tz>) -> i32 {
    match local_start.hour() {
        0..=10 => 120,
        11..=14 => 180,
        15..=16 => 120,
        _ => 360,
    }
}

pub fn validate_duration(minutes: i32) -> BookingResult<()> {
    if !(1..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(BookingError::validation(format!(
            "Duration must be between 1 and {} minutes, got {}",
            MAX_DURATION_MINUTES, minutes
        )));
    }
    Ok(())
}

pub fn validate_party_size(party_size: i32) -> BookingResult<()> {
    if party_size < 1 {
        return Err(BookingError::validation(format!(
            "Party size must be at least 1, got {}",
            party_size
        )));
    }
    Ok(())
}
