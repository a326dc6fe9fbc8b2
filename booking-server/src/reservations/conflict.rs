//! Conflict detection
//!
//! Ground truth is the set of blocking reservation intervals on a table.
//! Table status only decides whether a table is bookable at all.

use chrono::{DateTime, Duration, Utc};
use shared::models::{CompanyId, DiningTable, ReservationId, TableId};

use super::BookingRules;
use super::time_slot::is_valid_reservation_time;
use crate::core::BookingResult;
use crate::ports::PersistencePort;

/// Half-open `[a_start, a_end)` ∩ `[b_start, b_end)` ≠ ∅
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn has_overlap(
    store: &dyn PersistencePort,
    table_id: TableId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<ReservationId>,
) -> BookingResult<bool> {
    Ok(store.has_overlap(table_id, start, end, exclude)?)
}

/// Whether `table` can take `[start, start + duration)`.
///
/// Checks tenant, manual status, booking time and overlap. `table` must be
/// the stored row; a table from another company is never available.
#[allow(clippy::too_many_arguments)]
pub fn is_table_free(
    store: &dyn PersistencePort,
    table: &DiningTable,
    company_id: CompanyId,
    start: DateTime<Utc>,
    duration_minutes: i32,
    exclude: Option<ReservationId>,
    now: DateTime<Utc>,
    rules: &BookingRules,
) -> BookingResult<bool> {
    if table.company_id != company_id || !table.status.accepts_bookings() {
        return Ok(false);
    }
    // 空区间或倒置区间和任何预订都"不重叠"
    if duration_minutes < 1 {
        return Ok(false);
    }
    if !is_valid_reservation_time(start, now, rules) {
        return Ok(false);
    }
    let end = start + Duration::minutes(i64::from(duration_minutes));
    Ok(!has_overlap(store, table.id, start, end, exclude)?)
}

/// Slot availability by id. Unknown tables are unavailable.
pub fn is_slot_available(
    store: &dyn PersistencePort,
    company_id: CompanyId,
    table_id: TableId,
    start: DateTime<Utc>,
    duration_minutes: i32,
    now: DateTime<Utc>,
    rules: &BookingRules,
) -> BookingResult<bool> {
    match store.find_table(table_id)? {
        Some(table) => is_table_free(
            store,
            &table,
            company_id,
            start,
            duration_minutes,
            None,
            now,
            rules,
        ),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use chrono::TimeZone;
    use shared::models::{
        DiningTableCreate, Reservation, ReservationDraft, TablePosition, TableStatus,
    };

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, hour, 0, 0).unwrap()
    }

    fn setup() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_table(DiningTable::from_create(
                1,
                10,
                DiningTableCreate {
                    name: "T1".into(),
                    capacity: 4,
                    position: TablePosition::new(0, 0),
                    is_outdoor: false,
                    floor: 0,
                },
            ))
            .unwrap();
        store
            .insert_reservation(Reservation::from_draft(
                100,
                ReservationDraft {
                    company_id: 10,
                    customer_id: 7,
                    table_id: Some(1),
                    start_time: at(19),
                    duration_minutes: 120,
                    party_size: 2,
                    note: None,
                },
                at(8),
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_intervals_overlap_is_half_open() {
        assert!(intervals_overlap(at(10), at(12), at(11), at(13)));
        assert!(!intervals_overlap(at(10), at(12), at(12), at(13)));
        assert!(intervals_overlap(at(10), at(14), at(11), at(12)));
    }

    #[test]
    fn test_overlap_not_start_equality() {
        let store = setup();
        let rules = BookingRules::default();
        let now = at(8);
        // 20:00 开始和 19:00-21:00 重叠
        assert!(!is_slot_available(&store, 10, 1, at(20), 60, now, &rules).unwrap());
        assert!(!is_slot_available(&store, 10, 1, at(18), 90, now, &rules).unwrap());
        assert!(is_slot_available(&store, 10, 1, at(21), 60, now, &rules).unwrap());
        assert!(is_slot_available(&store, 10, 1, at(17), 120, now, &rules).unwrap());
    }

    #[test]
    fn test_fails_closed() {
        let store = setup();
        let rules = BookingRules::default();
        let now = at(8);
        // 未知桌台 / 其他公司
        assert!(!is_slot_available(&store, 10, 99, at(12), 60, now, &rules).unwrap());
        assert!(!is_slot_available(&store, 11, 1, at(12), 60, now, &rules).unwrap());
        // 过去的时间
        assert!(!is_slot_available(&store, 10, 1, at(7), 60, now, &rules).unwrap());
    }

    #[test]
    fn test_non_positive_duration_is_never_free() {
        let store = setup();
        let rules = BookingRules::default();
        let now = at(8);
        assert!(!is_slot_available(&store, 10, 1, at(19), 0, now, &rules).unwrap());
        assert!(!is_slot_available(&store, 10, 1, at(20), -60, now, &rules).unwrap());
        // 空闲时段也一样
        assert!(!is_slot_available(&store, 10, 1, at(12), 0, now, &rules).unwrap());
    }

    #[test]
    fn test_manual_status_blocks_bookings() {
        let store = setup();
        let rules = BookingRules::default();
        let mut table = store.find_table(1).unwrap().unwrap();
        table.status = TableStatus::OutOfService;
        assert!(!is_table_free(&store, &table, 10, at(12), 60, None, at(8), &rules).unwrap());
        table.status = TableStatus::Occupied;
        assert!(is_table_free(&store, &table, 10, at(12), 60, None, at(8), &rules).unwrap());
    }
}
