//! 随机输入下的冲突检测与选桌不变量

#![allow(clippy::unwrap_used)]

mod common;

use booking_server::ports::ReservationFilter;
use booking_server::reservations::allocator::{efficiency_score, find_optimal_table, is_peak};
use booking_server::reservations::conflict::intervals_overlap;
use chrono::{Duration, TimeZone};
use chrono_tz::Tz;
use common::*;
use proptest::prelude::*;
use shared::models::{DiningTable, DiningTableCreate, ReservationStatus, TablePosition, TableStatus};

/// Slot inside the 10:00-22:00 service on the harness day
fn arb_slot() -> impl Strategy<Value = (i64, i32)> {
    (0i64..12 * 60, 1i32..240)
}

fn arb_status() -> impl Strategy<Value = TableStatus> {
    prop::sample::select(vec![
        TableStatus::Available,
        TableStatus::Available,
        TableStatus::Reserved,
        TableStatus::Occupied,
        TableStatus::Cleaning,
        TableStatus::OutOfService,
    ])
}

fn arb_tables() -> impl Strategy<Value = Vec<DiningTable>> {
    prop::collection::vec((1i32..13, arb_status()), 0..10).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (capacity, status))| {
                let mut table = DiningTable::from_create(
                    i as i64 + 1,
                    COMPANY,
                    DiningTableCreate {
                        name: format!("T{}", i + 1),
                        capacity,
                        position: TablePosition::new(i as i32, 0),
                        is_outdoor: false,
                        floor: 0,
                    },
                );
                table.status = status;
                table
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn slot_availability_matches_interval_overlap(
        (first_offset, first_len) in arb_slot(),
        (second_offset, second_len) in arb_slot(),
    ) {
        let h = Harness::new();
        let table = h.add_table("A", 4, 0);
        let first_start = at(10, 0) + Duration::minutes(first_offset);
        let second_start = at(10, 0) + Duration::minutes(second_offset);
        h.book(table.id, first_start, first_len);

        let available = h
            .manager
            .is_slot_available(COMPANY, table.id, second_start, second_len)
            .unwrap();
        let overlaps = intervals_overlap(
            first_start,
            first_start + Duration::minutes(i64::from(first_len)),
            second_start,
            second_start + Duration::minutes(i64::from(second_len)),
        );
        prop_assert_eq!(available, !overlaps);
    }

    #[test]
    fn accepted_bookings_never_overlap(slots in prop::collection::vec(arb_slot(), 1..12)) {
        let h = Harness::new();
        let table = h.add_table("A", 4, 0);
        for (offset, len) in slots {
            let start = at(10, 0) + Duration::minutes(offset);
            let _ = h.manager.create_reservation(
                GUEST,
                COMPANY,
                request(Some(table.id), start, Some(len), 2),
            );
        }

        let booked = h
            .store
            .find_reservations(
                &ReservationFilter::company(COMPANY)
                    .with_table(table.id)
                    .with_status(ReservationStatus::Confirmed),
            )
            .unwrap();
        prop_assert!(!booked.is_empty());
        for (i, a) in booked.iter().enumerate() {
            for b in &booked[i + 1..] {
                prop_assert!(!a.overlaps(b.start_time, b.end_time()));
            }
        }
    }

    #[test]
    fn allocator_picks_first_lowest_scoring_fit(
        tables in arb_tables(),
        party in 1i32..11,
        hour in 0u32..24,
        overflow in 0i32..4,
    ) {
        let local = Tz::UTC.with_ymd_and_hms(2030, 6, 1, hour, 0, 0).unwrap();
        let peak = is_peak(local);
        let suitable: Vec<&DiningTable> = tables
            .iter()
            .filter(|t| {
                t.status == TableStatus::Available
                    && t.capacity >= party
                    && t.capacity <= party + overflow
            })
            .collect();

        match find_optimal_table(&tables, party, local, overflow) {
            None => prop_assert!(suitable.is_empty()),
            Some(choice) => {
                prop_assert_eq!(choice.table.status, TableStatus::Available);
                prop_assert!(choice.table.capacity >= party);
                prop_assert!(choice.table.capacity <= party + overflow);
                let best = suitable
                    .iter()
                    .map(|t| efficiency_score(t.capacity, party, peak))
                    .min()
                    .unwrap();
                prop_assert_eq!(choice.score, best);
                let first = suitable
                    .iter()
                    .find(|t| efficiency_score(t.capacity, party, peak) == best)
                    .unwrap();
                prop_assert_eq!(choice.table.id, first.id);
            }
        }
    }
}
