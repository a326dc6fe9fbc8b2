//! 并发写入：同一桌同一时段只能有一个赢家

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use booking_server::BookingError;
use booking_server::core::ConflictKind;
use booking_server::ports::ReservationFilter;
use common::*;
use shared::models::TablePosition;

const THREADS: usize = 8;

#[test]
fn test_concurrent_overlapping_creates_have_one_winner() {
    for round in 0..20 {
        let h = Arc::new(Harness::new());
        let table = h.add_table("T1", 4, 0);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let h = h.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    // 每个线程的时段都互相重叠
                    let start = at(19, 0) + chrono::Duration::minutes(i as i64);
                    h.manager.create_reservation(
                        GUEST,
                        COMPANY,
                        request(Some(table.id), start, Some(90), 2),
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "round {round}: {results:?}");
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(
                err,
                BookingError::Conflict {
                    kind: ConflictKind::Slot,
                    ..
                }
            ));
        }
        let stored = h
            .manager
            .list_reservations(COMPANY, ReservationFilter::default().with_table(table.id))
            .unwrap();
        assert_eq!(stored.len(), 1);
    }
}

#[test]
fn test_concurrent_table_creates_at_same_position() {
    let h = Arc::new(Harness::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let h = h.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let mut payload = create_payload(&format!("T{i}"), 4, 0);
                payload.position = TablePosition::new(5, 5);
                h.manager.create_table(MANAGER, COMPANY, payload)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        BookingError::Conflict {
            kind: ConflictKind::Position,
            ..
        }
    )));
    assert_eq!(h.manager.list_tables(COMPANY).unwrap().len(), 1);
}

#[test]
fn test_concurrent_lifecycle_writes_never_lose_updates() {
    let h = Arc::new(Harness::new());
    let table = h.add_table("T1", 4, 0);
    let r = h.book(table.id, at(19, 0), 60);
    h.clock.set(at(19, 20));

    // 一半线程到店，一半线程标记爽约：只有一个转换能落库
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let h = h.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    h.manager.check_in(WAITER, COMPANY, r.id)
                } else {
                    h.manager.mark_no_show(WAITER, COMPANY, r.id)
                }
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(
            matches!(err, BookingError::State(_) | BookingError::Conflict { .. }),
            "unexpected {err:?}"
        );
    }
    assert_eq!(h.reservation(r.id).status, winners[0].status);
}
