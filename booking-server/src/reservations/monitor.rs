//! 预订巡检调度器
//!
//! 两个独立的定时任务，注册为 `TaskKind::Periodic`：
//!
//! - 迟到提醒：已确认、开始时间超过宽限期仍未到店的预订，每单只提醒一次
//! - 到店前锁桌：即将开始的确认预订把桌台置为 RESERVED，随后释放失效的锁桌
//!
//! 单条失败只记 warn 并计数，不会中断整轮巡检。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use shared::message::{NotificationCategory, NotificationPayload};
use shared::models::{Reservation, ReservationId, TableStatus};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::ReservationsManager;
use crate::core::{BackgroundTasks, TaskKind};
use crate::ports::TableFilter;

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Items looked at
    pub scanned: usize,
    /// Items acted on
    pub applied: usize,
    pub failed: usize,
}

/// 预订巡检器
pub struct ReservationMonitor {
    manager: Arc<ReservationsManager>,
    interval: Duration,
    /// 已提醒过的迟到预订
    reported_late: Mutex<HashSet<ReservationId>>,
}

impl ReservationMonitor {
    pub fn new(manager: Arc<ReservationsManager>, interval: Duration) -> Self {
        Self {
            manager,
            interval,
            reported_late: Mutex::new(HashSet::new()),
        }
    }

    /// Spawn both loops on the shared shutdown token
    pub fn register(self: &Arc<Self>, tasks: &mut BackgroundTasks) {
        let monitor = self.clone();
        let token = tasks.shutdown_token();
        tasks.spawn("late_arrival_sweep", TaskKind::Periodic, async move {
            monitor.run_late_arrivals(token).await;
        });

        let monitor = self.clone();
        let token = tasks.shutdown_token();
        tasks.spawn("table_hold_sweep", TaskKind::Periodic, async move {
            monitor.run_table_holds(token).await;
        });
    }

    /// 迟到提醒主循环
    pub async fn run_late_arrivals(&self, shutdown: CancellationToken) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Late arrival monitor started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.sweep_late_arrivals();
                    if report.applied > 0 {
                        tracing::info!(?report, "Late arrival sweep done");
                    }
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("Late arrival monitor received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 锁桌主循环：先锁即将到店的桌，再释放失效的锁
    pub async fn run_table_holds(&self, shutdown: CancellationToken) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Table hold monitor started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let holds = self.sweep_upcoming();
                    let releases = self.release_stale_holds();
                    if holds.applied + releases.applied + holds.failed + releases.failed > 0 {
                        tracing::info!(?holds, ?releases, "Table hold sweep done");
                    }
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("Table hold monitor received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Notify each company once per late reservation. Never changes state.
    pub fn sweep_late_arrivals(&self) -> SweepReport {
        let late = match self.manager.late_arrivals() {
            Ok(late) => late,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load late arrivals");
                return SweepReport {
                    failed: 1,
                    ..Default::default()
                };
            }
        };

        let mut report = SweepReport {
            scanned: late.len(),
            ..Default::default()
        };
        let now = self.manager.now();
        let mut reported = self.reported_late.lock();
        // 已到店/取消/爽约的预订离开迟到集合后就忘掉
        let current: HashSet<ReservationId> = late.iter().map(|r| r.id).collect();
        reported.retain(|id| current.contains(id));

        for reservation in &late {
            if !reported.insert(reservation.id) {
                continue;
            }
            let minutes_late = (now - reservation.start_time).num_minutes();
            tracing::info!(
                reservation_id = reservation.id,
                company_id = reservation.company_id,
                minutes_late,
                "Late arrival detected"
            );
            self.manager.notify_company(
                reservation.company_id,
                late_arrival_notice(reservation, minutes_late),
            );
            report.applied += 1;
        }
        report
    }

    /// Hold tables for CONFIRMED bookings starting within the lookahead
    pub fn sweep_upcoming(&self) -> SweepReport {
        let now = self.manager.now();
        let rules = self.manager.rules();
        let upcoming = match self
            .manager
            .confirmed_starting_between(now, now + rules.upcoming_lookahead())
        {
            Ok(upcoming) => upcoming,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load upcoming reservations");
                return SweepReport {
                    failed: 1,
                    ..Default::default()
                };
            }
        };

        let mut report = SweepReport {
            scanned: upcoming.len(),
            ..Default::default()
        };
        for reservation in &upcoming {
            match self.manager.hold_table_for_arrival(reservation) {
                Ok(true) => {
                    report.applied += 1;
                    let minutes = (reservation.start_time - now).num_minutes();
                    self.manager.notify_company(
                        reservation.company_id,
                        upcoming_notice(reservation, minutes),
                    );
                }
                Ok(false) => {}
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        reservation_id = reservation.id,
                        table_id = ?reservation.table_id,
                        error = %e,
                        "Failed to hold table"
                    );
                }
            }
        }
        report
    }

    /// Re-project every RESERVED table; holds without a live booking go back to AVAILABLE
    pub fn release_stale_holds(&self) -> SweepReport {
        let held = match self
            .manager
            .store()
            .find_tables(&TableFilter::default().with_status(TableStatus::Reserved))
        {
            Ok(held) => held,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load held tables");
                return SweepReport {
                    failed: 1,
                    ..Default::default()
                };
            }
        };

        let mut report = SweepReport {
            scanned: held.len(),
            ..Default::default()
        };
        for table in &held {
            match self.manager.refresh_table_status(table.id) {
                Ok(Some(updated)) => {
                    report.applied += 1;
                    tracing::info!(
                        table_id = table.id,
                        status = %updated.status,
                        "Stale table hold released"
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        table_id = table.id,
                        error = %e,
                        "Failed to re-project held table"
                    );
                }
            }
        }
        report
    }
}

fn late_arrival_notice(reservation: &Reservation, minutes_late: i64) -> NotificationPayload {
    NotificationPayload::warning(
        NotificationCategory::Reservation,
        "Late arrival",
        format!(
            "Party of {} is {} minutes late",
            reservation.party_size, minutes_late
        ),
    )
    .with_data(json!({
        "reservation_id": reservation.id,
        "table_id": reservation.table_id,
        "start_time": reservation.start_time,
        "minutes_late": minutes_late,
    }))
}

fn upcoming_notice(reservation: &Reservation, minutes_until: i64) -> NotificationPayload {
    NotificationPayload::info(
        NotificationCategory::Reservation,
        "Upcoming reservation",
        format!(
            "Party of {} arrives in {} minutes",
            reservation.party_size, minutes_until
        ),
    )
    .with_data(json!({
        "reservation_id": reservation.id,
        "table_id": reservation.table_id,
        "start_time": reservation.start_time,
    }))
}
