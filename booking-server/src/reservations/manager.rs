//! ReservationsManager - 预订生命周期
//!
//! 所有会改变预订或桌台状态的操作都在这里（桌台管理见 `tables.rs`，
//! 只读查询见 `queries.rs`）。
//!
//! # 写入流程
//!
//! ```text
//! operation(actor, company_id, ...)
//!     ├─ 1. 加载实体，校验租户
//!     ├─ 2. 校验操作人角色
//!     ├─ 3. 状态机校验 (ReservationStatus::can_transition_to)
//!     ├─ 4. 业务校验 (时间、容量、时段冲突)
//!     ├─ 5. 重新投影桌台状态
//!     ├─ 6. PersistencePort::commit (版本 CAS + 原子时段检查)
//!     └─ 7. NotificationPort 推送
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::message::NotificationPayload;
use shared::models::{
    Company, CompanyId, DiningTable, Reservation, ReservationDraft, ReservationId,
    ReservationStatus, TableId, TableStatus, User, UserId,
};
use shared::util::snowflake_id;

use super::BookingRules;
use super::allocator;
use super::conflict::is_table_free;
use super::time_slot::{
    MAX_DURATION_MINUTES, default_duration, is_valid_reservation_time, validate_duration,
    validate_party_size,
};
use crate::core::{BookingError, BookingResult, Clock, ConflictKind, Resource};
use crate::ports::{
    DirectoryPort, NotificationPort, PersistencePort, ReservationFilter, TableFilter, WriteSet,
};
use crate::utils::time::to_local;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Booking request
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub customer_id: UserId,
    /// None lets the allocator pick
    pub table_id: Option<TableId>,
    pub start_time: DateTime<Utc>,
    /// None uses the default for the local start hour
    pub duration_minutes: Option<i32>,
    pub party_size: i32,
    pub note: Option<String>,
}

/// Move a booking. Absent fields keep their current value.
#[derive(Debug, Clone)]
pub struct RescheduleReservation {
    pub start_time: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub party_size: Option<i32>,
}

/// Table status derived from the reservations on the table
///
/// Manual states are kept; any ARRIVED party → OCCUPIED; a CONFIRMED booking
/// inside the hold window and not yet over → RESERVED; otherwise AVAILABLE.
pub fn project_table_status<'a, I>(
    current: TableStatus,
    reservations: I,
    now: DateTime<Utc>,
    rules: &BookingRules,
) -> TableStatus
where
    I: IntoIterator<Item = &'a Reservation>,
{
    if current.is_manual() {
        return current;
    }
    let hold_until = now + rules.hold_window();
    let mut held = false;
    for r in reservations {
        match r.status {
            ReservationStatus::Arrived => return TableStatus::Occupied,
            ReservationStatus::Confirmed if r.start_time <= hold_until && r.end_time() > now => {
                held = true;
            }
            _ => {}
        }
    }
    if held {
        TableStatus::Reserved
    } else {
        TableStatus::Available
    }
}

/// 预订生命周期管理器
///
/// `Send + Sync`，通过 `Arc` 在请求处理与巡检任务之间共享。
pub struct ReservationsManager {
    pub(super) store: Arc<dyn PersistencePort>,
    pub(super) directory: Arc<dyn DirectoryPort>,
    pub(super) notifier: Arc<dyn NotificationPort>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) rules: BookingRules,
}

impl std::fmt::Debug for ReservationsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationsManager")
            .field("store", &"<PersistencePort>")
            .field("directory", &"<DirectoryPort>")
            .field("notifier", &"<NotificationPort>")
            .field("rules", &self.rules)
            .finish()
    }
}

impl ReservationsManager {
    pub fn new(
        store: Arc<dyn PersistencePort>,
        directory: Arc<dyn DirectoryPort>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn Clock>,
        rules: BookingRules,
    ) -> Self {
        Self {
            store,
            directory,
            notifier,
            clock,
            rules,
        }
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn store(&self) -> &dyn PersistencePort {
        self.store.as_ref()
    }

    // ========== Lifecycle ==========

    /// Book a table. CONFIRMED when a table is given or allocated, PENDING otherwise.
    pub fn create_reservation(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        req: CreateReservation,
    ) -> BookingResult<Reservation> {
        validate_party_size(req.party_size)?;
        validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
        if let Some(minutes) = req.duration_minutes {
            validate_duration(minutes)?;
        }

        self.load_company(company_id)?;
        let actor = self.load_user(actor_id)?;
        if actor.id != req.customer_id {
            self.load_user(req.customer_id)?;
            if !actor.is_staff_of(company_id) {
                return Err(BookingError::unauthorized(
                    "Only the customer or company staff can book",
                ));
            }
        }

        let now = self.clock.now();
        if !is_valid_reservation_time(req.start_time, now, &self.rules) {
            return Err(BookingError::validation(format!(
                "Reservation time {} is in the past or before opening hour",
                req.start_time
            )));
        }
        let local_start = to_local(req.start_time, self.rules.timezone);
        let duration = req
            .duration_minutes
            .unwrap_or_else(|| default_duration(local_start));

        let table_id = match req.table_id {
            Some(table_id) => {
                let table = self.load_table(company_id, table_id)?;
                self.ensure_table_bookable(&table, req.party_size, req.start_time, duration, None)?;
                Some(table.id)
            }
            None => {
                let free = self.free_tables(company_id, req.start_time, duration, None)?;
                let choice = allocator::find_optimal_table(
                    &free,
                    req.party_size,
                    local_start,
                    self.rules.max_capacity_overflow,
                );
                if let Some(choice) = &choice {
                    tracing::debug!(
                        table_id = choice.table.id,
                        score = choice.score,
                        party_size = req.party_size,
                        "Allocator picked table"
                    );
                } else {
                    tracing::debug!(
                        company_id,
                        party_size = req.party_size,
                        "No table fits, booking stays pending"
                    );
                }
                choice.map(|c| c.table.id)
            }
        };

        let draft = ReservationDraft {
            company_id,
            customer_id: req.customer_id,
            table_id,
            start_time: req.start_time,
            duration_minutes: duration,
            party_size: req.party_size,
            note: req.note,
        };
        let reservation = self
            .store
            .insert_reservation(Reservation::from_draft(snowflake_id(), draft, now))?;

        tracing::info!(
            reservation_id = reservation.id,
            company_id,
            table_id = ?reservation.table_id,
            status = %reservation.status,
            "Reservation created"
        );
        self.notifier.notify_reservation_changed(&reservation);

        if let Some(table_id) = reservation.table_id {
            // 预订已落库，桌台投影失败交给巡检修正
            if let Err(e) = self.refresh_table_status(table_id) {
                tracing::warn!(table_id, error = %e, "Failed to project table after booking");
            }
        }
        Ok(reservation)
    }

    /// Give a PENDING booking a table (staff)
    pub fn assign_table(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        reservation_id: ReservationId,
        table_id: TableId,
    ) -> BookingResult<Reservation> {
        let mut reservation = self.load_reservation(company_id, reservation_id)?;
        self.require_staff(actor_id, company_id)?;
        Self::ensure_transition(&reservation, ReservationStatus::Confirmed)?;
        if reservation.status != ReservationStatus::Pending {
            return Err(BookingError::state(format!(
                "Reservation {} already has a table",
                reservation.id
            )));
        }

        let table = self.load_table(company_id, table_id)?;
        self.ensure_table_bookable(
            &table,
            reservation.party_size,
            reservation.start_time,
            reservation.duration_minutes,
            Some(reservation.id),
        )?;

        let now = self.clock.now();
        reservation.table_id = Some(table.id);
        reservation.transition_to(ReservationStatus::Confirmed, now)?;
        let reservation = self.commit_with_projection(reservation, true)?;
        tracing::info!(reservation_id, table_id, "Table assigned");
        Ok(reservation)
    }

    /// Move a PENDING/CONFIRMED booking (customer or staff)
    pub fn reschedule(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        reservation_id: ReservationId,
        req: RescheduleReservation,
    ) -> BookingResult<Reservation> {
        let mut reservation = self.load_reservation(company_id, reservation_id)?;
        let actor = self.load_user(actor_id)?;
        if actor.id != reservation.customer_id && !actor.is_staff_of(company_id) {
            return Err(BookingError::unauthorized(
                "Only the customer or company staff can reschedule",
            ));
        }
        if !matches!(
            reservation.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            return Err(BookingError::state(format!(
                "Cannot reschedule a {} reservation",
                reservation.status
            )));
        }

        let duration = req.duration_minutes.unwrap_or(reservation.duration_minutes);
        validate_duration(duration)?;
        let party_size = req.party_size.unwrap_or(reservation.party_size);
        validate_party_size(party_size)?;

        let now = self.clock.now();
        if !is_valid_reservation_time(req.start_time, now, &self.rules) {
            return Err(BookingError::validation(format!(
                "Reservation time {} is in the past or before opening hour",
                req.start_time
            )));
        }
        if let Some(table_id) = reservation.table_id {
            let table = self.load_table(company_id, table_id)?;
            self.ensure_table_bookable(
                &table,
                party_size,
                req.start_time,
                duration,
                Some(reservation.id),
            )?;
        }

        reservation.reschedule(req.start_time, duration);
        reservation.party_size = party_size;
        reservation.updated_at = now;
        let reservation = self.commit_with_projection(reservation, true)?;
        tracing::info!(
            reservation_id,
            start = %reservation.start_time,
            duration,
            "Reservation rescheduled"
        );
        Ok(reservation)
    }

    /// CONFIRMED → ARRIVED; the table becomes OCCUPIED (staff)
    pub fn check_in(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        let mut reservation = self.load_reservation(company_id, reservation_id)?;
        self.require_staff(actor_id, company_id)?;
        Self::ensure_transition(&reservation, ReservationStatus::Arrived)?;

        let Some(table_id) = reservation.table_id else {
            return Err(BookingError::state(format!(
                "Reservation {} has no table assigned",
                reservation.id
            )));
        };
        let table = self.load_table(company_id, table_id)?;
        if table.status == TableStatus::Occupied {
            return Err(BookingError::conflict(
                ConflictKind::TableBusy,
                format!("Table {} is {}", table.name, table.status),
            ));
        }
        if table.status.is_manual() {
            return Err(BookingError::conflict(
                ConflictKind::TableUnavailable,
                format!("Table {} is {}", table.name, table.status),
            ));
        }

        reservation.transition_to(ReservationStatus::Arrived, self.clock.now())?;
        let reservation = self.commit_with_projection(reservation, false)?;
        tracing::info!(reservation_id, table_id, "Guests checked in");
        Ok(reservation)
    }

    /// ARRIVED → COMPLETED; the table is released (staff)
    pub fn check_out(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        let mut reservation = self.load_reservation(company_id, reservation_id)?;
        self.require_staff(actor_id, company_id)?;
        reservation.transition_to(ReservationStatus::Completed, self.clock.now())?;
        let reservation = self.commit_with_projection(reservation, false)?;
        tracing::info!(reservation_id, table_id = ?reservation.table_id, "Guests checked out");
        Ok(reservation)
    }

    /// PENDING/CONFIRMED → CANCELLED, only by the customer and only before start
    pub fn cancel(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        let mut reservation = self.load_reservation(company_id, reservation_id)?;
        if actor_id != reservation.customer_id {
            return Err(BookingError::unauthorized(
                "Only the customer can cancel a reservation",
            ));
        }
        Self::ensure_transition(&reservation, ReservationStatus::Cancelled)?;

        let now = self.clock.now();
        if now >= reservation.start_time {
            return Err(BookingError::state(format!(
                "Reservation {} has already started",
                reservation.id
            )));
        }

        reservation.transition_to(ReservationStatus::Cancelled, now)?;
        let reservation = self.commit_with_projection(reservation, false)?;
        tracing::info!(reservation_id, "Reservation cancelled");
        Ok(reservation)
    }

    /// CONFIRMED → NO_SHOW once the grace period after start has passed (staff)
    pub fn mark_no_show(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        let mut reservation = self.load_reservation(company_id, reservation_id)?;
        self.require_staff(actor_id, company_id)?;
        Self::ensure_transition(&reservation, ReservationStatus::NoShow)?;

        let now = self.clock.now();
        let earliest = reservation.start_time + self.rules.no_show_grace();
        if now < earliest {
            return Err(BookingError::state(format!(
                "Reservation {} cannot be marked no-show before {}",
                reservation.id, earliest
            )));
        }

        reservation.transition_to(ReservationStatus::NoShow, now)?;
        let reservation = self.commit_with_projection(reservation, false)?;
        tracing::info!(reservation_id, "Reservation marked no-show");
        Ok(reservation)
    }

    /// Push the end of a seated booking by `minutes` (staff).
    ///
    /// Later bookings on the same table are not re-checked.
    pub fn extend(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        reservation_id: ReservationId,
        minutes: i32,
    ) -> BookingResult<Reservation> {
        let mut reservation = self.load_reservation(company_id, reservation_id)?;
        self.require_staff(actor_id, company_id)?;
        if reservation.status != ReservationStatus::Arrived {
            return Err(BookingError::state(format!(
                "Only seated reservations can be extended, {} is {}",
                reservation.id, reservation.status
            )));
        }
        if minutes <= 0 {
            return Err(BookingError::validation(format!(
                "Extension must be positive, got {} minutes",
                minutes
            )));
        }
        match reservation.duration_minutes.checked_add(minutes) {
            Some(total) if total <= MAX_DURATION_MINUTES => {}
            _ => {
                return Err(BookingError::validation(format!(
                    "Extension of {} minutes exceeds the {} minute maximum",
                    minutes, MAX_DURATION_MINUTES
                )));
            }
        }

        reservation.extend(minutes);
        reservation.updated_at = self.clock.now();
        let reservation = self.commit_with_projection(reservation, false)?;
        tracing::info!(
            reservation_id,
            minutes,
            end = %reservation.end_time(),
            "Reservation extended"
        );
        Ok(reservation)
    }

    // ========== Monitor entry points ==========

    /// Flip an AVAILABLE table to RESERVED for an imminent CONFIRMED booking.
    ///
    /// Returns `false` when nothing needed to change.
    pub fn hold_table_for_arrival(&self, reservation: &Reservation) -> BookingResult<bool> {
        if reservation.status != ReservationStatus::Confirmed {
            return Ok(false);
        }
        let Some(table_id) = reservation.table_id else {
            return Ok(false);
        };
        let now = self.clock.now();
        if reservation.start_time > now + self.rules.hold_window() || reservation.end_time() <= now
        {
            return Ok(false);
        }

        let mut table = self.load_table(reservation.company_id, table_id)?;
        if table.status != TableStatus::Available {
            return Ok(false);
        }
        let arrived = self.store.find_reservations(
            &ReservationFilter::default()
                .with_table(table_id)
                .with_status(ReservationStatus::Arrived),
        )?;
        if !arrived.is_empty() {
            return Ok(false);
        }

        table.status = TableStatus::Reserved;
        self.commit_table(table)?;
        tracing::info!(
            table_id,
            reservation_id = reservation.id,
            "Table held for upcoming arrival"
        );
        Ok(true)
    }

    /// Re-project a table from its reservations and persist the change if any.
    ///
    /// Returns the table when its status changed.
    pub fn refresh_table_status(&self, table_id: TableId) -> BookingResult<Option<DiningTable>> {
        let Some(mut table) = self.store.find_table(table_id)? else {
            return Err(BookingError::not_found(Resource::Table, table_id));
        };
        let projected = self.projected_status(&table, None)?;
        if projected == table.status {
            return Ok(None);
        }
        tracing::debug!(
            table_id,
            from = %table.status,
            to = %projected,
            "Table status re-projected"
        );
        table.status = projected;
        Ok(Some(self.commit_table(table)?))
    }

    // ========== Helpers ==========

    pub(super) fn load_company(&self, company_id: CompanyId) -> BookingResult<Company> {
        let company = self
            .directory
            .find_company(company_id)?
            .ok_or(BookingError::not_found(Resource::Company, company_id))?;
        if !company.is_active {
            return Err(BookingError::state(format!(
                "Company {} is not active",
                company_id
            )));
        }
        Ok(company)
    }

    pub(super) fn load_user(&self, user_id: UserId) -> BookingResult<User> {
        self.directory
            .find_user(user_id)?
            .ok_or(BookingError::not_found(Resource::User, user_id))
    }

    pub(super) fn require_staff(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
    ) -> BookingResult<User> {
        let actor = self.load_user(actor_id)?;
        if !actor.is_staff_of(company_id) {
            return Err(BookingError::unauthorized(format!(
                "User {} is not staff of company {}",
                actor_id, company_id
            )));
        }
        Ok(actor)
    }

    pub(super) fn require_manager(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
    ) -> BookingResult<User> {
        let actor = self.load_user(actor_id)?;
        if !actor.is_manager_of(company_id) {
            return Err(BookingError::unauthorized(format!(
                "User {} is not a manager of company {}",
                actor_id, company_id
            )));
        }
        Ok(actor)
    }

    /// Stored reservation, rejected if it belongs to another company
    pub(super) fn load_reservation(
        &self,
        company_id: CompanyId,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        let reservation = self
            .store
            .find_reservation(reservation_id)?
            .ok_or(BookingError::not_found(Resource::Reservation, reservation_id))?;
        if reservation.company_id != company_id {
            return Err(BookingError::unauthorized(format!(
                "Reservation {} belongs to another company",
                reservation_id
            )));
        }
        Ok(reservation)
    }

    pub(super) fn load_table(
        &self,
        company_id: CompanyId,
        table_id: TableId,
    ) -> BookingResult<DiningTable> {
        let table = self
            .store
            .find_table(table_id)?
            .ok_or(BookingError::not_found(Resource::Table, table_id))?;
        if table.company_id != company_id {
            return Err(BookingError::unauthorized(format!(
                "Table {} belongs to another company",
                table_id
            )));
        }
        Ok(table)
    }

    fn ensure_transition(reservation: &Reservation, next: ReservationStatus) -> BookingResult<()> {
        if !reservation.status.can_transition_to(next) {
            return Err(BookingError::state(format!(
                "Reservation {} cannot move from {} to {}",
                reservation.id, reservation.status, next
            )));
        }
        Ok(())
    }

    /// Capacity, manual status and slot checks for putting a booking on `table`
    fn ensure_table_bookable(
        &self,
        table: &DiningTable,
        party_size: i32,
        start: DateTime<Utc>,
        duration_minutes: i32,
        exclude: Option<ReservationId>,
    ) -> BookingResult<()> {
        if table.capacity < party_size {
            return Err(BookingError::validation(format!(
                "Table {} seats {}, party is {}",
                table.name, table.capacity, party_size
            )));
        }
        if !table.status.accepts_bookings() {
            return Err(BookingError::conflict(
                ConflictKind::TableUnavailable,
                format!("Table {} is {}", table.name, table.status),
            ));
        }
        let free = is_table_free(
            self.store.as_ref(),
            table,
            table.company_id,
            start,
            duration_minutes,
            exclude,
            self.clock.now(),
            &self.rules,
        )?;
        if !free {
            return Err(BookingError::conflict(
                ConflictKind::Slot,
                format!("Table {} is already booked for this time", table.name),
            ));
        }
        Ok(())
    }

    /// Company tables that can take the slot
    pub(super) fn free_tables(
        &self,
        company_id: CompanyId,
        start: DateTime<Utc>,
        duration_minutes: i32,
        exclude: Option<ReservationId>,
    ) -> BookingResult<Vec<DiningTable>> {
        let now = self.clock.now();
        let mut free = Vec::new();
        for table in self
            .store
            .find_tables(&TableFilter::company(company_id))?
        {
            if is_table_free(
                self.store.as_ref(),
                &table,
                company_id,
                start,
                duration_minutes,
                exclude,
                now,
                &self.rules,
            )? {
                free.push(table);
            }
        }
        Ok(free)
    }

    /// Projection of `table` with `changed` standing in for its stored version
    fn projected_status(
        &self,
        table: &DiningTable,
        changed: Option<&Reservation>,
    ) -> BookingResult<TableStatus> {
        if table.status.is_manual() {
            return Ok(table.status);
        }
        let mut active = self.store.find_reservations(
            &ReservationFilter::default()
                .with_table(table.id)
                .with_status(ReservationStatus::Confirmed)
                .with_status(ReservationStatus::Arrived),
        )?;
        if let Some(changed) = changed {
            active.retain(|r| r.id != changed.id);
            if changed.table_id == Some(table.id) {
                active.push(changed.clone());
            }
        }
        Ok(project_table_status(
            table.status,
            &active,
            self.clock.now(),
            &self.rules,
        ))
    }

    /// Commit a reservation together with its re-projected table, then notify
    fn commit_with_projection(
        &self,
        reservation: Reservation,
        check_slot: bool,
    ) -> BookingResult<Reservation> {
        let mut writes = WriteSet::reservation(reservation.clone());
        if check_slot {
            writes = writes.checking_slot();
        }

        if let Some(table_id) = reservation.table_id
            && let Some(mut table) = self.store.find_table(table_id)?
        {
            let projected = self.projected_status(&table, Some(&reservation))?;
            if projected != table.status {
                table.status = projected;
                writes = writes.with_table(table);
            }
        }

        let written = self.store.commit(writes)?;
        if let Some(table) = &written.table {
            self.notifier.notify_table_changed(table);
        }
        let reservation = written
            .reservation
            .ok_or_else(|| BookingError::Storage("commit returned no reservation".into()))?;
        self.notifier.notify_reservation_changed(&reservation);
        Ok(reservation)
    }

    pub(super) fn commit_table(&self, table: DiningTable) -> BookingResult<DiningTable> {
        let written = self.store.commit(WriteSet::table(table))?;
        let table = written
            .table
            .ok_or_else(|| BookingError::Storage("commit returned no table".into()))?;
        self.notifier.notify_table_changed(&table);
        Ok(table)
    }

    /// Company-scoped message, fire-and-forget
    pub(crate) fn notify_company(&self, company_id: CompanyId, payload: NotificationPayload) {
        self.notifier.notify_company(company_id, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, hour, minute, 0).unwrap()
    }

    fn booking(status: ReservationStatus, start: DateTime<Utc>, minutes: i32) -> Reservation {
        let mut r = Reservation::from_draft(
            1,
            ReservationDraft {
                company_id: 1,
                customer_id: 2,
                table_id: Some(3),
                start_time: start,
                duration_minutes: minutes,
                party_size: 2,
                note: None,
            },
            start - Duration::days(1),
        );
        r.status = status;
        r
    }

    #[test]
    fn test_projection_rules() {
        let rules = BookingRules::default();
        let now = at(19, 0);

        assert_eq!(
            project_table_status(TableStatus::Reserved, &[] as &[Reservation], now, &rules),
            TableStatus::Available
        );

        let soon = booking(ReservationStatus::Confirmed, at(19, 20), 60);
        assert_eq!(
            project_table_status(TableStatus::Available, [&soon], now, &rules),
            TableStatus::Reserved
        );

        // 超出 30 分钟窗口
        let later = booking(ReservationStatus::Confirmed, at(19, 45), 60);
        assert_eq!(
            project_table_status(TableStatus::Available, [&later], now, &rules),
            TableStatus::Available
        );

        // 已经结束的确认预订不再占桌
        let over = booking(ReservationStatus::Confirmed, at(17, 0), 60);
        assert_eq!(
            project_table_status(TableStatus::Reserved, [&over], now, &rules),
            TableStatus::Available
        );

        let seated = booking(ReservationStatus::Arrived, at(18, 0), 120);
        assert_eq!(
            project_table_status(TableStatus::Reserved, [&soon, &seated], now, &rules),
            TableStatus::Occupied
        );

        // 手动状态不受影响
        assert_eq!(
            project_table_status(TableStatus::Cleaning, [&seated], now, &rules),
            TableStatus::Cleaning
        );
    }
}
