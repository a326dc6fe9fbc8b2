//! Read-only queries, always scoped to the caller's company

use chrono::{DateTime, NaiveDate, Utc};
use shared::models::{
    CompanyId, DiningTable, Reservation, ReservationId, ReservationStatus, TableId, UserId,
};

use super::ReservationsManager;
use super::allocator::{self, TableChoice};
use super::conflict;
use super::time_slot::{default_duration, validate_duration, validate_party_size};
use crate::core::BookingResult;
use crate::ports::{ReservationFilter, TableFilter};
use crate::utils::time::{local_day_bounds, to_local};

impl ReservationsManager {
    pub fn get_reservation(
        &self,
        company_id: CompanyId,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        self.load_reservation(company_id, reservation_id)
    }

    /// The filter's company is always replaced by `company_id`
    pub fn list_reservations(
        &self,
        company_id: CompanyId,
        mut filter: ReservationFilter,
    ) -> BookingResult<Vec<Reservation>> {
        filter.company_id = Some(company_id);
        Ok(self.store.find_reservations(&filter)?)
    }

    /// Reservations starting on a local calendar day
    pub fn reservations_for_day(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> BookingResult<Vec<Reservation>> {
        let (start, end) = local_day_bounds(date, self.rules.timezone);
        self.list_reservations(
            company_id,
            ReservationFilter::default().starting_between(start, end),
        )
    }

    /// A customer's bookings across companies
    pub fn customer_reservations(&self, customer_id: UserId) -> BookingResult<Vec<Reservation>> {
        Ok(self
            .store
            .find_reservations(&ReservationFilter::default().with_customer(customer_id))?)
    }

    pub fn list_tables(&self, company_id: CompanyId) -> BookingResult<Vec<DiningTable>> {
        Ok(self.store.find_tables(&TableFilter::company(company_id))?)
    }

    pub fn get_table(
        &self,
        company_id: CompanyId,
        table_id: TableId,
    ) -> BookingResult<DiningTable> {
        self.load_table(company_id, table_id)
    }

    /// Tables free for the slot that fit the party, best fit first
    pub fn find_available_tables(
        &self,
        company_id: CompanyId,
        start: DateTime<Utc>,
        duration_minutes: Option<i32>,
        party_size: i32,
    ) -> BookingResult<Vec<TableChoice>> {
        validate_party_size(party_size)?;
        let local_start = to_local(start, self.rules.timezone);
        let duration = duration_minutes.unwrap_or_else(|| default_duration(local_start));
        validate_duration(duration)?;

        let free = self.free_tables(company_id, start, duration, None)?;
        Ok(allocator::rank_tables(
            free,
            party_size,
            local_start,
            self.rules.max_capacity_overflow,
        ))
    }

    /// Allocator over the company's tables as they stand now
    pub fn find_optimal_table(
        &self,
        company_id: CompanyId,
        party_size: i32,
    ) -> BookingResult<Option<TableChoice>> {
        validate_party_size(party_size)?;
        let tables = self.list_tables(company_id)?;
        let now_local = to_local(self.clock.now(), self.rules.timezone);
        Ok(allocator::find_optimal_table(
            &tables,
            party_size,
            now_local,
            self.rules.max_capacity_overflow,
        ))
    }

    /// Fails closed: unknown companies, unknown or foreign tables are never available
    pub fn is_slot_available(
        &self,
        company_id: CompanyId,
        table_id: TableId,
        start: DateTime<Utc>,
        duration_minutes: i32,
    ) -> BookingResult<bool> {
        // 未知或停用的公司一律不可订
        match self.directory.find_company(company_id)? {
            Some(company) if company.is_active => {}
            _ => return Ok(false),
        }
        conflict::is_slot_available(
            self.store.as_ref(),
            company_id,
            table_id,
            start,
            duration_minutes,
            self.clock.now(),
            &self.rules,
        )
    }

    /// CONFIRMED bookings whose start lies in `[from, before)`
    pub(crate) fn confirmed_starting_between(
        &self,
        from: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> BookingResult<Vec<Reservation>> {
        Ok(self.store.find_reservations(
            &ReservationFilter::default()
                .with_status(ReservationStatus::Confirmed)
                .starting_between(from, before),
        )?)
    }

    /// CONFIRMED bookings that started more than the late-arrival grace ago
    pub(crate) fn late_arrivals(&self) -> BookingResult<Vec<Reservation>> {
        let cutoff = self.clock.now() - self.rules.late_arrival_grace();
        let filter = ReservationFilter {
            starts_before: Some(cutoff),
            ..ReservationFilter::default().with_status(ReservationStatus::Confirmed)
        };
        Ok(self.store.find_reservations(&filter)?)
    }
}
