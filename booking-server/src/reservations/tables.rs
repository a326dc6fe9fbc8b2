//! Table administration
//!
//! Manual table states (CLEANING, OUT_OF_SERVICE) are only entered and left
//! here; leaving one re-projects the table from its reservations.

use shared::models::{
    CompanyId, DiningTable, DiningTableCreate, DiningTableUpdate, TableId, TableStatus, UserId,
};
use shared::util::snowflake_id;

use super::ReservationsManager;
use crate::core::{BookingError, BookingResult, ConflictKind};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

fn validate_capacity(capacity: i32) -> BookingResult<()> {
    if capacity < 1 {
        return Err(BookingError::validation(format!(
            "Capacity must be at least 1, got {}",
            capacity
        )));
    }
    Ok(())
}

impl ReservationsManager {
    /// Add a table (manager)
    pub fn create_table(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        data: DiningTableCreate,
    ) -> BookingResult<DiningTable> {
        self.require_manager(actor_id, company_id)?;
        self.load_company(company_id)?;
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_capacity(data.capacity)?;
        if !data.position.is_valid() {
            return Err(BookingError::validation(format!(
                "Position {} must be non-negative",
                data.position
            )));
        }

        let table = self
            .store
            .insert_table(DiningTable::from_create(snowflake_id(), company_id, data))?;
        tracing::info!(table_id = table.id, company_id, name = %table.name, "Table created");
        self.notifier.notify_table_changed(&table);
        Ok(table)
    }

    /// Edit table attributes (manager). Moves are position-checked in the commit.
    pub fn update_table(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        table_id: TableId,
        data: DiningTableUpdate,
    ) -> BookingResult<DiningTable> {
        self.require_manager(actor_id, company_id)?;
        let mut table = self.load_table(company_id, table_id)?;
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(capacity) = data.capacity {
            validate_capacity(capacity)?;
        }
        if let Some(position) = data.position
            && !position.is_valid()
        {
            return Err(BookingError::validation(format!(
                "Position {} must be non-negative",
                position
            )));
        }

        table.apply_update(data);
        let table = self.commit_table(table)?;
        tracing::info!(table_id, "Table updated");
        Ok(table)
    }

    /// Take a table out of service (manager). Refused while guests are seated.
    pub fn set_out_of_service(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        table_id: TableId,
    ) -> BookingResult<DiningTable> {
        self.require_manager(actor_id, company_id)?;
        let mut table = self.load_table(company_id, table_id)?;
        match table.status {
            TableStatus::Occupied => {
                return Err(BookingError::conflict(
                    ConflictKind::TableBusy,
                    format!("Table {} has seated guests", table.name),
                ));
            }
            TableStatus::OutOfService => return Ok(table),
            _ => {}
        }
        table.status = TableStatus::OutOfService;
        let table = self.commit_table(table)?;
        tracing::info!(table_id, "Table out of service");
        Ok(table)
    }

    /// Put an out-of-service table back (manager)
    pub fn return_to_service(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        table_id: TableId,
    ) -> BookingResult<DiningTable> {
        self.require_manager(actor_id, company_id)?;
        self.leave_manual_status(company_id, table_id, TableStatus::OutOfService)
    }

    /// AVAILABLE → CLEANING (staff), usually right after check-out
    pub fn mark_cleaning(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        table_id: TableId,
    ) -> BookingResult<DiningTable> {
        self.require_staff(actor_id, company_id)?;
        let mut table = self.load_table(company_id, table_id)?;
        if table.status != TableStatus::Available {
            return Err(BookingError::state(format!(
                "Only available tables can be cleaned, {} is {}",
                table.name, table.status
            )));
        }
        table.status = TableStatus::Cleaning;
        let table = self.commit_table(table)?;
        tracing::info!(table_id, "Table cleaning");
        Ok(table)
    }

    /// CLEANING → projected status (staff)
    pub fn finish_cleaning(
        &self,
        actor_id: UserId,
        company_id: CompanyId,
        table_id: TableId,
    ) -> BookingResult<DiningTable> {
        self.require_staff(actor_id, company_id)?;
        self.leave_manual_status(company_id, table_id, TableStatus::Cleaning)
    }

    fn leave_manual_status(
        &self,
        company_id: CompanyId,
        table_id: TableId,
        expected: TableStatus,
    ) -> BookingResult<DiningTable> {
        let mut table = self.load_table(company_id, table_id)?;
        if table.status != expected {
            return Err(BookingError::state(format!(
                "Table {} is {}, not {}",
                table.name, table.status, expected
            )));
        }
        // 先清掉手动状态，再按预订重新投影
        table.status = TableStatus::Available;
        let table = self.commit_table(table)?;
        match self.refresh_table_status(table_id)? {
            Some(projected) => Ok(projected),
            None => Ok(table),
        }
    }
}
