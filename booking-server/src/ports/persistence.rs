//! Persistence port
//!
//! Reads are plain lookups. Writes either insert a new entity or `commit` a
//! [`WriteSet`] whose entities carry the version they were read at; the store
//! bumps versions on success.

use chrono::{DateTime, Utc};
use shared::models::{
    CompanyId, DiningTable, Reservation, ReservationId, ReservationStatus, TableId,
    TablePosition, TableStatus, UserId,
};
use thiserror::Error;

use crate::core::Resource;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    /// A blocking reservation already overlaps the interval on this table
    #[error("Table {table_id} already has an overlapping reservation")]
    SlotTaken { table_id: TableId },

    #[error("Position {position} is already taken")]
    PositionTaken { position: TablePosition },

    /// Version mismatch on commit
    #[error("Stale write: {0}")]
    StaleWrite(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Table query
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    pub company_id: Option<CompanyId>,
    pub status: Option<TableStatus>,
}

impl TableFilter {
    pub fn company(company_id: CompanyId) -> Self {
        Self {
            company_id: Some(company_id),
            status: None,
        }
    }

    pub fn with_status(mut self, status: TableStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, table: &DiningTable) -> bool {
        self.company_id.is_none_or(|c| table.company_id == c)
            && self.status.is_none_or(|s| table.status == s)
    }
}

/// Reservation query. Every set field must match; the start range is `[from, before)`.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub company_id: Option<CompanyId>,
    /// Empty means any status
    pub statuses: Vec<ReservationStatus>,
    pub table_id: Option<TableId>,
    pub customer_id: Option<UserId>,
    pub starts_from: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
}

impl ReservationFilter {
    pub fn company(company_id: CompanyId) -> Self {
        Self {
            company_id: Some(company_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn with_table(mut self, table_id: TableId) -> Self {
        self.table_id = Some(table_id);
        self
    }

    pub fn with_customer(mut self, customer_id: UserId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn starting_between(mut self, from: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.starts_from = Some(from);
        self.starts_before = Some(before);
        self
    }

    pub fn matches(&self, r: &Reservation) -> bool {
        self.company_id.is_none_or(|c| r.company_id == c)
            && (self.statuses.is_empty() || self.statuses.contains(&r.status))
            && self.table_id.is_none_or(|t| r.table_id == Some(t))
            && self.customer_id.is_none_or(|c| r.customer_id == c)
            && self.starts_from.is_none_or(|from| r.start_time >= from)
            && self.starts_before.is_none_or(|before| r.start_time < before)
    }
}

/// Entities written together in one atomic commit
#[derive(Debug, Clone, Default)]
pub struct WriteSet {
    pub reservation: Option<Reservation>,
    pub table: Option<DiningTable>,
    /// Re-check that the reservation's interval is still free on its table
    pub check_slot: bool,
}

impl WriteSet {
    pub fn reservation(reservation: Reservation) -> Self {
        Self {
            reservation: Some(reservation),
            ..Default::default()
        }
    }

    pub fn table(table: DiningTable) -> Self {
        Self {
            table: Some(table),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: DiningTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn checking_slot(mut self) -> Self {
        self.check_slot = true;
        self
    }
}

/// 预订与桌台存储
pub trait PersistencePort: Send + Sync {
    fn find_reservation(&self, id: ReservationId) -> StoreResult<Option<Reservation>>;

    fn find_reservations(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>>;

    fn find_table(&self, id: TableId) -> StoreResult<Option<DiningTable>>;

    fn find_tables(&self, filter: &TableFilter) -> StoreResult<Vec<DiningTable>>;

    /// Any blocking reservation on `table_id` intersecting `[start, end)`, ignoring `exclude`
    fn has_overlap(
        &self,
        table_id: TableId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ReservationId>,
    ) -> StoreResult<bool>;

    /// Insert a new reservation. When it has a table, the overlap check and
    /// the insert happen atomically (`SlotTaken`).
    fn insert_reservation(&self, reservation: Reservation) -> StoreResult<Reservation>;

    /// Insert a new table. Position uniqueness is checked atomically (`PositionTaken`).
    fn insert_table(&self, table: DiningTable) -> StoreResult<DiningTable>;

    /// Compare-and-swap every entity in the set against its stored version.
    ///
    /// Returns the written entities with their new versions.
    fn commit(&self, writes: WriteSet) -> StoreResult<WriteSet>;
}
