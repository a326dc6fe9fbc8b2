//! In-memory adapters
//!
//! [`MemoryStore`] keeps every entity behind one `RwLock`. Each write takes
//! the write lock once and performs its checks (overlap, position, version)
//! and the mutation under it, so concurrent writers serialize.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use shared::models::{
    Company, CompanyId, DiningTable, Reservation, ReservationId, TableId, TablePosition, User,
    UserId,
};

use crate::core::Resource;
use crate::ports::{
    DirectoryPort, PersistencePort, ReservationFilter, StoreError, StoreResult, TableFilter,
    WriteSet,
};

#[derive(Default)]
struct Inner {
    reservations: HashMap<ReservationId, Reservation>,
    tables: HashMap<TableId, DiningTable>,
    /// (company, position) → table
    positions: HashMap<(CompanyId, TablePosition), TableId>,
}

impl Inner {
    fn overlaps(
        &self,
        table_id: TableId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ReservationId>,
    ) -> bool {
        self.reservations.values().any(|r| {
            r.table_id == Some(table_id)
                && Some(r.id) != exclude
                && r.status.blocks_table()
                && r.overlaps(start, end)
        })
    }

    fn position_owner(&self, company_id: CompanyId, position: TablePosition) -> Option<TableId> {
        self.positions.get(&(company_id, position)).copied()
    }
}

/// In-memory [`PersistencePort`]
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reservation_count(&self) -> usize {
        self.inner.read().reservations.len()
    }

    pub fn table_count(&self) -> usize {
        self.inner.read().tables.len()
    }
}

impl PersistencePort for MemoryStore {
    fn find_reservation(&self, id: ReservationId) -> StoreResult<Option<Reservation>> {
        Ok(self.inner.read().reservations.get(&id).cloned())
    }

    fn find_reservations(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>> {
        let inner = self.inner.read();
        let mut found: Vec<Reservation> = inner
            .reservations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.start_time, r.id));
        Ok(found)
    }

    fn find_table(&self, id: TableId) -> StoreResult<Option<DiningTable>> {
        Ok(self.inner.read().tables.get(&id).cloned())
    }

    fn find_tables(&self, filter: &TableFilter) -> StoreResult<Vec<DiningTable>> {
        let inner = self.inner.read();
        let mut found: Vec<DiningTable> = inner
            .tables
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        // 稳定顺序：楼层、坐标、id
        found.sort_by_key(|t| (t.floor, t.position.y, t.position.x, t.id));
        Ok(found)
    }

    fn has_overlap(
        &self,
        table_id: TableId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ReservationId>,
    ) -> StoreResult<bool> {
        Ok(self.inner.read().overlaps(table_id, start, end, exclude))
    }

    fn insert_reservation(&self, mut reservation: Reservation) -> StoreResult<Reservation> {
        let mut inner = self.inner.write();
        if inner.reservations.contains_key(&reservation.id) {
            return Err(StoreError::Backend(format!(
                "duplicate reservation id {}",
                reservation.id
            )));
        }
        if let Some(table_id) = reservation.table_id {
            if !inner.tables.contains_key(&table_id) {
                return Err(StoreError::NotFound {
                    resource: Resource::Table,
                    id: table_id,
                });
            }
            if reservation.status.blocks_table()
                && inner.overlaps(
                    table_id,
                    reservation.start_time,
                    reservation.end_time(),
                    None,
                )
            {
                return Err(StoreError::SlotTaken { table_id });
            }
        }
        reservation.version = 1;
        inner
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    fn insert_table(&self, mut table: DiningTable) -> StoreResult<DiningTable> {
        let mut inner = self.inner.write();
        if inner.tables.contains_key(&table.id) {
            return Err(StoreError::Backend(format!("duplicate table id {}", table.id)));
        }
        if inner
            .position_owner(table.company_id, table.position)
            .is_some()
        {
            return Err(StoreError::PositionTaken {
                position: table.position,
            });
        }
        table.version = 1;
        inner
            .positions
            .insert((table.company_id, table.position), table.id);
        inner.tables.insert(table.id, table.clone());
        Ok(table)
    }

    fn commit(&self, writes: WriteSet) -> StoreResult<WriteSet> {
        let mut inner = self.inner.write();

        // 先全部校验，再统一写入
        if let Some(r) = &writes.reservation {
            let stored = inner
                .reservations
                .get(&r.id)
                .ok_or(StoreError::NotFound {
                    resource: Resource::Reservation,
                    id: r.id,
                })?;
            if stored.version != r.version {
                return Err(StoreError::StaleWrite(format!("Reservation {}", r.id)));
            }
            if writes.check_slot
                && r.status.blocks_table()
                && let Some(table_id) = r.table_id
                && inner.overlaps(table_id, r.start_time, r.end_time(), Some(r.id))
            {
                return Err(StoreError::SlotTaken { table_id });
            }
        }

        let mut moved_from = None;
        if let Some(t) = &writes.table {
            let stored = inner.tables.get(&t.id).ok_or(StoreError::NotFound {
                resource: Resource::Table,
                id: t.id,
            })?;
            if stored.version != t.version {
                return Err(StoreError::StaleWrite(format!("Table {}", t.id)));
            }
            if stored.position != t.position || stored.company_id != t.company_id {
                if inner
                    .position_owner(t.company_id, t.position)
                    .is_some_and(|owner| owner != t.id)
                {
                    return Err(StoreError::PositionTaken {
                        position: t.position,
                    });
                }
                moved_from = Some((stored.company_id, stored.position));
            }
        }

        let mut written = WriteSet {
            check_slot: writes.check_slot,
            ..Default::default()
        };
        if let Some(mut r) = writes.reservation {
            r.version += 1;
            inner.reservations.insert(r.id, r.clone());
            written.reservation = Some(r);
        }
        if let Some(mut t) = writes.table {
            if let Some(old) = moved_from {
                inner.positions.remove(&old);
                inner.positions.insert((t.company_id, t.position), t.id);
            }
            t.version += 1;
            inner.tables.insert(t.id, t.clone());
            written.table = Some(t);
        }
        Ok(written)
    }
}

/// In-memory [`DirectoryPort`]
#[derive(Default)]
pub struct MemoryDirectory {
    companies: DashMap<CompanyId, Company>,
    users: DashMap<UserId, User>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_company(&self, company: Company) {
        self.companies.insert(company.id, company);
    }

    pub fn upsert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }
}

impl DirectoryPort for MemoryDirectory {
    fn find_company(&self, id: CompanyId) -> StoreResult<Option<Company>> {
        Ok(self.companies.get(&id).map(|c| c.value().clone()))
    }

    fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shared::models::{DiningTableCreate, ReservationDraft, ReservationStatus};

    fn table(id: TableId, x: i32, y: i32) -> DiningTable {
        DiningTable::from_create(
            id,
            1,
            DiningTableCreate {
                name: format!("T{id}"),
                capacity: 4,
                position: TablePosition::new(x, y),
                is_outdoor: false,
                floor: 0,
            },
        )
    }

    fn booking(id: ReservationId, table_id: TableId, hour: u32, minutes: i32) -> Reservation {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 8, 0, 0).unwrap();
        Reservation::from_draft(
            id,
            ReservationDraft {
                company_id: 1,
                customer_id: 50,
                table_id: Some(table_id),
                start_time: Utc.with_ymd_and_hms(2030, 3, 1, hour, 0, 0).unwrap(),
                duration_minutes: minutes,
                party_size: 2,
                note: None,
            },
            now,
        )
    }

    #[test]
    fn test_insert_reservation_rejects_overlap() {
        let store = MemoryStore::new();
        store.insert_table(table(1, 0, 0)).unwrap();

        let first = store.insert_reservation(booking(10, 1, 19, 120)).unwrap();
        assert_eq!(first.version, 1);

        // 20:00 落在 19:00-21:00 内
        let err = store.insert_reservation(booking(11, 1, 20, 60)).unwrap_err();
        assert!(matches!(err, StoreError::SlotTaken { table_id: 1 }));

        // 21:00 正好接上，半开区间不冲突
        store.insert_reservation(booking(12, 1, 21, 60)).unwrap();
        assert_eq!(store.reservation_count(), 2);
    }

    #[test]
    fn test_terminal_reservations_do_not_block() {
        let store = MemoryStore::new();
        store.insert_table(table(1, 0, 0)).unwrap();
        let mut r = store.insert_reservation(booking(10, 1, 19, 120)).unwrap();
        r.transition_to(
            ReservationStatus::Cancelled,
            r.created_at + Duration::minutes(1),
        )
        .unwrap();
        store.commit(WriteSet::reservation(r)).unwrap();

        assert!(!store
            .has_overlap(
                1,
                Utc.with_ymd_and_hms(2030, 3, 1, 19, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2030, 3, 1, 20, 0, 0).unwrap(),
                None
            )
            .unwrap());
        store.insert_reservation(booking(11, 1, 19, 60)).unwrap();
    }

    #[test]
    fn test_commit_detects_stale_version() {
        let store = MemoryStore::new();
        store.insert_table(table(1, 0, 0)).unwrap();
        let r = store.insert_reservation(booking(10, 1, 19, 120)).unwrap();

        let mut a = r.clone();
        a.note = Some("window seat".into());
        let written = store.commit(WriteSet::reservation(a)).unwrap();
        assert_eq!(written.reservation.unwrap().version, 2);

        let mut b = r;
        b.note = Some("high chair".into());
        let err = store.commit(WriteSet::reservation(b)).unwrap_err();
        assert!(matches!(err, StoreError::StaleWrite(_)));
        assert_eq!(
            store.find_reservation(10).unwrap().unwrap().note.as_deref(),
            Some("window seat")
        );
    }

    #[test]
    fn test_commit_slot_check_excludes_self() {
        let store = MemoryStore::new();
        store.insert_table(table(1, 0, 0)).unwrap();
        store.insert_reservation(booking(10, 1, 19, 120)).unwrap();
        let mut r = store.insert_reservation(booking(11, 1, 22, 60)).unwrap();

        // 往前挪 30 分钟仍只和自己重叠
        r.reschedule(r.start_time - Duration::minutes(30), 60);
        let r = store
            .commit(WriteSet::reservation(r).checking_slot())
            .unwrap()
            .reservation
            .unwrap();

        let mut clash = r;
        clash.reschedule(Utc.with_ymd_and_hms(2030, 3, 1, 20, 0, 0).unwrap(), 60);
        let err = store
            .commit(WriteSet::reservation(clash).checking_slot())
            .unwrap_err();
        assert!(matches!(err, StoreError::SlotTaken { .. }));
    }

    #[test]
    fn test_position_uniqueness() {
        let store = MemoryStore::new();
        store.insert_table(table(1, 0, 0)).unwrap();
        let second = store.insert_table(table(2, 1, 0)).unwrap();

        let err = store.insert_table(table(3, 0, 0)).unwrap_err();
        assert!(matches!(err, StoreError::PositionTaken { .. }));

        // 另一家公司同一位置没问题
        let mut other = table(4, 0, 0);
        other.company_id = 2;
        store.insert_table(other).unwrap();

        let mut moved = second.clone();
        moved.position = TablePosition::new(0, 0);
        assert!(matches!(
            store.commit(WriteSet::table(moved)).unwrap_err(),
            StoreError::PositionTaken { .. }
        ));

        let mut moved = second;
        moved.position = TablePosition::new(5, 5);
        store.commit(WriteSet::table(moved)).unwrap();
        // 旧位置被释放
        store.insert_table(table(5, 1, 0)).unwrap();
    }

    #[test]
    fn test_directory_lookup() {
        let dir = MemoryDirectory::new();
        dir.upsert_company(Company {
            id: 1,
            name: "Casa Lola".into(),
            is_active: true,
        });
        dir.upsert_user(User::customer(50, "ana"));
        assert!(dir.find_company(1).unwrap().is_some());
        assert!(dir.find_company(2).unwrap().is_none());
        assert_eq!(dir.find_user(50).unwrap().unwrap().username, "ana");
    }
}
