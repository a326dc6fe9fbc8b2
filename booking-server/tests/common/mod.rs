//! 测试夹具：内存存储 + 手动时钟 + 记录通知

#![allow(dead_code)]

use std::sync::Arc;

use booking_server::core::ManualClock;
use booking_server::ports::{NotificationPort, PersistencePort};
use booking_server::{
    BookingRules, CreateReservation, MemoryDirectory, MemoryStore, ReservationsManager,
};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use shared::message::NotificationPayload;
use shared::models::{
    Company, CompanyId, DiningTable, DiningTableCreate, Reservation, StaffRole, TableId,
    TablePosition, User, UserId,
};

pub const COMPANY: CompanyId = 1;
pub const OTHER_COMPANY: CompanyId = 2;
pub const MANAGER: UserId = 10;
pub const WAITER: UserId = 11;
pub const GUEST: UserId = 20;
pub const OTHER_GUEST: UserId = 21;
pub const FOREIGN_WAITER: UserId = 30;

/// 通知记录
#[derive(Debug, Clone)]
pub enum Notice {
    Table(DiningTable),
    Reservation(Reservation),
    Company(CompanyId, NotificationPayload),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn company_notices(&self) -> Vec<(CompanyId, NotificationPayload)> {
        self.notices
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notice::Company(c, p) => Some((*c, p.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn table_notices(&self) -> Vec<DiningTable> {
        self.notices
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notice::Table(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl NotificationPort for RecordingNotifier {
    fn notify_table_changed(&self, table: &DiningTable) {
        self.notices.lock().push(Notice::Table(table.clone()));
    }

    fn notify_reservation_changed(&self, reservation: &Reservation) {
        self.notices.lock().push(Notice::Reservation(reservation.clone()));
    }

    fn notify_company(&self, company_id: CompanyId, payload: NotificationPayload) {
        self.notices.lock().push(Notice::Company(company_id, payload));
    }
}

/// 2030-06-01 (周六) 本地 = UTC
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, hour, minute, 0).unwrap()
}

pub struct Harness {
    pub store: Arc<dyn PersistencePort>,
    pub directory: Arc<MemoryDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
    pub manager: Arc<ReservationsManager>,
}

impl Harness {
    /// 默认时钟停在 08:00
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn PersistencePort>) -> Self {
        let directory = Arc::new(MemoryDirectory::new());
        directory.upsert_company(Company {
            id: COMPANY,
            name: "Casa Lola".into(),
            is_active: true,
        });
        directory.upsert_company(Company {
            id: OTHER_COMPANY,
            name: "Chez Paul".into(),
            is_active: true,
        });
        directory.upsert_user(User::staff(MANAGER, "marta", COMPANY, StaffRole::Manager));
        directory.upsert_user(User::staff(WAITER, "jordi", COMPANY, StaffRole::Staff));
        directory.upsert_user(User::staff(FOREIGN_WAITER, "paul", OTHER_COMPANY, StaffRole::Staff));
        directory.upsert_user(User::customer(GUEST, "ana"));
        directory.upsert_user(User::customer(OTHER_GUEST, "luis"));

        let notifier = Arc::new(RecordingNotifier::default());
        let clock = Arc::new(ManualClock::new(at(8, 0)));
        let manager = Arc::new(ReservationsManager::new(
            store.clone(),
            directory.clone(),
            notifier.clone(),
            clock.clone(),
            BookingRules::default(),
        ));
        Self {
            store,
            directory,
            notifier,
            clock,
            manager,
        }
    }

    /// 经理建桌，x 坐标区分位置
    pub fn add_table(&self, name: &str, capacity: i32, x: i32) -> DiningTable {
        self.manager
            .create_table(MANAGER, COMPANY, create_payload(name, capacity, x))
            .unwrap()
    }

    /// 直接写存储，给别的公司建桌用
    pub fn add_foreign_table(&self, name: &str, capacity: i32, x: i32) -> DiningTable {
        self.store
            .insert_table(DiningTable::from_create(
                shared::util::snowflake_id(),
                OTHER_COMPANY,
                create_payload(name, capacity, x),
            ))
            .unwrap()
    }

    pub fn table(&self, id: TableId) -> DiningTable {
        self.store.find_table(id).unwrap().unwrap()
    }

    pub fn reservation(&self, id: i64) -> Reservation {
        self.store.find_reservation(id).unwrap().unwrap()
    }

    /// GUEST 在指定桌台订 `start` 开始的位
    pub fn book(&self, table_id: TableId, start: DateTime<Utc>, minutes: i32) -> Reservation {
        self.manager
            .create_reservation(GUEST, COMPANY, request(Some(table_id), start, Some(minutes), 2))
            .unwrap()
    }
}

pub fn create_payload(name: &str, capacity: i32, x: i32) -> DiningTableCreate {
    DiningTableCreate {
        name: name.to_string(),
        capacity,
        position: TablePosition::new(x, 0),
        is_outdoor: false,
        floor: 0,
    }
}

pub fn request(
    table_id: Option<TableId>,
    start: DateTime<Utc>,
    duration_minutes: Option<i32>,
    party_size: i32,
) -> CreateReservation {
    CreateReservation {
        customer_id: GUEST,
        table_id,
        start_time: start,
        duration_minutes,
        party_size,
        note: None,
    }
}
