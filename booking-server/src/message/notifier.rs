//! [`NotificationPort`] over the message bus
//!
//! Entity changes go out as `Sync` messages, company messages as
//! `Notification` messages; both are targeted at `company:{id}`.

use std::sync::Arc;

use serde::Serialize;
use shared::message::{BusMessage, NotificationPayload, SyncPayload, company_target};
use shared::models::{CompanyId, DiningTable, Reservation};

use super::{MessageBus, ResourceVersions};
use crate::ports::NotificationPort;

pub const RESOURCE_RESERVATION: &str = "reservation";
pub const RESOURCE_DINING_TABLE: &str = "dining_table";

pub struct BusNotifier {
    bus: MessageBus,
    versions: Arc<ResourceVersions>,
}

impl BusNotifier {
    pub fn new(bus: MessageBus) -> Self {
        Self {
            bus,
            versions: Arc::new(ResourceVersions::new()),
        }
    }

    pub fn versions(&self) -> &ResourceVersions {
        &self.versions
    }

    fn send(&self, msg: BusMessage) {
        if let Err(e) = self.bus.publish(msg) {
            // 没人订阅很正常（比如测试或终端都离线）
            tracing::debug!(error = %e, "Bus message dropped");
        }
    }

    fn broadcast_sync<T: Serialize>(
        &self,
        company_id: CompanyId,
        resource: &str,
        action: &str,
        id: i64,
        data: &T,
    ) {
        let version = self.versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: serde_json::to_value(data).ok(),
        };
        match BusMessage::sync(&payload) {
            Ok(msg) => self.send(msg.with_target(company_target(company_id))),
            Err(e) => tracing::warn!(resource, id, error = %e, "Failed to encode sync payload"),
        }
    }
}

/// 版本 1 表示刚插入
fn action_for(version: u64) -> &'static str {
    if version <= 1 { "created" } else { "updated" }
}

impl NotificationPort for BusNotifier {
    fn notify_table_changed(&self, table: &DiningTable) {
        self.broadcast_sync(
            table.company_id,
            RESOURCE_DINING_TABLE,
            action_for(table.version),
            table.id,
            table,
        );
    }

    fn notify_reservation_changed(&self, reservation: &Reservation) {
        self.broadcast_sync(
            reservation.company_id,
            RESOURCE_RESERVATION,
            action_for(reservation.version),
            reservation.id,
            reservation,
        );
    }

    fn notify_company(&self, company_id: CompanyId, payload: NotificationPayload) {
        match BusMessage::notification(&payload) {
            Ok(msg) => self.send(msg.with_target(company_target(company_id))),
            Err(e) => tracing::warn!(company_id, error = %e, "Failed to encode notification"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{EventType, NotificationCategory};
    use shared::models::{DiningTableCreate, TablePosition};

    #[tokio::test]
    async fn test_table_change_becomes_targeted_sync() {
        let bus = MessageBus::with_capacity(8);
        let mut rx = bus.subscribe();
        let notifier = BusNotifier::new(bus);

        let mut table = DiningTable::from_create(
            3,
            42,
            DiningTableCreate {
                name: "Patio 1".into(),
                capacity: 2,
                position: TablePosition::new(4, 0),
                is_outdoor: true,
                floor: 0,
            },
        );
        table.version = 2;
        notifier.notify_table_changed(&table);

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event_type, EventType::Sync);
        assert_eq!(msg.target.as_deref(), Some("company:42"));
        let payload: SyncPayload = msg.parse_payload().unwrap();
        assert_eq!(payload.resource, RESOURCE_DINING_TABLE);
        assert_eq!(payload.action, "updated");
        assert_eq!(payload.id, "3");
        assert_eq!(payload.version, 1);
        assert_eq!(notifier.versions().get(RESOURCE_DINING_TABLE), 1);
    }

    #[test]
    fn test_notify_without_subscribers_is_silent() {
        let notifier = BusNotifier::new(MessageBus::with_capacity(4));
        notifier.notify_company(
            1,
            NotificationPayload::info(NotificationCategory::System, "hello", "nobody listens"),
        );
    }
}
