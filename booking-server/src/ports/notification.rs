use shared::message::NotificationPayload;
use shared::models::{CompanyId, DiningTable, Reservation};

/// 变更推送
///
/// Fire-and-forget: implementations log their own failures and never
/// report them back into the lifecycle.
pub trait NotificationPort: Send + Sync {
    fn notify_table_changed(&self, table: &DiningTable);

    fn notify_reservation_changed(&self, reservation: &Reservation);

    /// Company-scoped message for staff terminals
    fn notify_company(&self, company_id: CompanyId, payload: NotificationPayload);
}
