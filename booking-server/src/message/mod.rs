//! 消息总线
//!
//! ```text
//! ReservationsManager / ReservationMonitor
//!            │ NotificationPort
//!            ▼
//!       BusNotifier ──▶ MessageBus (broadcast::Sender<BusMessage>)
//!                                │
//!                   ┌────────────┼────────────┐
//!                   ▼            ▼            ▼
//!               前台终端       网关        日志监听
//! ```

pub mod bus;
pub mod notifier;

pub use bus::{MessageBus, ResourceVersions};
pub use notifier::BusNotifier;
pub use shared::message::{BusMessage, EventType, NotificationPayload, SyncPayload};
