//! Ports - 引擎依赖的外部接口
//!
//! - [`PersistencePort`] 预订与桌台存储
//! - [`DirectoryPort`] 公司与用户目录
//! - [`NotificationPort`] 变更推送 (fire-and-forget)
//!
//! 全部是同步 trait (`Send + Sync`)，实现见 `db::memory` 与 `message::BusNotifier`。

pub mod directory;
pub mod notification;
pub mod persistence;

pub use directory::DirectoryPort;
pub use notification::NotificationPort;
pub use persistence::{
    PersistencePort, ReservationFilter, StoreError, StoreResult, TableFilter, WriteSet,
};
