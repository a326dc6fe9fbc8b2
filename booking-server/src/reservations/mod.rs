//! 预订引擎
//!
//! # 模块结构
//!
//! ```text
//! reservations/
//! ├── rules.rs      # BookingRules (营业时区、宽限期、锁桌窗口)
//! ├── time_slot.rs  # 时间合法性、默认时长
//! ├── conflict.rs   # 半开区间冲突检测
//! ├── allocator.rs  # 容量评分选桌
//! ├── manager.rs    # ReservationsManager 生命周期
//! ├── tables.rs     # 桌台管理 (impl ReservationsManager)
//! ├── queries.rs    # 只读查询 (impl ReservationsManager)
//! └── monitor.rs    # 巡检调度器
//! ```

pub mod allocator;
pub mod conflict;
pub mod manager;
pub mod monitor;
pub mod queries;
pub mod rules;
pub mod tables;
pub mod time_slot;

pub use allocator::TableChoice;
pub use manager::{
    CreateReservation, RescheduleReservation, ReservationsManager, project_table_status,
};
pub use monitor::{ReservationMonitor, SweepReport};
pub use rules::BookingRules;
