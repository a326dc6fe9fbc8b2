//! Booking Server - 餐厅桌台预订引擎
//!
//! # 架构概述
//!
//! - **预订引擎** (`reservations`): 时段校验、冲突检测、选桌、生命周期、巡检
//! - **端口** (`ports`): 存储、目录、通知三个外部接口
//! - **存储** (`db`): 进程内适配器
//! - **消息总线** (`message`): 变更同步与公司通知
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、错误、时钟、后台任务
//! ├── ports/         # PersistencePort / DirectoryPort / NotificationPort
//! ├── db/            # MemoryStore / MemoryDirectory
//! ├── message/       # MessageBus / BusNotifier
//! ├── reservations/  # 预订引擎
//! ├── utils/         # 日志、时间、校验
//! └── seed.rs        # JSON 种子数据
//! ```

pub mod core;
pub mod db;
pub mod message;
pub mod ports;
pub mod reservations;
pub mod seed;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{BackgroundTasks, BookingError, BookingResult, Clock, Config, SystemClock};
pub use db::{MemoryDirectory, MemoryStore};
pub use message::{BusNotifier, MessageBus};
pub use reservations::{
    BookingRules, CreateReservation, RescheduleReservation, ReservationMonitor,
    ReservationsManager,
};
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ___            _    _
  | _ ) ___  ___ | |__(_)_ _  __ _
  | _ \/ _ \/ _ \| / /| | ' \/ _` |
  |___/\___/\___/|_\_\|_|_||_\__, |
                             |___/
    "#
    );
}
