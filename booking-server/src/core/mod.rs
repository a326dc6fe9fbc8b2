//! 核心模块 - 配置、错误、时钟与后台任务
//!
//! # 模块结构
//!
//! - [`Config`] - 服务配置（环境变量）
//! - [`BookingError`] - 引擎错误分类
//! - [`Clock`] - 可注入时钟
//! - [`BackgroundTasks`] - 后台任务管理

pub mod clock;
pub mod config;
pub mod error;
pub mod tasks;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{BookingError, BookingResult, ConflictKind, Resource};
pub use tasks::{BackgroundTasks, TaskCounts, TaskKind};
