//! 工具模块 - 日志、时间与输入校验

pub mod logger;
pub mod time;
pub mod validation;

pub use logger::init_logger_with_file;
