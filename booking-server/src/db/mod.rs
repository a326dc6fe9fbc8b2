//! 存储适配器
//!
//! 目前只有进程内实现，供二进制与测试共用。

pub mod memory;

pub use memory::{MemoryDirectory, MemoryStore};
