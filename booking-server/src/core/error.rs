use std::fmt;

use shared::error::{AppError, ErrorCode};
use shared::models::TransitionError;
use thiserror::Error;

use crate::ports::StoreError;

/// Entity kind named in a not-found error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Reservation,
    Table,
    Company,
    User,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Reservation => write!(f, "Reservation"),
            Resource::Table => write!(f, "Table"),
            Resource::Company => write!(f, "Company"),
            Resource::User => write!(f, "User"),
        }
    }
}

/// What a conflict collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Requested interval overlaps a reservation on the table
    Slot,
    /// Another table already stands at the position
    Position,
    /// A party is seated at the table
    TableBusy,
    /// Table is being cleaned or out of service
    TableUnavailable,
    /// Entity changed between read and write
    Concurrent,
}

/// 预订引擎错误
///
/// | 变体 | 含义 |
/// |------|------|
/// | Validation | 输入不合法，调用方修正后可重试 |
/// | NotFound | 预订/桌台/公司/用户不存在 |
/// | State | 状态机不允许的操作 |
/// | Conflict | 时段冲突、位置冲突、并发修改 |
/// | Authorization | 跨租户或操作人不符 |
/// | Storage | 存储适配器故障 |
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    #[error("Invalid state: {0}")]
    State(String),

    #[error("Conflict: {message}")]
    Conflict { kind: ConflictKind, message: String },

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl BookingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn conflict(kind: ConflictKind, msg: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            message: msg.into(),
        }
    }

    pub fn not_found(resource: Resource, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    /// Unified error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::Validation(_) => ErrorCode::ValidationFailed,
            BookingError::NotFound { resource, .. } => match resource {
                Resource::Reservation => ErrorCode::ReservationNotFound,
                Resource::Table => ErrorCode::TableNotFound,
                Resource::Company => ErrorCode::TenantNotFound,
                Resource::User => ErrorCode::UserNotFound,
            },
            BookingError::State(_) => ErrorCode::InvalidTransition,
            BookingError::Conflict { kind, .. } => match kind {
                ConflictKind::Slot => ErrorCode::SlotUnavailable,
                ConflictKind::Position => ErrorCode::PositionTaken,
                ConflictKind::TableBusy => ErrorCode::TableOccupied,
                ConflictKind::TableUnavailable => ErrorCode::TableUnavailable,
                ConflictKind::Concurrent => ErrorCode::ConcurrentModification,
            },
            BookingError::Authorization(_) => ErrorCode::PermissionDenied,
            BookingError::Storage(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource, id } => BookingError::NotFound { resource, id },
            StoreError::SlotTaken { table_id } => BookingError::conflict(
                ConflictKind::Slot,
                format!("Table {} is already booked for this time", table_id),
            ),
            StoreError::PositionTaken { position } => BookingError::conflict(
                ConflictKind::Position,
                format!("Another table already stands at {}", position),
            ),
            StoreError::StaleWrite(what) => BookingError::conflict(
                ConflictKind::Concurrent,
                format!("{} was modified concurrently", what),
            ),
            StoreError::Backend(msg) => {
                tracing::error!(target: "database", error = %msg, "Store backend failure");
                BookingError::Storage(msg)
            }
        }
    }
}

impl From<TransitionError> for BookingError {
    fn from(err: TransitionError) -> Self {
        BookingError::State(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let code = err.code();
        match err {
            BookingError::NotFound { resource, id } => {
                AppError::with_message(code, format!("{} {} not found", resource, id))
                    .with_detail("resource", resource.to_string())
                    .with_detail("id", id)
            }
            // 存储细节只写日志，不外泄
            BookingError::Storage(_) => AppError::new(code),
            other => AppError::with_message(code, other.to_string()),
        }
    }
}

/// 引擎操作的 Result 类型别名
pub type BookingResult<T> = std::result::Result<T, BookingError>;
