//! Shared types for the table booking workspace
//!
//! Domain models, status machines, unified error codes and message bus
//! payloads used by `booking-server` and by anything that talks to it.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{BusMessage, EventType};
pub use models::{
    Company, CompanyId, DiningTable, Reservation, ReservationId, ReservationStatus, StaffProfile,
    StaffRole, TableId, TablePosition, TableStatus, User, UserId,
};
