//! Domain models
//!
//! Ids are snowflake `i64` values (see [`crate::util::snowflake_id`]).

pub mod company;
pub mod dining_table;
pub mod reservation;
pub mod user;

pub use company::{Company, CompanyId};
pub use dining_table::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableId, TablePosition, TableStatus,
};
pub use reservation::{
    Reservation, ReservationDraft, ReservationId, ReservationStatus, TransitionError,
};
pub use user::{StaffProfile, StaffRole, User, UserId};
