//! Reservation Model
//!
//! 预订状态机：
//!
//! ```text
//! PENDING ──▶ CONFIRMED ──▶ ARRIVED ──▶ COMPLETED
//!    │            │    └──▶ NO_SHOW
//!    └────────────┴──▶ CANCELLED
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::company::CompanyId;
use super::dining_table::TableId;
use super::user::UserId;

pub type ReservationId = i64;

/// Reservation status (预订状态)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Booked without a table yet
    Pending,
    /// Table assigned, guests expected
    Confirmed,
    /// Guests seated
    Arrived,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Arrived,
        Self::Completed,
        Self::Cancelled,
        Self::NoShow,
    ];

    /// No lifecycle transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Whether a reservation in this status holds its table interval
    pub fn blocks_table(&self) -> bool {
        !self.is_terminal()
    }

    /// The single source of truth for allowed transitions
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Arrived)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (Arrived, Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Arrived => "ARRIVED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reservation cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: ReservationStatus,
    pub to: ReservationStatus,
}

/// Input for a new reservation, before it gets an id
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    pub company_id: CompanyId,
    pub customer_id: UserId,
    pub table_id: Option<TableId>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub party_size: i32,
    pub note: Option<String>,
}

/// Reservation entity (预订)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub company_id: CompanyId,
    pub customer_id: UserId,
    pub table_id: Option<TableId>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    /// Always `start_time + duration_minutes`
    end_time: DateTime<Utc>,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the reservation reaches a terminal status
    pub closed_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency token, bumped by the store on every write
    #[serde(default)]
    pub version: u64,
}

impl Reservation {
    /// Materialize a draft. Status is CONFIRMED when a table is set, PENDING otherwise.
    pub fn from_draft(id: ReservationId, draft: ReservationDraft, now: DateTime<Utc>) -> Self {
        let status = if draft.table_id.is_some() {
            ReservationStatus::Confirmed
        } else {
            ReservationStatus::Pending
        };
        Self {
            id,
            company_id: draft.company_id,
            customer_id: draft.customer_id,
            table_id: draft.table_id,
            start_time: draft.start_time,
            duration_minutes: draft.duration_minutes,
            end_time: draft.start_time + Duration::minutes(i64::from(draft.duration_minutes)),
            party_size: draft.party_size,
            status,
            note: draft.note,
            created_at: now,
            updated_at: now,
            closed_at: None,
            version: 0,
        }
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Half-open interval intersection with `[start, end)`
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Move the slot. The end time follows the new start and duration.
    pub fn reschedule(&mut self, start_time: DateTime<Utc>, duration_minutes: i32) {
        self.start_time = start_time;
        self.duration_minutes = duration_minutes;
        self.end_time = start_time + Duration::minutes(i64::from(duration_minutes));
    }

    /// Push the end time by `minutes`; duration grows with it
    pub fn extend(&mut self, minutes: i32) {
        self.duration_minutes += minutes;
        self.end_time += Duration::minutes(i64::from(minutes));
    }

    /// Apply a status change if the state machine allows it
    pub fn transition_to(
        &mut self,
        next: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        if next.is_terminal() {
            self.closed_at = Some(now);
        }
        Ok(())
    }
}
