//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::company::CompanyId;

pub type TableId = i64;

/// Table status (桌台状态)
///
/// A projection of the reservations occupying the table, except for the two
/// manual states `Cleaning` and `OutOfService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Reserved,
    Occupied,
    Cleaning,
    OutOfService,
}

impl TableStatus {
    /// Manual states survive re-projection
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Cleaning | Self::OutOfService)
    }

    /// Whether new reservations may be placed on the table at all
    pub fn accepts_bookings(&self) -> bool {
        !self.is_manual()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Occupied => "OCCUPIED",
            Self::Cleaning => "CLEANING",
            Self::OutOfService => "OUT_OF_SERVICE",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floor plan coordinates, unique per company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TablePosition {
    pub x: i32,
    pub y: i32,
}

impl TablePosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl fmt::Display for TablePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: TableId,
    pub company_id: CompanyId,
    pub name: String,
    pub capacity: i32,
    pub position: TablePosition,
    pub status: TableStatus,
    #[serde(default)]
    pub is_outdoor: bool,
    #[serde(default)]
    pub floor: i32,
    /// Optimistic concurrency token, bumped by the store on every write
    #[serde(default)]
    pub version: u64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub name: String,
    pub capacity: i32,
    pub position: TablePosition,
    #[serde(default)]
    pub is_outdoor: bool,
    #[serde(default)]
    pub floor: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub position: Option<TablePosition>,
    pub is_outdoor: Option<bool>,
    pub floor: Option<i32>,
}

impl DiningTable {
    /// Build a new, available table from a create payload
    pub fn from_create(id: TableId, company_id: CompanyId, data: DiningTableCreate) -> Self {
        Self {
            id,
            company_id,
            name: data.name,
            capacity: data.capacity,
            position: data.position,
            status: TableStatus::Available,
            is_outdoor: data.is_outdoor,
            floor: data.floor,
            version: 0,
        }
    }

    /// Apply the present fields of an update payload
    pub fn apply_update(&mut self, data: DiningTableUpdate) {
        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(capacity) = data.capacity {
            self.capacity = capacity;
        }
        if let Some(position) = data.position {
            self.position = position;
        }
        if let Some(is_outdoor) = data.is_outdoor {
            self.is_outdoor = is_outdoor;
        }
        if let Some(floor) = data.floor {
            self.floor = floor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_statuses() {
        assert!(TableStatus::Cleaning.is_manual());
        assert!(TableStatus::OutOfService.is_manual());
        assert!(!TableStatus::Reserved.is_manual());
        assert!(TableStatus::Occupied.accepts_bookings());
        assert!(!TableStatus::OutOfService.accepts_bookings());
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&TableStatus::OutOfService).unwrap();
        assert_eq!(json, "\"OUT_OF_SERVICE\"");
        assert_eq!(TableStatus::OutOfService.to_string(), "OUT_OF_SERVICE");
    }

    #[test]
    fn test_apply_update_only_touches_present_fields() {
        let mut table = DiningTable::from_create(
            1,
            9,
            DiningTableCreate {
                name: "T1".to_string(),
                capacity: 4,
                position: TablePosition::new(0, 0),
                is_outdoor: false,
                floor: 0,
            },
        );
        table.apply_update(DiningTableUpdate {
            position: Some(TablePosition::new(3, 2)),
            ..Default::default()
        });
        assert_eq!(table.position, TablePosition::new(3, 2));
        assert_eq!(table.capacity, 4);
        assert_eq!(table.name, "T1");
        assert_eq!(table.status, TableStatus::Available);
    }

    #[test]
    fn test_position_validity() {
        assert!(TablePosition::new(0, 0).is_valid());
        assert!(!TablePosition::new(-1, 0).is_valid());
        assert!(!TablePosition::new(0, -5).is_valid());
    }
}
