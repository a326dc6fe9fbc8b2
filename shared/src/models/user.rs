//! User Model
//!
//! Staff are users with a [`StaffProfile`] attached, not a separate type.

use serde::{Deserialize, Serialize};

use super::company::CompanyId;

pub type UserId = i64;

/// Staff role inside one company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Staff,
    Manager,
}

/// Employment of a user by a company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    pub company_id: CompanyId,
    pub role: StaffRole,
}

/// User entity (顾客或员工)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    /// Present only for staff/manager accounts
    #[serde(default)]
    pub staff: Option<StaffProfile>,
}

impl User {
    /// Plain customer account
    pub fn customer(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: None,
            staff: None,
        }
    }

    /// Staff account bound to a company
    pub fn staff(
        id: UserId,
        username: impl Into<String>,
        company_id: CompanyId,
        role: StaffRole,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: None,
            staff: Some(StaffProfile { company_id, role }),
        }
    }

    /// Staff or manager of the given company
    pub fn is_staff_of(&self, company_id: CompanyId) -> bool {
        self.staff
            .as_ref()
            .is_some_and(|s| s.company_id == company_id)
    }

    /// Manager of the given company
    pub fn is_manager_of(&self, company_id: CompanyId) -> bool {
        self.staff
            .as_ref()
            .is_some_and(|s| s.company_id == company_id && s.role == StaffRole::Manager)
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}
