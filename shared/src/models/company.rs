//! Company Model

use serde::{Deserialize, Serialize};

pub type CompanyId = i64;

/// Company entity (租户：一家餐厅)
///
/// The isolation boundary for every reservation and table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
