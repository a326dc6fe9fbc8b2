//! JSON 种子数据
//!
//! ```json
//! {
//!   "companies": [{ "id": 1, "name": "Casa Lola" }],
//!   "users": [{ "id": 10, "username": "marta", "display_name": null,
//!               "staff": { "company_id": 1, "role": "MANAGER" } }],
//!   "tables": [{ "id": 100, "company_id": 1, "name": "T1", "capacity": 4,
//!                "position": { "x": 0, "y": 0 }, "status": "AVAILABLE" }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::models::{Company, DiningTable, User};
use thiserror::Error;

use crate::db::MemoryDirectory;
use crate::ports::{PersistencePort, StoreError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to import table {table_id}: {source}")]
    Table {
        table_id: i64,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tables: Vec<DiningTable>,
}

impl SeedData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Import everything. Stops at the first table the store rejects.
    pub fn apply(
        self,
        store: &dyn PersistencePort,
        directory: &MemoryDirectory,
    ) -> Result<(), SeedError> {
        let (companies, users, tables) = (
            self.companies.len(),
            self.users.len(),
            self.tables.len(),
        );
        for company in self.companies {
            directory.upsert_company(company);
        }
        for user in self.users {
            directory.upsert_user(user);
        }
        for table in self.tables {
            let table_id = table.id;
            store
                .insert_table(table)
                .map_err(|source| SeedError::Table { table_id, source })?;
        }
        tracing::info!(companies, users, tables, "Seed data imported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::ports::DirectoryPort;
    use std::io::Write;

    const SEED: &str = r#"{
        "companies": [{ "id": 1, "name": "Casa Lola" }],
        "users": [
            { "id": 10, "username": "marta", "display_name": "Marta",
              "staff": { "company_id": 1, "role": "MANAGER" } },
            { "id": 20, "username": "guest", "display_name": null }
        ],
        "tables": [
            { "id": 100, "company_id": 1, "name": "T1", "capacity": 4,
              "position": { "x": 0, "y": 0 }, "status": "AVAILABLE" },
            { "id": 101, "company_id": 1, "name": "Patio", "capacity": 2,
              "position": { "x": 1, "y": 0 }, "status": "OUT_OF_SERVICE", "is_outdoor": true }
        ]
    }"#;

    #[test]
    fn test_load_and_apply() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let seed = SeedData::load(file.path()).unwrap();
        assert_eq!(seed.tables.len(), 2);
        assert!(seed.companies[0].is_active);

        let store = MemoryStore::new();
        let directory = MemoryDirectory::new();
        seed.apply(&store, &directory).unwrap();

        assert_eq!(store.table_count(), 2);
        assert!(directory.find_user(10).unwrap().unwrap().is_manager_of(1));
        let patio = store.find_table(101).unwrap().unwrap();
        assert!(patio.is_outdoor);
        assert_eq!(patio.version, 1);
    }

    #[test]
    fn test_duplicate_position_is_rejected() {
        let mut seed: SeedData = serde_json::from_str(SEED).unwrap();
        let mut clash = seed.tables[0].clone();
        clash.id = 102;
        seed.tables.push(clash);

        let err = seed
            .apply(&MemoryStore::new(), &MemoryDirectory::new())
            .unwrap_err();
        assert!(matches!(err, SeedError::Table { table_id: 102, .. }));
    }

    #[test]
    fn test_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            SeedData::load(file.path()).unwrap_err(),
            SeedError::Parse(_)
        ));
    }
}
