//! Persistence gateway for the grid and settings records.
//!
//! # Responsibility
//! - Encode/decode the `mandalartData` and `mandalartSettings` JSON records.
//! - Keep record keys and shapes in one place.
//!
//! # Invariants
//! - The grid record is always a full 9x9 matrix of strings.
//! - Loading never invents data: absent keys return `None`.

use crate::model::grid::Grid;
use crate::model::settings::Settings;
use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage key of the grid record.
pub const GRID_RECORD_KEY: &str = "mandalartData";
/// Storage key of the settings record.
pub const SETTINGS_RECORD_KEY: &str = "mandalartSettings";

/// Typed access to the board's two persisted records.
pub struct PersistenceGateway<K: KvRepository> {
    repo: K,
}

impl<K: KvRepository> PersistenceGateway<K> {
    pub fn new(repo: K) -> Self {
        Self { repo }
    }

    pub fn save_grid(&self, grid: &Grid) -> RepoResult<()> {
        self.save(GRID_RECORD_KEY, grid)
    }

    pub fn load_grid(&self) -> RepoResult<Option<Grid>> {
        self.load(GRID_RECORD_KEY)
    }

    pub fn save_settings(&self, settings: &Settings) -> RepoResult<()> {
        self.save(SETTINGS_RECORD_KEY, settings)
    }

    /// Loads settings; missing fields inside a present record take defaults.
    pub fn load_settings(&self) -> RepoResult<Option<Settings>> {
        self.load(SETTINGS_RECORD_KEY)
    }

    /// Borrows the underlying repository.
    pub fn repo(&self) -> &K {
        &self.repo
    }

    fn save<T: Serialize>(&self, key: &'static str, record: &T) -> RepoResult<()> {
        let encoded = serde_json::to_string(record).map_err(|err| RepoError::InvalidData {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.repo.put(key, &encoded)?;
        debug!("event=record_save module=repo status=ok key={key} bytes={}", encoded.len());
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &'static str) -> RepoResult<Option<T>> {
        let Some(encoded) = self.repo.get(key)? else {
            debug!("event=record_load module=repo status=absent key={key}");
            return Ok(None);
        };
        let record = serde_json::from_str(&encoded).map_err(|err| RepoError::InvalidData {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        debug!("event=record_load module=repo status=ok key={key}");
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::{PersistenceGateway, GRID_RECORD_KEY};
    use crate::model::grid::{CellPos, Grid};
    use crate::repo::kv_repo::{KvRepository, MemoryKvRepository, RepoError};

    #[test]
    fn grid_record_is_nested_string_arrays() {
        let repo = MemoryKvRepository::new();
        let gateway = PersistenceGateway::new(repo.clone());
        let mut grid = Grid::default();
        grid.set(CellPos::new(0, 1), "Walk");
        gateway.save_grid(&grid).unwrap();

        let raw = repo.get(GRID_RECORD_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|row| row.as_array().map(Vec::len) == Some(9)));
        assert_eq!(value[0][1], "Walk");
    }

    #[test]
    fn wrong_shape_or_null_cells_are_invalid_data() {
        let repo = MemoryKvRepository::new();
        let gateway = PersistenceGateway::new(repo.clone());

        repo.put(GRID_RECORD_KEY, r#"[["a"]]"#).unwrap();
        assert!(matches!(gateway.load_grid(), Err(RepoError::InvalidData { .. })));

        let mut rows = vec![vec![serde_json::Value::from(""); 9]; 9];
        rows[3][3] = serde_json::Value::Null;
        repo.put(GRID_RECORD_KEY, &serde_json::to_string(&rows).unwrap())
            .unwrap();
        assert!(matches!(gateway.load_grid(), Err(RepoError::InvalidData { .. })));
    }

    #[test]
    fn absent_records_load_as_none() {
        let gateway = PersistenceGateway::new(MemoryKvRepository::new());
        assert_eq!(gateway.load_grid().unwrap(), None);
        assert_eq!(gateway.load_settings().unwrap(), None);
    }
}
