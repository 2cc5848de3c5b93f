use std::path::PathBuf;

use duel_common::CoordinatorSnapshot;
use duel_common::config::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, YamlConfigSerializer,
};

#[derive(Debug)]
pub enum SnapshotError {
    Storage(String),
    Format(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Storage(e) => write!(f, "Snapshot storage error: {}", e),
            SnapshotError::Format(e) => write!(f, "Snapshot format error: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {}

pub trait SnapshotStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<CoordinatorSnapshot>, SnapshotError>;
    fn save(&self, snapshot: &CoordinatorSnapshot) -> Result<(), SnapshotError>;
}

#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    provider: FileContentConfigProvider,
    serializer: YamlConfigSerializer,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            provider: FileContentConfigProvider::new(path),
            serializer: YamlConfigSerializer::new(),
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<CoordinatorSnapshot>, SnapshotError> {
        let Some(content) = self
            .provider
            .get_config_content()
            .map_err(SnapshotError::Storage)?
        else {
            return Ok(None);
        };
        let snapshot = self
            .serializer
            .deserialize(&content)
            .map_err(SnapshotError::Format)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &CoordinatorSnapshot) -> Result<(), SnapshotError> {
        let content = self
            .serializer
            .serialize(snapshot)
            .map_err(SnapshotError::Format)?;
        self.provider
            .set_config_content(&content)
            .map_err(SnapshotError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("temp_duel_snapshot_{}.yaml", random_number))
    }

    #[test]
    fn test_missing_snapshot_loads_as_none() {
        let store = FileSnapshotStore::new(get_temp_file_path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_saved_snapshot_loads_back() {
        let path = get_temp_file_path();
        let store = FileSnapshotStore::new(path.clone());
        let mut snapshot = CoordinatorSnapshot::empty();
        snapshot.next_match_id = 12;

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_garbage_is_a_format_error() {
        let path = get_temp_file_path();
        std::fs::write(&path, "sessions: [[[").unwrap();
        let store = FileSnapshotStore::new(path.clone());
        assert!(matches!(store.load(), Err(SnapshotError::Format(_))));

        let _ = std::fs::remove_file(path);
    }
}
