use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: DatabaseBackend,
    /// Log and skip blocks whose stored data can't be read instead of
    /// failing the load. Corrupt data is never repaired, only ignored.
    pub ignore_world_load_errors: bool,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// Keeps every block in memory; nothing outlives the process.
    #[default]
    Dummy,
}
