use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Durable backend behind the key-value store adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl std::str::FromStr for StoreBackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "file" | "json" => Ok(Self::File),
            "memory" | "none" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackendKind,
    /// Override for the database file (sqlite) or directory (file).
    /// Defaults to a location inside the workspace.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Where the configured backend keeps its data.
    pub fn resolve_path(&self, workspace_dir: &Path) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match self.backend {
            StoreBackendKind::Sqlite => workspace_dir.join("store").join("larder.db"),
            StoreBackendKind::File | StoreBackendKind::Memory => workspace_dir.join("store"),
        }
    }
}
