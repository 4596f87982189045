use super::{FileStore, InMemoryStore, KvStore, SqliteStore};
use crate::config::{StoreBackendKind, StoreConfig};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

pub async fn create_store(
    config: &StoreConfig,
    workspace_dir: &Path,
) -> anyhow::Result<Arc<dyn KvStore>> {
    let path = config.resolve_path(workspace_dir);

    let store: Arc<dyn KvStore> = match config.backend {
        StoreBackendKind::Sqlite => Arc::new(
            SqliteStore::open(&path)
                .await
                .with_context(|| format!("Failed to open store DB: {}", path.display()))?,
        ),
        StoreBackendKind::File => Arc::new(FileStore::new(path)),
        StoreBackendKind::Memory => Arc::new(InMemoryStore::new()),
    };

    tracing::debug!(backend = store.name(), "store backend ready");
    Ok(store)
}
