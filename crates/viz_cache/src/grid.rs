//! Key-value grid backends.
//!
//! A grid holds opaque byte values under string keys inside one named map.
//! [`MemoryGrid`] lives in process; [`FsGrid`] shards values on disk:
//!
//! ```text
//! <root>/<map>/<h[0..2]>/<h[2..4]>/<h>.bin     h = hex(blake3(key))
//! ```

use crate::error::GridError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tokio::fs;

#[async_trait]
pub trait GridMap: Send + Sync {
    /// Name of the map this client is bound to.
    fn map_name(&self) -> &str;
    async fn upsert(&self, key: &str, value: Vec<u8>) -> Result<(), GridError>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GridError>;
    async fn remove(&self, key: &str) -> Result<(), GridError>;
}

// ── In-process grid ─────────────────────────────────────────────────

pub struct MemoryGrid {
    map: String,
    entries: RwLock<HashMap<String, Vec<u8>>>,
    online: AtomicBool,
}

impl MemoryGrid {
    pub fn new(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            entries: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
        }
    }

    /// Simulate the grid going away (or coming back).
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_online(&self) -> Result<(), GridError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(GridError::Unavailable(format!("memory grid '{}' offline", self.map)));
        }
        check_map(&self.map)
    }

    fn poisoned(&self) -> GridError {
        GridError::Unavailable(format!("memory grid '{}' lock poisoned", self.map))
    }
}

#[async_trait]
impl GridMap for MemoryGrid {
    fn map_name(&self) -> &str {
        &self.map
    }

    async fn upsert(&self, key: &str, value: Vec<u8>) -> Result<(), GridError> {
        self.ensure_online()?;
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GridError> {
        self.ensure_online()?;
        let entries = self.entries.read().map_err(|_| self.poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), GridError> {
        self.ensure_online()?;
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

// ── Directory-backed grid ───────────────────────────────────────────

pub struct FsGrid {
    root: PathBuf,
    map: String,
}

impl FsGrid {
    pub fn new(root: impl Into<PathBuf>, map: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            map: map.into(),
        }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, GridError> {
        check_map(&self.map)?;
        let h = hex::encode(blake3::hash(key.as_bytes()).as_bytes());
        let (p1, p2) = (&h[0..2], &h[2..4]);
        Ok(self
            .root
            .join(&self.map)
            .join(p1)
            .join(p2)
            .join(format!("{h}.bin")))
    }
}

/// A map is addressed by a non-empty name without path separators.
fn check_map(map: &str) -> Result<(), GridError> {
    if map.is_empty() || map.contains(['/', '\\']) || map == "." || map == ".." {
        return Err(GridError::UndefinedMap(map.to_string()));
    }
    Ok(())
}

fn parent_of(path: &Path) -> Result<&Path, GridError> {
    path.parent()
        .ok_or_else(|| GridError::Unavailable(format!("no parent for {}", path.display())))
}

#[async_trait]
impl GridMap for FsGrid {
    fn map_name(&self) -> &str {
        &self.map
    }

    async fn upsert(&self, key: &str, value: Vec<u8>) -> Result<(), GridError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(parent_of(&path)?).await?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GridError> {
        match fs::read(self.key_path(key)?).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), GridError> {
        match fs::remove_file(self.key_path(key)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_grid_upsert_get_remove() {
        let grid = MemoryGrid::new("datasets");
        assert_eq!(grid.map_name(), "datasets");
        assert_eq!(grid.get("k").await.unwrap(), None);
        grid.upsert("k", b"one".to_vec()).await.unwrap();
        grid.upsert("k", b"two".to_vec()).await.unwrap();
        assert_eq!(grid.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(grid.len(), 1);
        grid.remove("k").await.unwrap();
        assert_eq!(grid.get("k").await.unwrap(), None);
        assert!(grid.is_empty());
    }

    #[tokio::test]
    async fn memory_grid_offline_fails_every_call() {
        let grid = MemoryGrid::new("datasets");
        grid.set_online(false);
        assert!(matches!(grid.get("k").await, Err(GridError::Unavailable(_))));
        assert!(matches!(grid.upsert("k", vec![]).await, Err(GridError::Unavailable(_))));
        assert!(matches!(grid.remove("k").await, Err(GridError::Unavailable(_))));
        grid.set_online(true);
        assert!(grid.get("k").await.is_ok());
    }

    #[tokio::test]
    async fn fs_grid_upsert_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let grid = FsGrid::new(dir.path(), "datasets");
        let key = "https://data.example.com/cars.csv";
        assert_eq!(grid.get(key).await.unwrap(), None);
        grid.upsert(key, b"bytes".to_vec()).await.unwrap();
        assert_eq!(grid.get(key).await.unwrap(), Some(b"bytes".to_vec()));
        grid.remove(key).await.unwrap();
        assert_eq!(grid.get(key).await.unwrap(), None);
        // removing twice is fine
        grid.remove(key).await.unwrap();
    }

    #[test]
    fn fs_grid_paths_are_sharded_under_map() {
        let grid = FsGrid::new("/var/grid", "datasets");
        let path = grid.key_path("a/b?c").unwrap();
        assert!(path.starts_with("/var/grid/datasets"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("bin"));
        assert_eq!(path.components().count(), 7);
    }

    #[tokio::test]
    async fn unnamed_map_is_undefined() {
        let dir = tempfile::tempdir().unwrap();
        let grid = FsGrid::new(dir.path(), "");
        assert!(matches!(grid.get("k").await, Err(GridError::UndefinedMap(_))));
        let grid = MemoryGrid::new("../escape");
        assert!(matches!(
            grid.upsert("k", vec![1]).await,
            Err(GridError::UndefinedMap(m)) if m == "../escape"
        ));
    }
}
