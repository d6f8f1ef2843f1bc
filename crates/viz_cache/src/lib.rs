//! Dataset cache.
//!
//! - [`DatasetCache`]: the generic `store` / `retrieve` contract.
//! - [`GridCache`]: binds that contract to a key-value [`GridMap`], fail-soft.
//! - [`DataCache`]: loading front, `get(url)` reads through the cache.

pub mod binding;
pub mod error;
pub mod grid;
pub mod loader;

use async_trait::async_trait;
use viz_data::Dataset;

pub use binding::GridCache;
pub use error::{CacheError, GridError};
pub use grid::{FsGrid, GridMap, MemoryGrid};
pub use loader::DataCache;

/// Key → dataset store.
///
/// Neither operation fails: backend trouble is reported as a miss.
#[async_trait]
pub trait DatasetCache: Send + Sync {
    async fn store(&self, key: &str, dataset: &Dataset);
    async fn retrieve(&self, key: &str) -> Option<Dataset>;
}
