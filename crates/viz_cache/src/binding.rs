//! Fail-soft binding of [`DatasetCache`] onto a [`GridMap`].
//!
//! - backend failure on `store` → logged, dropped
//! - backend failure on `retrieve` → logged, miss
//! - undecodable bytes on `retrieve` → entry removed, miss

use crate::grid::GridMap;
use crate::DatasetCache;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use viz_data::{codec, Dataset};

#[derive(Clone)]
pub struct GridCache {
    grid: Arc<dyn GridMap>,
}

impl GridCache {
    pub fn new(grid: Arc<dyn GridMap>) -> Self {
        Self { grid }
    }
}

#[async_trait]
impl DatasetCache for GridCache {
    async fn store(&self, key: &str, dataset: &Dataset) {
        let map = self.grid.map_name();
        let bytes = match codec::encode(dataset) {
            Ok(b) => b,
            Err(error) => {
                warn!(key, map, %error, "dataset encode failed; not cached");
                return;
            }
        };
        if let Err(error) = self.grid.upsert(key, bytes).await {
            warn!(key, map, %error, "grid upsert failed; not cached");
        }
    }

    async fn retrieve(&self, key: &str) -> Option<Dataset> {
        let map = self.grid.map_name();
        let bytes = match self.grid.get(key).await {
            Ok(Some(b)) => b,
            Ok(None) => {
                debug!(key, map, "cache miss");
                return None;
            }
            Err(error) => {
                warn!(key, map, %error, "grid get failed; treating as miss");
                return None;
            }
        };
        match codec::decode(&bytes) {
            Ok(dataset) => {
                debug!(key, map, "cache hit");
                Some(dataset)
            }
            Err(error) => {
                warn!(key, map, %error, "corrupt cache entry; evicting");
                if let Err(error) = self.grid.remove(key).await {
                    warn!(key, map, %error, "grid remove failed");
                }
                None
            }
        }
    }
}
