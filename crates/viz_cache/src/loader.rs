use crate::error::{CacheError, Result};
use crate::DatasetCache;
use std::sync::Arc;
use tracing::debug;
use viz_adapter::ContentReader;
use viz_data::Dataset;

/// Read-through dataset loader: cache first, then the URL.
#[derive(Clone)]
pub struct DataCache {
    cache: Arc<dyn DatasetCache>,
    reader: ContentReader,
}

impl DataCache {
    pub fn new(cache: Arc<dyn DatasetCache>, reader: ContentReader) -> Self {
        Self { cache, reader }
    }

    /// Dataset for `url`, loading and caching it as CSV on a miss.
    pub async fn get(&self, url: &str) -> Result<Dataset> {
        if let Some(dataset) = self.cache.retrieve(url).await {
            return Ok(dataset);
        }
        let text = self.reader.read(url).await.map_err(|source| CacheError::Fetch {
            url: url.to_string(),
            source,
        })?;
        let dataset = Dataset::from_csv(url, &text).map_err(|source| CacheError::Parse {
            url: url.to_string(),
            source,
        })?;
        debug!(url, rows = dataset.row_count(), "loaded dataset");
        self.cache.store(url, &dataset).await;
        Ok(dataset)
    }
}
