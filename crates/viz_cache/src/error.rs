use thiserror::Error;
use viz_adapter::AdapterError;
use viz_data::DataError;

/// Failure reported by a grid backend.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("grid unavailable: {0}")]
    Unavailable(String),

    #[error("undefined map '{0}'")]
    UndefinedMap(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure loading a dataset through [`crate::DataCache`].
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: AdapterError,
    },

    #[error("parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: DataError,
    },
}

pub type Result<T> = std::result::Result<T, CacheError>;
