use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv: no header row")]
    MissingHeader,

    #[error("csv: duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("codec: bad magic, not a stored dataset")]
    BadMagic,

    #[error("serde-json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
