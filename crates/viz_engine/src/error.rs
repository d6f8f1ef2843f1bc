use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("parse error at {pos}: {msg}")]
    Parse { pos: usize, msg: String },

    #[error("field '{field}' not found in dataset '{dataset}'")]
    UnknownField { field: String, dataset: String },

    #[error("build: {0}")]
    Build(String),

    #[error("no field in the new data can stand in for '{field}'")]
    NoMatch { field: String },

    #[error("serde-json: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn parse(pos: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            pos,
            msg: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
