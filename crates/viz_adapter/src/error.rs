use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("http: {0}")]
    Http(String),

    #[error("http: {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("policy: URL '{0}' not in allowlist")]
    PolicyDeny(String),

    #[error("response too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("content is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
