use crate::error::{AdapterError, Result};
use crate::policy::FetchPolicy;
use std::path::{Component, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Reads text content referenced by URL.
#[derive(Clone)]
pub struct ContentReader {
    client: reqwest::Client,
    policy: FetchPolicy,
}

impl ContentReader {
    pub fn new(policy: FetchPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(policy.timeout_ms))
            .build()
            .map_err(|e| AdapterError::Http(e.to_string()))?;
        Ok(Self { client, policy })
    }

    /// Read the content at `url` as UTF-8 text.
    pub async fn read(&self, url: &str) -> Result<String> {
        self.policy.check(url)?;
        let bytes = match url.split_once("://").map(|(scheme, _)| scheme) {
            Some("http") | Some("https") => self.read_http(url).await?,
            Some("file") => self.read_file(url).await?,
            Some(other) => return Err(AdapterError::UnsupportedScheme(other.to_string())),
            None => return Err(AdapterError::UnsupportedScheme(String::new())),
        };
        debug!(url, bytes = bytes.len(), "read content");
        Ok(String::from_utf8(bytes)?)
    }

    async fn read_http(&self, url: &str) -> Result<Vec<u8>> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if let Some(len) = resp.content_length() {
            self.policy.check_size(len as usize)?;
        }

        // Content-Length may be absent (chunked); the cap applies as we go.
        let mut body = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| AdapterError::Http(e.to_string()))?
        {
            body.extend_from_slice(&chunk);
            self.policy.check_size(body.len())?;
        }
        Ok(body)
    }

    async fn read_file(&self, url: &str) -> Result<Vec<u8>> {
        let path = file_url_path(url)?;
        let meta = tokio::fs::metadata(&path).await?;
        self.policy.check_size(meta.len() as usize)?;
        Ok(tokio::fs::read(&path).await?)
    }
}

/// `file:///abs/path` and `file://localhost/abs/path` → `/abs/path`,
/// percent-decoded. Paths that climb with `..` are refused.
fn file_url_path(url: &str) -> Result<PathBuf> {
    let rest = url
        .strip_prefix("file://")
        .ok_or_else(|| AdapterError::UnsupportedScheme(url.to_string()))?;
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    if !rest.starts_with('/') {
        return Err(AdapterError::UnsupportedScheme(format!("file://{rest}")));
    }
    let path = PathBuf::from(urlencoding::decode(rest)?.into_owned());
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(AdapterError::PolicyDeny(url.to_string()));
    }
    Ok(path)
}
