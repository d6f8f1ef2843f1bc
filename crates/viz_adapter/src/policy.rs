use crate::error::{AdapterError, Result};
use serde::{Deserialize, Serialize};

/// Constraints on what the content reader may fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Allowed URL patterns (glob). Empty = allow all http(s); `file:` URLs
    /// always need an explicit `file://` pattern.
    #[serde(default)]
    pub allowed_urls: Vec<String>,
    /// Max response size in bytes. 0 = no limit.
    #[serde(default)]
    pub max_response_bytes: usize,
    /// Fetch timeout in ms.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    10_000
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            allowed_urls: Vec::new(),
            max_response_bytes: 0,
            timeout_ms: default_timeout(),
        }
    }
}

impl FetchPolicy {
    /// Verify that `url` is allowed by the allowlist.
    ///
    /// An empty list allows every http(s) URL. `file:` URLs are only
    /// allowed by an explicit `file://` pattern; `*` does not cover them.
    pub fn check(&self, url: &str) -> Result<()> {
        let local = is_file_url(url);
        if self.allowed_urls.is_empty() && !local {
            return Ok(());
        }
        let allowed = self
            .allowed_urls
            .iter()
            .filter(|pattern| !local || is_file_url(pattern))
            .any(|pattern| {
                if pattern == "*" {
                    return true;
                }
                // Simple glob: "https://data.example.com/*" matches any path
                if let Some(prefix) = pattern.strip_suffix('*') {
                    url.starts_with(prefix)
                } else {
                    url == pattern
                }
            });
        if allowed {
            Ok(())
        } else {
            Err(AdapterError::PolicyDeny(url.to_string()))
        }
    }

    pub fn check_size(&self, size: usize) -> Result<()> {
        if self.max_response_bytes > 0 && size > self.max_response_bytes {
            return Err(AdapterError::TooLarge {
                size,
                max: self.max_response_bytes,
            });
        }
        Ok(())
    }
}

fn is_file_url(url: &str) -> bool {
    url.get(..5).is_some_and(|s| s.eq_ignore_ascii_case("file:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(patterns: &[&str]) -> FetchPolicy {
        FetchPolicy {
            allowed_urls: patterns.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn policy_allows_wildcard() {
        assert!(allow(&["*"]).check("https://anything.com/path").is_ok());
    }

    #[test]
    fn policy_allows_prefix_glob() {
        let policy = allow(&["https://data.example.com/*"]);
        assert!(policy.check("https://data.example.com/cars.csv").is_ok());
        assert!(policy.check("https://evil.com/cars.csv").is_err());
    }

    #[test]
    fn policy_allows_exact_match() {
        let policy = allow(&["https://data.example.com/cars.csv"]);
        assert!(policy.check("https://data.example.com/cars.csv").is_ok());
        assert!(policy.check("https://data.example.com/other.csv").is_err());
    }

    #[test]
    fn policy_empty_allows_http_only() {
        let policy = FetchPolicy::default();
        assert!(policy.check("https://data.example.com/cars.csv").is_ok());
        assert!(policy.check("http://localhost:8080/cars.csv").is_ok());
        assert!(matches!(
            policy.check("file:///etc/passwd"),
            Err(AdapterError::PolicyDeny(_))
        ));
        assert!(policy.check("FILE:///etc/passwd").is_err());
    }

    #[test]
    fn file_urls_need_a_file_pattern() {
        assert!(allow(&["*"]).check("file:///etc/passwd").is_err());
        assert!(allow(&["https://*"]).check("file:///etc/passwd").is_err());

        let policy = allow(&["file:///srv/data/*"]);
        assert!(policy.check("file:///srv/data/cars.csv").is_ok());
        assert!(policy.check("file:///etc/passwd").is_err());
        // a file-only list restricts http too
        assert!(policy.check("https://data.example.com/cars.csv").is_err());
    }

    #[test]
    fn size_cap() {
        let policy = FetchPolicy {
            max_response_bytes: 10,
            ..Default::default()
        };
        assert!(policy.check_size(10).is_ok());
        assert!(matches!(
            policy.check_size(11),
            Err(AdapterError::TooLarge { size: 11, max: 10 })
        ));
        assert!(FetchPolicy::default().check_size(usize::MAX).is_ok());
    }
}
