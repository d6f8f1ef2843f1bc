//! Service configuration from `VIZ_*` environment variables. Unset or
//! unparsable values fall back to defaults.

use std::net::SocketAddr;
use std::str::FromStr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use viz_adapter::FetchPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridBackend {
    Memory,
    Fs(PathBuf),
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub bind_addr: SocketAddr,
    /// Default location of the page support assets.
    pub asset_base: String,
    pub grid: GridBackend,
    pub grid_map: String,
    pub fetch: FetchPolicy,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            asset_base: "../../vizsupport".into(),
            grid: GridBackend::Memory,
            grid_map: "datasets".into(),
            fetch: FetchPolicy {
                allowed_urls: Vec::new(),
                max_response_bytes: 16 * 1024 * 1024,
                timeout_ms: 10_000,
            },
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();

        let grid = match get("VIZ_GRID_BACKEND").as_deref().map(str::trim) {
            None | Some("memory") => GridBackend::Memory,
            Some("fs") => GridBackend::Fs(
                get("VIZ_GRID_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("grid")),
            ),
            Some(other) => {
                warn!(backend = other, "unknown VIZ_GRID_BACKEND; using memory");
                GridBackend::Memory
            }
        };

        let allowed_urls = get("VIZ_FETCH_ALLOW")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(d.fetch.allowed_urls);

        Self {
            bind_addr: parsed(&get, "VIZ_BIND_ADDR").unwrap_or(d.bind_addr),
            asset_base: get("VIZ_ASSET_BASE").unwrap_or(d.asset_base),
            grid,
            grid_map: get("VIZ_GRID_MAP").unwrap_or(d.grid_map),
            fetch: FetchPolicy {
                allowed_urls,
                max_response_bytes: parsed(&get, "VIZ_FETCH_MAX_BYTES").unwrap_or(d.fetch.max_response_bytes),
                timeout_ms: parsed(&get, "VIZ_FETCH_TIMEOUT_MS").unwrap_or(d.fetch.timeout_ms),
            },
            max_body_bytes: parsed(&get, "VIZ_MAX_BODY_BYTES").unwrap_or(d.max_body_bytes),
            request_timeout: parsed(&get, "VIZ_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.request_timeout),
        }
    }
}

fn parsed<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    get(key).and_then(|v| v.trim().parse().ok())
}
