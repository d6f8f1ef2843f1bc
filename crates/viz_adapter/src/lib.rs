//! Content reader: the IO boundary through which vizgate reads spec and data
//! text referenced by URL.
//!
//! ```text
//! service ──► ContentReader::read(url)
//!               │ FetchPolicy::check (allowlist)
//!               ├─ http(s)://  reqwest GET, 2xx only, size cap
//!               └─ file://     local read, size cap
//! ```

pub mod error;
pub mod policy;
pub mod reader;

pub use error::{AdapterError, Result};
pub use policy::FetchPolicy;
pub use reader::ContentReader;
