//! Byte codec for datasets held in the cache grid.
//!
//! Layout: `b"VZD1"` followed by the JSON encoding of the [`Dataset`].

use crate::dataset::Dataset;
use crate::error::{DataError, Result};

pub const MAGIC: &[u8; 4] = b"VZD1";

pub fn encode(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut out = MAGIC.to_vec();
    serde_json::to_writer(&mut out, dataset)?;
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<Dataset> {
    let body = bytes.strip_prefix(MAGIC.as_slice()).ok_or(DataError::BadMagic)?;
    Ok(serde_json::from_slice(body)?)
}
