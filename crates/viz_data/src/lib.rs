//! Tabular datasets for vizgate.
//!
//! A [`Dataset`] is a named, ordered set of typed columns. Datasets come in
//! as CSV text ([`Dataset::from_csv`]) and leave for the cache grid as bytes
//! ([`codec::encode`] / [`codec::decode`]).

pub mod codec;
pub mod dataset;
pub mod error;
mod ingest;

pub use dataset::{Cell, Dataset, Field, FieldKind};
pub use error::{DataError, Result};
