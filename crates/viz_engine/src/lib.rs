//! Reference visualization compiler for vizgate.
//!
//! ```text
//! spec text ──Action::parse──► Action ──apply(&Dataset)──► VisItem
//!                                │                            │
//!                  matching::match_datasets          D3Builder::build
//!                                │                            │
//!                                ▼                            ▼
//!                        retargeted Action         BuildOutput { js, css, controls }
//!                                                             │
//!                                          ControlWriter / page::write_page
//! ```

pub mod action;
pub mod build;
pub mod controls;
pub mod error;
pub mod item;
pub mod matching;
pub mod page;

pub use action::{Action, Command, Element, Role};
pub use build::{BuildOutput, D3Builder};
pub use controls::{ControlWriter, Controls, FilterControl, FilterKind};
pub use error::{EngineError, Result};
pub use item::VisItem;
pub use page::{write_page, PageParts};
