//! `dashdiff-recon`: reconciliation engine for generated dashboard datasets.
//!
//! Pure engine crate: receives already-typed record collections, returns
//! classified results + summary. No CLI or filesystem dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod paths;
pub mod records;
pub mod report;
pub mod value;

pub use config::{CompareConfig, DuplicatePolicy};
pub use engine::{run, CollectionSource, RunInput};
pub use error::ReconError;
pub use model::{FileReport, RecordCollection, RunReport, Side, Verdict};
pub use value::FieldValue;
