//! Library half of the `dashdiff` binary: artifact discovery, record
//! extraction, run settings and report rendering. Exposed so integration
//! tests and other tools can drive a comparison without the CLI.

pub mod extract;
pub mod index;
pub mod render;
pub mod settings;
pub mod source;

pub use source::compare_folders;
