//! CSV reading and writing: crosswalk tables in, feature tables out.

mod read;
mod write;

pub use read::*;
pub use write::*;
