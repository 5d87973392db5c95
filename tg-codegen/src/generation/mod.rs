//! Output management.
//!
//! - [`Format`] - Identifiers of the artifact formats
//! - [`FileRegistry`] - Collects artifacts across generators and writes them

mod format;
mod registry;

pub use format::Format;
pub use registry::{FileRegistry, WriteStats};
