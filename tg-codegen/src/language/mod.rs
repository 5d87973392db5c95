//! Language-specific abstractions.
//!
//! - [`Generator`] - Trait every artifact generator implements
//! - [`GenerationContext`] - Configuration resolved once per run
//! - [`NamingConvention`] - Language-specific naming rules

mod context;
mod naming;
mod traits;

pub use context::GenerationContext;
pub use naming::NamingConvention;
pub use traits::Generator;
