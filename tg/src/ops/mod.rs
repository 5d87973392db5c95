//! Core operations.
//!
//! This module contains the business logic for tg commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;
pub mod preview;
pub mod query;

pub use check::check;
pub use generate::generate;
pub use preview::preview;
pub use query::query;
