//! [`CodeBuilder`], the line and block writer every generator renders with.

mod code_builder;

pub use code_builder::CodeBuilder;
