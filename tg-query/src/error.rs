use thiserror::Error;

/// Errors raised by [`QueryState`](crate::QueryState) operations.
///
/// A failed operation never leaves the state partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("at least two tables must be selected to add a join")]
    JoinNeedsTwoTables,

    #[error("no table is selected")]
    EmptySelection,

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("table '{0}' has no columns")]
    TableHasNoColumns(String),

    #[error("no selected table has alias '{0}'")]
    UnknownAlias(String),

    #[error("table index {index} out of range ({len} selected)")]
    TableIndexOutOfRange { index: usize, len: usize },

    #[error("join index {index} out of range ({len} joins)")]
    JoinIndexOutOfRange { index: usize, len: usize },

    #[error("sort index {index} out of range ({len} sorts)")]
    SortIndexOutOfRange { index: usize, len: usize },

    #[error("filter index {index} out of range ({len} filters)")]
    FilterIndexOutOfRange { index: usize, len: usize },
}
