//! Multi-table query composition.
//!
//! A [`QueryState`] is edited through explicit operations (tables, joins,
//! filters, sorts, paging) and rendered with [`render_sql`]. A
//! [`QueryPlan`] then classifies the result (native record, scalar or
//! synthesized record) and extracts the bind [`Parameter`]s the
//! generated repository has to bind.

mod alias;
mod error;
mod join;
mod params;
mod plan;
mod script;
mod select;
mod sql;
mod state;

pub use alias::alias_for;
pub use error::QueryError;
pub use join::{InferredJoin, JOIN_PLACEHOLDER, JoinRule, MISSING_DEFINITION, infer_join};
pub use params::{ParamType, Parameter, extract_parameters};
pub use plan::{QueryPlan, ResultColumn, ResultKind, base_name};
pub use script::{QueryScript, SortStep, TableStep};
pub use select::{SelectItem, column_reference, default_select_list, split_select_list};
pub use sql::render_sql;
pub use state::{
    Join, JoinType, JoinUpdate, QueryState, SelectedTable, Shift, Sort, SortDirection, SortUpdate,
};
