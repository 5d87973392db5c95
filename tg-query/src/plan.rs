//! Result shape of a query and everything the artifact generators need.

use tablegen_core::{SqlType, to_pascal_case};
use tablegen_schema::{Column, Table};
use tracing::debug;

use crate::{
    error::QueryError,
    params::{Parameter, extract_parameters},
    select::{SelectItem, split_select_list},
    sql::render_sql,
    state::QueryState,
};

/// How query results are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// One table with the default select list (or `alias.*`): the table's
    /// own record.
    Native,
    /// Exactly one result column, not from a wildcard: the bare value.
    Scalar,
    /// A record synthesized from the select list (`<Base>Dto`).
    Record,
}

/// One column of the query result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub expr: String,
    /// Output name: the select alias or a name derived from the expression.
    pub name: String,
    /// Schema column behind an `alias.column` reference, when resolvable.
    pub column: Option<Column>,
}

impl ResultColumn {
    pub fn sql_type(&self) -> Option<SqlType> {
        self.column.as_ref().map(Column::sql_type)
    }

    /// Logical name of the source column, or empty.
    pub fn logical_name(&self) -> &str {
        self.column
            .as_ref()
            .map_or("", |c| c.col_name_jp.as_str())
    }
}

/// Everything derived from a [`QueryState`] for artifact generation.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub kind: ResultKind,
    pub base_name: String,
    /// Table name behind a [`ResultKind::Native`] result.
    pub native_table: Option<String>,
    pub columns: Vec<ResultColumn>,
    /// The statement with the select list in effect.
    pub sql: String,
    /// The statement the generated repository runs: `alias.*` for a
    /// native result, the select list otherwise.
    pub repository_sql: String,
    /// Parameters of [`Self::repository_sql`].
    pub parameters: Vec<Parameter>,
}

/// Base name of every query artifact.
///
/// The table's type name for a native result, `<FirstTable>Custom`
/// otherwise, `CustomQuery` without any table.
pub fn base_name(state: &QueryState, native: bool) -> String {
    match state.selected_tables.first() {
        Some(first) if native => to_pascal_case(&first.table_name),
        Some(first) => format!("{}Custom", to_pascal_case(&first.table_name)),
        None => "CustomQuery".to_string(),
    }
}

impl QueryPlan {
    pub fn build(state: &QueryState, tables: &[Table]) -> Result<Self, QueryError> {
        let first = state
            .selected_tables
            .first()
            .ok_or(QueryError::EmptySelection)?;

        let select = state.select_list(tables);
        let whole_table = select.trim() == format!("{}.*", first.alias);
        let native = state.selected_tables.len() == 1
            && (whole_table || !state.is_select_edited(tables));
        let (columns, wildcard) = result_columns(state, tables, &select);

        let kind = if native {
            ResultKind::Native
        } else if columns.len() == 1 && !wildcard {
            ResultKind::Scalar
        } else {
            ResultKind::Record
        };

        let repository_sql = if native {
            render_sql(state, &format!("{}.*", first.alias))
        } else {
            render_sql(state, &select)
        };
        let parameters = extract_parameters(&repository_sql);
        let base_name = base_name(state, native);
        debug!(
            base = %base_name,
            ?kind,
            columns = columns.len(),
            parameters = parameters.len(),
            "planned query artifacts"
        );

        Ok(Self {
            kind,
            base_name,
            native_table: native.then(|| first.table_name.clone()),
            columns,
            sql: render_sql(state, &select),
            repository_sql,
            parameters,
        })
    }

    pub fn dto_name(&self) -> String {
        format!("{}Dto", self.base_name)
    }

    /// The single result column of a [`ResultKind::Scalar`] result.
    pub fn scalar(&self) -> Option<&ResultColumn> {
        match self.kind {
            ResultKind::Scalar => self.columns.first(),
            _ => None,
        }
    }

    /// Parameters that appear in method signatures.
    pub fn signature_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| !p.is_derived)
    }

    /// Contents of the `.sql` file: the statement and a terminating `;`.
    pub fn sql_file(&self) -> String {
        format!("{};\n", self.sql.trim_end())
    }
}

/// Result columns of `select`, and whether it contains a wildcard.
/// `alias.*` and `*` expand to the columns of the tables behind them.
fn result_columns(
    state: &QueryState,
    tables: &[Table],
    select: &str,
) -> (Vec<ResultColumn>, bool) {
    let mut columns = Vec::new();
    let mut wildcard = false;
    for item in split_select_list(select) {
        let item = SelectItem::parse(item);
        if let Some(aliases) = wildcard_aliases(state, item.expr) {
            wildcard = true;
            for alias in aliases {
                let Some(table) = state.definition(tables, alias) else {
                    continue;
                };
                columns.extend(table.columns.iter().map(|col| ResultColumn {
                    expr: format!("{alias}.{}", col.col_name),
                    name: col.col_name.clone(),
                    column: Some(col.clone()),
                }));
            }
            continue;
        }
        let column = item.column_reference().and_then(|(alias, column)| {
            state
                .definition(tables, alias)
                .and_then(|table| table.column(column))
                .cloned()
        });
        columns.push(ResultColumn {
            expr: item.expr.to_string(),
            name: item.output_name(),
            column,
        });
    }
    (columns, wildcard)
}

/// Aliases covered by a `*` or `alias.*` item; `None` for other items.
fn wildcard_aliases<'s>(state: &'s QueryState, expr: &'s str) -> Option<Vec<&'s str>> {
    if expr == "*" {
        return Some(
            state
                .selected_tables
                .iter()
                .map(|t| t.alias.as_str())
                .collect(),
        );
    }
    let alias = expr.strip_suffix(".*")?;
    let plain = !alias.is_empty() && alias.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    plain.then(|| vec![alias])
}
