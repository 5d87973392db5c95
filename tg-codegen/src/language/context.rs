//! Configuration resolved once per generation run.

use tablegen_schema::{Column, CommonColumns, Config, RlsConfig, Table};

/// Settings every generator reads, resolved from a [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationContext {
    pub common: CommonColumns,
    pub rls: RlsConfig,
    pub include_count_method: bool,
}

impl GenerationContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            common: config.common_columns.clone().normalized(),
            rls: config.export.rls.clone(),
            include_count_method: config.sql.include_count_method,
        }
    }

    /// Whether a column is one of the shared common columns.
    pub fn is_common(&self, column: &Column) -> bool {
        self.common.is_common(&column.col_name)
    }

    /// Columns of `table` that are not common columns, in column order.
    pub fn own_columns<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = &'a Column> {
        table.columns.iter().filter(move |c| !self.is_common(c))
    }

    /// Whether RLS is enabled and `table` carries the tenant column.
    pub fn is_tenant_scoped(&self, table: &Table) -> bool {
        self.rls.enabled && table.has_column(&self.rls.tenant_id_column)
    }

    /// Whether `table` carries the soft-delete flag column.
    pub fn has_delete_flag(&self, table: &Table) -> bool {
        table.has_column(&self.common.is_deleted.name)
    }
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new("users", "Users")
            .with_column(Column::new("id", "ID", "bigserial").with_pkfk("PK"))
            .with_column(Column::new("tenant_id", "Tenant", "varchar"))
            .with_column(Column::new("name", "Name", "varchar"))
            .with_column(Column::new("is_deleted", "Deleted", "boolean"))
    }

    #[test]
    fn test_own_columns_skip_common() {
        let ctx = GenerationContext::default();
        let table = table();
        let names: Vec<_> = ctx.own_columns(&table).map(|c| c.col_name.as_str()).collect();
        assert_eq!(names, ["tenant_id", "name"]);
        assert!(ctx.has_delete_flag(&table));
    }

    #[test]
    fn test_tenant_scope_requires_rls() {
        let mut config = Config::default();
        let ctx = GenerationContext::from_config(&config);
        assert!(!ctx.is_tenant_scoped(&table()));

        config.export.rls.enabled = true;
        let ctx = GenerationContext::from_config(&config);
        assert!(ctx.is_tenant_scoped(&table()));
        assert!(!ctx.is_tenant_scoped(&Table::new("logs", "Logs")));
    }
}
