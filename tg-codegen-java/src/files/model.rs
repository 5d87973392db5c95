//! models/<Table>.java generator.

use tablegen_codegen::{builder::CodeBuilder, language::GenerationContext};
use tablegen_core::{GeneratedFile, Precision, SqlType, contains_any_keyword};
use tablegen_schema::{Column, Table};

use super::{NAMING, java_import, java_type, logical_name};
use crate::java_file::JavaFile;

/// Not-null string columns whose name contains one of these may be empty.
const MIN_LENGTH_EXEMPT: &[&str] = &["description", "note", "remarks"];

/// Ebean entity of one table. Common columns live in `BaseModel`.
pub struct ModelJava<'a> {
    table: &'a Table,
    ctx: &'a GenerationContext,
}

impl<'a> ModelJava<'a> {
    pub fn new(table: &'a Table, ctx: &'a GenerationContext) -> Self {
        Self { table, ctx }
    }

    fn class_name(&self) -> String {
        NAMING.type_name(&self.table.table_name)
    }
}

/// Bean validation annotations of a column, with the imports they need.
fn annotations(col: &Column) -> Vec<(String, &'static str)> {
    let mut out = Vec::new();
    let ty = col.sql_type();

    if col.is_not_null() {
        out.push((
            "@NotNull".to_string(),
            "javax.validation.constraints.NotNull",
        ));
    }

    if ty == SqlType::Text {
        let mut size = Vec::new();
        if col.is_not_null() && !contains_any_keyword(&col.col_name, MIN_LENGTH_EXEMPT) {
            size.push("min = 1".to_string());
        }
        if let Some(max) = col.length().and_then(|l| l.parse::<u32>().ok()) {
            size.push(format!("max = {max}"));
        }
        if !size.is_empty() {
            out.push((
                format!("@Size({})", size.join(", ")),
                "javax.validation.constraints.Size",
            ));
        }
    }

    if matches!(col.type_name().as_str(), "numeric" | "decimal")
        && let Some(p) = col.length().and_then(Precision::parse)
    {
        out.push((
            format!(
                "@Digits(integer = {}, fraction = {})",
                p.integer_digits(),
                p.scale
            ),
            "javax.validation.constraints.Digits",
        ));
    }

    out
}

impl GeneratedFile for ModelJava<'_> {
    fn path(&self) -> String {
        format!("models/{}.java", self.class_name())
    }

    fn render(&self) -> String {
        let class_name = self.class_name();
        let tenant_scoped = self.ctx.is_tenant_scoped(self.table);
        let columns: Vec<&Column> = self.ctx.own_columns(self.table).collect();

        let mut file = JavaFile::new("models").imports([
            "io.ebean.Finder",
            "jakarta.persistence.Entity",
            "jakarta.persistence.Table",
            "lombok.Getter",
            "lombok.Setter",
        ]);
        for col in &columns {
            if let Some(import) = java_import(col) {
                file.add_import(import);
            }
            for (_, import) in annotations(col) {
                file.add_import(import);
            }
        }

        file.render(|b| {
            b.push_doc_block([logical_name(self.table)]);
            b.push_lines(["@Entity", "@Getter", "@Setter"]);
            b.push_line(&format!("@Table(name = \"{}\")", self.table.table_name));

            let implements = if tenant_scoped { " implements RlsAware" } else { "" };
            b.push_block(
                &format!("public class {class_name} extends BaseModel{implements} {{"),
                "}",
                |b| {
                    b.push_blank();
                    for col in &columns {
                        push_field(b, col);
                        b.push_blank();
                    }
                    if tenant_scoped {
                        self.push_tenant_getter(b);
                        b.push_blank();
                    }
                    b.push_line(&format!(
                        "public static Finder<Long, {class_name}> find = new Finder<>({class_name}.class);"
                    ));
                },
            );
        })
    }
}

impl ModelJava<'_> {
    fn push_tenant_getter(&self, b: &mut CodeBuilder) {
        let tenant = &self.ctx.rls.tenant_id_column;
        let field = NAMING.field_name(tenant);
        let is_string = self
            .table
            .column(tenant)
            .is_some_and(|c| java_type(c) == "String");

        b.push_line("@Override");
        b.push_block("public String getTenantId() {", "}", |b| {
            if is_string {
                b.push_line(&format!("return this.{field};"));
            } else {
                b.push_line(&format!(
                    "return this.{field} == null ? null : String.valueOf(this.{field});"
                ));
            }
        });
    }
}

fn push_field(b: &mut CodeBuilder, col: &Column) {
    if !col.col_name_jp.is_empty() {
        b.push_doc_block([col.col_name_jp.as_str()]);
    }
    for (annotation, _) in annotations(col) {
        b.push_line(&annotation);
    }
    b.push_line(&format!(
        "public {} {};",
        java_type(col),
        NAMING.field_name(&col.col_name)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(col: Column) -> Vec<String> {
        annotations(&col).into_iter().map(|(a, _)| a).collect()
    }

    #[test]
    fn test_string_annotations() {
        let col = Column::new("user_name", "", "varchar")
            .with_length("255")
            .with_constraint("NN");
        assert_eq!(rendered(col), ["@NotNull", "@Size(min = 1, max = 255)"]);

        let col = Column::new("note", "", "text").with_constraint("NN");
        assert_eq!(rendered(col), ["@NotNull"]);

        let col = Column::new("code", "", "char").with_length("3");
        assert_eq!(rendered(col), ["@Size(max = 3)"]);
    }

    #[test]
    fn test_numeric_annotations() {
        let col = Column::new("budget", "", "numeric").with_length("12,2");
        assert_eq!(rendered(col), ["@Digits(integer = 10, fraction = 2)"]);

        let col = Column::new("qty", "", "integer").with_length("4");
        assert!(rendered(col).is_empty());
    }

    #[test]
    fn test_tenant_scoped_model() {
        let mut config = tablegen_schema::Config::default();
        config.export.rls.enabled = true;
        let ctx = GenerationContext::from_config(&config);
        let table = Table::new("orders", "Orders")
            .with_column(Column::new("id", "ID", "bigserial").with_pkfk("PK"))
            .with_column(Column::new("tenant_id", "Tenant", "bigint"));

        let code = ModelJava::new(&table, &ctx).render();
        assert!(code.contains("public class Orders extends BaseModel implements RlsAware {\n"));
        assert!(code.contains(
            "        return this.tenantId == null ? null : String.valueOf(this.tenantId);\n"
        ));
        assert!(!code.contains("public Long id;"));
    }
}
