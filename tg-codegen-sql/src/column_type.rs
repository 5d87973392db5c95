//! Rendering of column types in DDL.

use tablegen_schema::Column;

/// DDL type of a column: the source type upper-cased, with the length
/// for `varchar` and `char`.
pub fn render_column_type(column: &Column) -> String {
    let ty = column.type_name();
    match (ty.as_str(), column.length()) {
        ("varchar" | "char", Some(len)) => format!("{}({len})", ty.to_uppercase()),
        _ => ty.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_column_type() {
        let col = Column::new("name", "", "varchar").with_length("255");
        assert_eq!(render_column_type(&col), "VARCHAR(255)");

        let col = Column::new("code", "", "CHAR").with_length("3");
        assert_eq!(render_column_type(&col), "CHAR(3)");

        let col = Column::new("name", "", "varchar");
        assert_eq!(render_column_type(&col), "VARCHAR");

        let col = Column::new("amount", "", "numeric").with_length("10,2");
        assert_eq!(render_column_type(&col), "NUMERIC");

        let col = Column::new("created_at", "", "timestamp");
        assert_eq!(render_column_type(&col), "TIMESTAMP");
    }
}
