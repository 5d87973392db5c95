//! Line-oriented builder for generated source text.

/// Accumulates indented lines of generated code.
///
/// Every method takes `&mut self` and returns it, so generators can chain
/// calls inside loops over tables and columns.
///
/// ```
/// use tablegen_codegen::builder::CodeBuilder;
///
/// let mut b = CodeBuilder::typescript();
/// b.push_block("export type Users = {", "};", |b| {
///     b.push_line("id?: number;");
/// });
/// assert_eq!(b.build(), "export type Users = {\n  id?: number;\n};\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    unit: &'static str,
    depth: usize,
    buffer: String,
}

impl CodeBuilder {
    /// Builder indenting by `unit` per level.
    pub fn with_unit(unit: &'static str) -> Self {
        Self {
            unit,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn java() -> Self {
        Self::with_unit("    ")
    }

    pub fn typescript() -> Self {
        Self::with_unit("  ")
    }

    pub fn sql() -> Self {
        Self::with_unit("    ")
    }

    pub fn push_line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.buffer.push_str(self.unit);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    pub fn push_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> &mut Self {
        lines.into_iter().for_each(|line| {
            self.push_line(line);
        });
        self
    }

    /// Empty line, never indented.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// One level out; stays at column zero when already there.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// `/** text */` on one line.
    pub fn push_jsdoc(&mut self, text: &str) -> &mut Self {
        self.push_line(&format!("/** {text} */"))
    }

    /// `/** ... */` block, one ` * ` line per entry. Empty entries become a
    /// bare ` *`.
    pub fn push_doc_block<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> &mut Self {
        self.push_line("/**");
        for line in lines {
            match line {
                "" => self.push_line(" *"),
                text => self.push_line(&format!(" * {text}")),
            };
        }
        self.push_line(" */")
    }

    /// `header`, the body written by `f` one level deeper, then `close`.
    pub fn push_block(
        &mut self,
        header: &str,
        close: &str,
        f: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.push_line(header).push_indent();
        f(self);
        self.push_dedent().push_line(close)
    }

    pub fn build(self) -> String {
        self.buffer
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::java()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let mut b = CodeBuilder::java();
        b.push_block("public class Users extends BaseModel {", "}", |b| {
            b.push_block("public Long getId() {", "}", |b| {
                b.push_line("return id;");
            });
        });
        assert_eq!(
            b.build(),
            "public class Users extends BaseModel {\n    public Long getId() {\n        return id;\n    }\n}\n"
        );
    }

    #[test]
    fn test_doc_block() {
        let mut b = CodeBuilder::typescript();
        b.push_indent().push_doc_block(["ユーザー", "", "@see users"]);
        assert_eq!(b.build(), "  /**\n   * ユーザー\n   *\n   * @see users\n   */\n");
    }

    #[test]
    fn test_sql_lines() {
        let mut b = CodeBuilder::sql();
        b.push_line("SELECT")
            .push_indent()
            .push_lines(["t0.id AS t0_id,", "t0.name AS t0_name"])
            .push_dedent()
            .push_line("FROM users AS t0")
            .push_blank()
            .push_jsdoc("done");
        assert_eq!(
            b.build(),
            "SELECT\n    t0.id AS t0_id,\n    t0.name AS t0_name\nFROM users AS t0\n\n/** done */\n"
        );
    }

    #[test]
    fn test_dedent_stops_at_zero() {
        let mut b = CodeBuilder::with_unit("\t");
        b.push_dedent().push_line("x").push_indent().push_line("y");
        assert_eq!(b.build(), "x\n\ty\n");
    }
}
