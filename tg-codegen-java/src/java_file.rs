//! JavaFile abstraction for structured Java file generation.
//!
//! A file is a package declaration, sorted imports, static imports and
//! a body written through a [`CodeBuilder`].

use std::collections::BTreeSet;

use tablegen_codegen::builder::CodeBuilder;

/// A Java compilation unit.
///
/// # Example
///
/// ```
/// use tablegen_codegen_java::JavaFile;
///
/// let code = JavaFile::new("models")
///     .import("lombok.Getter")
///     .import("io.ebean.Model")
///     .render(|b| {
///         b.push_line("public class A extends Model {}");
///     });
/// assert_eq!(
///     code,
///     "package models;\n\nimport io.ebean.Model;\nimport lombok.Getter;\n\npublic class A extends Model {}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct JavaFile {
    package: String,
    imports: BTreeSet<String>,
    static_imports: BTreeSet<String>,
}

impl JavaFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: BTreeSet::new(),
            static_imports: BTreeSet::new(),
        }
    }

    /// Add an import (`java.util.List`).
    pub fn import(mut self, path: impl Into<String>) -> Self {
        self.add_import(path);
        self
    }

    /// Add an import when `condition` holds.
    pub fn import_if(self, condition: bool, path: impl Into<String>) -> Self {
        if condition { self.import(path) } else { self }
    }

    /// Add several imports.
    pub fn imports<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.add_import(path);
        }
        self
    }

    /// Add a static import (`java.util.concurrent.CompletableFuture.supplyAsync`).
    pub fn static_import(mut self, path: impl Into<String>) -> Self {
        self.static_imports.insert(path.into());
        self
    }

    /// Add an import (mutable).
    pub fn add_import(&mut self, path: impl Into<String>) -> &mut Self {
        self.imports.insert(path.into());
        self
    }

    /// Render the package, the imports and then the body.
    pub fn render(&self, body: impl FnOnce(&mut CodeBuilder)) -> String {
        let mut b = CodeBuilder::java();
        b.push_line(&format!("package {};", self.package)).push_blank();

        for (keyword, group) in [
            ("import", &self.imports),
            ("import static", &self.static_imports),
        ] {
            if group.is_empty() {
                continue;
            }
            for path in group {
                b.push_line(&format!("{keyword} {path};"));
            }
            b.push_blank();
        }

        body(&mut b);
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_sorted_and_deduplicated() {
        let code = JavaFile::new("repository")
            .import("java.util.List")
            .import("io.ebean.DB")
            .import("java.util.List")
            .static_import("java.util.concurrent.CompletableFuture.supplyAsync")
            .render(|b| {
                b.push_line("class R {}");
            });
        assert_eq!(
            code,
            "package repository;\n\n\
             import io.ebean.DB;\n\
             import java.util.List;\n\n\
             import static java.util.concurrent.CompletableFuture.supplyAsync;\n\n\
             class R {}\n"
        );
    }

    #[test]
    fn test_no_imports() {
        let code = JavaFile::new("models")
            .import_if(false, "lombok.Data")
            .render(|b| {
                b.push_line("interface I {}");
            });
        assert_eq!(code, "package models;\n\ninterface I {}\n");
    }
}
