//! Snapshot tests for DDL generation.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use pretty_assertions::assert_eq;
use tablegen_codegen::{
    language::Generator,
    testing::{default_context, sample_tables},
};
use tablegen_codegen_sql::{DdlGenerator, PlayEvolutionGenerator};
use tablegen_core::Artifact;
use tablegen_schema::{Column, Table};

fn generate_one(generator: &impl Generator, tables: &[Table]) -> Artifact {
    let mut artifacts = generator
        .generate(tables, &default_context())
        .expect("generation failed");
    assert_eq!(artifacts.len(), 1);
    artifacts.remove(0)
}

#[test]
fn test_ddl_single_table() {
    let tables = sample_tables();
    let ddl = generate_one(&DdlGenerator, &tables[1..]);

    assert_eq!(ddl.path, "schema.sql");
    insta::assert_snapshot!("ddl_departments", ddl.content);
}

#[test]
fn test_ddl_all_tables_in_order() {
    let ddl = generate_one(&DdlGenerator, &sample_tables()).content;

    let users = ddl.find("CREATE TABLE users (").unwrap();
    let departments = ddl.find("CREATE TABLE departments (").unwrap();
    assert!(users < departments);
    assert!(ddl.contains("    user_name VARCHAR(255) NOT NULL UNIQUE,\n"));
    assert!(ddl.contains("    is_active BOOLEAN NOT NULL DEFAULT true,\n"));
    assert!(ddl.contains("    CONSTRAINT users_ak UNIQUE (user_name)\n);"));
    assert!(ddl.contains("CREATE INDEX users_idx4 ON users (department_id);\n"));
    assert_eq!(ddl.matches("-- ----").count(), 2);
}

#[test]
fn test_ddl_empty_tables() {
    let ddl = generate_one(&DdlGenerator, &[]);
    assert_eq!(ddl.content, "");
}

#[test]
fn test_ddl_is_deterministic() {
    let tables = sample_tables();
    assert_eq!(
        generate_one(&DdlGenerator, &tables),
        generate_one(&DdlGenerator, &tables)
    );
}

#[test]
fn test_ddl_index_group_order_follows_ordinals() {
    let mut table = Table::new("logs", "ログ")
        .with_column(Column::new("a", "A", "text").with_index(1, "2"))
        .with_column(Column::new("b", "B", "text").with_index(1, "1"));
    table.rebuild_indexes();

    let ddl = generate_one(&DdlGenerator, &[table]).content;
    assert!(ddl.contains("CREATE INDEX logs_idx1 ON logs (b, a);"));
    assert!(ddl.contains("COMMENT ON TABLE logs IS 'ログ';"));
}

#[test]
fn test_play_evolution() {
    let evolution = generate_one(&PlayEvolutionGenerator, &sample_tables());
    assert_eq!(evolution.path, "evolutions/1.sql");

    let content = evolution.content;
    assert!(content.starts_with("# --- !Ups\n\nCREATE TABLE users (\n"));
    let (ups, downs) = content.split_once("# --- !Downs\n\n").unwrap();
    assert!(!ups.contains("DROP TABLE"));
    assert_eq!(
        downs,
        "DROP TABLE IF EXISTS departments;\nDROP TABLE IF EXISTS users;\n"
    );
}
