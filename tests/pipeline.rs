//! End-to-end lex → parse → compile scenarios (§8.5), driven through the
//! public `asrs::compile_source` entry point rather than hand-built trees.

use asrs::compiler::ast::NodeKind;
use asrs::diagnostics::global;
use asrs::options::{Option_, OptionSet};
use asrs::symbols::{SymbolDatabase, SymbolEntry};

#[test]
fn use_pragma_enables_binary_literals() {
    let options = OptionSet::new();
    let result = asrs::compile_source(
        "pragma.as",
        "use binary(1); var a = 0b1111101000;",
        &options,
        global(),
    );
    assert_eq!(result.error_count, 0);
    let root = result.root.expect("parse should succeed");
    let program = result.tree.get(root).children[0];
    let var_stmt = result.tree.get(program).children[0];
    assert_eq!(result.tree.get(var_stmt).kind, NodeKind::Var);
    let variable = result.tree.get(var_stmt).variables[0];
    let initializer = result.tree.get(variable).children[0];
    assert_eq!(result.tree.get(initializer).kind, NodeKind::Integer);
    assert_eq!(
        result.tree.get(initializer).payload.as_integer().map(|i| i.get()),
        Some(1000)
    );
}

#[test]
fn binary_literal_without_pragma_is_invalid() {
    let options = OptionSet::new();
    assert!(!options.is_set(Option_::Binary));
    let result = asrs::compile_source("pragma.as", "var a = 0b101;", &options, global());
    let root = result.root.expect("parse should still recover a tree");
    let program = result.tree.get(root).children[0];
    let var_stmt = result.tree.get(program).children[0];
    let variable = result.tree.get(var_stmt).variables[0];
    let initializer = result.tree.get(variable).children[0];
    assert_eq!(result.tree.get(initializer).kind, NodeKind::Integer);
    assert_eq!(
        result.tree.get(initializer).payload.as_integer().map(|i| i.get()),
        Some(-1)
    );
}

#[test]
fn unresolved_top_level_identifier_is_reported() {
    let options = OptionSet::new();
    let result = asrs::compile_source("names.as", "undeclaredThing;", &options, global());
    assert!(result.error_count >= 1);
}

#[test]
fn declared_variable_resolves_to_itself_through_full_pipeline() {
    let options = OptionSet::new();
    let result = asrs::compile_source("names.as", "var total = 1; total;", &options, global());
    assert_eq!(result.error_count, 0);
}

#[test]
fn identifier_unresolved_in_scope_falls_back_to_symbol_database() {
    let mut db = SymbolDatabase::new();
    db.insert(
        "",
        "Widget",
        SymbolEntry {
            type_name: "Class".to_string(),
            filename: "widget.as".to_string(),
            line: 1,
        },
    );
    let options = OptionSet::new();
    let result = asrs::compile_source_with_database("names.as", "Widget;", &options, global(), Some(&db));
    assert_eq!(result.error_count, 0);
}
