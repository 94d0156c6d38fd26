//! Front-end library for the dialect described by the compiler pass in
//! [`compiler::checker`]: lexer, parser, AST arena, and semantic pass, plus
//! the ambient resource-config/symbol-database/diagnostics stack the CLI
//! binary wires together.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod host;
pub mod numbers;
pub mod options;
pub mod pjson;
pub mod symbols;

use std::cell::RefCell;

use compiler::ast::{NodeId, Tree};
use compiler::checker::ScriptRetriever;
use compiler::parser::Parser;
use compiler::scanner::Scanner;
use diagnostics::DiagnosticSink;
use options::OptionSet;
use symbols::SymbolDatabase;

/// Result of running one file through lex → parse → compile.
pub struct CompileResult {
    pub tree: Tree,
    pub root: Option<NodeId>,
    pub error_count: u64,
}

/// Lexes, parses, and compiles `source`, using a fresh [`OptionSet`] seeded
/// from `options` (pragma mutations during parsing affect this copy only).
///
/// Scanner and parser share one `OptionSet` for the duration of the parse —
/// the scanner reads it on every token, the parser writes it on `use`
/// pragmas — so it's wrapped in a `RefCell` and handed to both as a shared
/// reference; each side only ever holds a short borrow rather than the two
/// of them holding live overlapping references to the same value.
pub fn compile_source(filename: &str, source: &str, options: &OptionSet, sink: &dyn DiagnosticSink) -> CompileResult {
    compile_source_with_database(filename, source, options, sink, None)
}

/// Same as [`compile_source`], but resolves identifiers the checker can't
/// find in scope against `db` before giving up with `NOT_FOUND`. The
/// checker pass runs exactly once here — callers that need database-backed
/// lookups should use this entry point rather than running the checker a
/// second time over an already-compiled tree, which would re-rewrite
/// already-rewritten operator-overload call nodes.
pub fn compile_source_with_database(
    filename: &str,
    source: &str,
    options: &OptionSet,
    sink: &dyn DiagnosticSink,
    db: Option<&SymbolDatabase>,
) -> CompileResult {
    compile_source_with_host(filename, source, options, sink, db, None)
}

/// Same as [`compile_source_with_database`], additionally resolving
/// `import` statements against `retriever` (§4.7.3). `None` reproduces the
/// original's "default implementation returns nullptr" — no imports
/// resolvable — exactly as the two entry points above do.
pub fn compile_source_with_host(
    filename: &str,
    source: &str,
    options: &OptionSet,
    sink: &dyn DiagnosticSink,
    db: Option<&SymbolDatabase>,
    retriever: Option<&dyn ScriptRetriever>,
) -> CompileResult {
    let mut tree = Tree::new();
    let options = RefCell::new(options.clone());

    let scanner = Scanner::new(filename, source, &options, sink);
    let mut parser = Parser::new(scanner, &mut tree, &options, sink);

    let root = parser.parse();
    let error_count = match root {
        Some(root) => compiler::checker::compile_with_host(&mut tree, root, sink, db, retriever),
        None => sink.error_count(),
    };

    CompileResult {
        tree,
        root,
        error_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::global;

    #[test]
    fn compiles_a_trivial_program_without_errors() {
        let options = OptionSet::new();
        let result = compile_source("test.as", "var x = 1;", &options, global());
        assert!(result.root.is_some());
        assert_eq!(result.error_count, 0);
    }

    /// A fixture retriever (§4.7.3's "a test fixture supplies alternatives")
    /// backed by an in-memory map of filename to source.
    struct FixtureRetriever(std::collections::HashMap<&'static str, &'static str>);

    impl ScriptRetriever for FixtureRetriever {
        fn retrieve(&self, filename: &str) -> Option<String> {
            self.0.get(filename).map(|s| s.to_string())
        }
    }

    #[test]
    fn import_without_a_retriever_leaves_the_name_unresolved() {
        let options = OptionSet::new();
        let source = "import shapes.Circle;\nvar c = Circle;";
        let result = compile_source("test.as", source, &options, global());
        assert!(result.error_count >= 1);
    }

    #[test]
    fn import_resolves_declarations_via_a_fixture_retriever() {
        let options = OptionSet::new();
        let retriever = FixtureRetriever(std::collections::HashMap::from([(
            "shapes/Circle.as",
            "class Circle {\n  var radius;\n}\n",
        )]));
        let source = "import shapes.Circle;\nvar c = Circle;";
        let result = compile_source_with_host("test.as", source, &options, global(), None, Some(&retriever));
        assert_eq!(result.error_count, 0);
    }
}
