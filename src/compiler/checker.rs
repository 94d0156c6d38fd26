//! The compiler pass (component G, §4.7): a post-parse traversal that
//! decorates the tree with semantic links and resolves overloadable
//! operators against user types. Scope resolution walks a stack of
//! name tables (function → class/package/namespace → program) the way the
//! scanner/parser pair shares one `OptionSet` — a small piece of mutable
//! state threaded through a single-pass traversal rather than a separate
//! symbol-table builder.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::diagnostics::{Code, DiagnosticSink, Level, Message, Position};
use crate::options::OptionSet;
use crate::symbols::SymbolDatabase;

use super::ast::{Attributes, Link, NodeId, NodeKind, Tree};
use super::operators::rewrites_to_call;
use super::parser::Parser;
use super::scanner::Scanner;

type Scope = HashMap<String, NodeId>;

/// Pluggable interface the compiler pass uses to open an imported script's
/// source (§4.7.3). The original's default implementation "returns
/// nullptr (no imports resolvable)"; [`NullRetriever`] is that default,
/// and a test fixture (or a future multi-file driver) supplies a real one.
pub trait ScriptRetriever {
    fn retrieve(&self, filename: &str) -> Option<String>;
}

/// The default [`ScriptRetriever`]: no imports are ever resolvable.
pub struct NullRetriever;

impl ScriptRetriever for NullRetriever {
    fn retrieve(&self, _filename: &str) -> Option<String> {
        None
    }
}

/// Runs the compiler pass over `root` (a `ROOT` node whose first child is
/// the `PROGRAM`), returning the number of errors recorded during this
/// call. A return of 0 means the tree is fully decorated (§4.7.6).
pub fn compile(tree: &mut Tree, root: NodeId, sink: &dyn DiagnosticSink) -> u64 {
    compile_with_database(tree, root, sink, None)
}

/// As [`compile`], but consulting `db` when a name is not found in any
/// lexical scope (§4.7.1/§4.7.4's "program → symbol DB" tail of the lookup
/// chain).
pub fn compile_with_database(
    tree: &mut Tree,
    root: NodeId,
    sink: &dyn DiagnosticSink,
    db: Option<&SymbolDatabase>,
) -> u64 {
    compile_with_host(tree, root, sink, db, None)
}

/// As [`compile_with_database`], additionally resolving `import` statements
/// against `retriever` (§4.7.3). Every entry point above passes `None`,
/// matching the original's "default implementation returns nullptr".
pub fn compile_with_host(
    tree: &mut Tree,
    root: NodeId,
    sink: &dyn DiagnosticSink,
    db: Option<&SymbolDatabase>,
    retriever: Option<&dyn ScriptRetriever>,
) -> u64 {
    let mut checker = Checker {
        tree,
        sink,
        db,
        retriever,
        scopes: Vec::new(),
        current_package: None,
        importing: Vec::new(),
        errors: 0,
    };
    if let Some(&program) = checker.tree.get(root).children.first() {
        checker.visit_scope_owner(program);
    }
    checker.errors
}

struct Checker<'a> {
    tree: &'a mut Tree,
    sink: &'a dyn DiagnosticSink,
    db: Option<&'a SymbolDatabase>,
    retriever: Option<&'a dyn ScriptRetriever>,
    scopes: Vec<Scope>,
    current_package: Option<String>,
    /// Filenames currently being retrieved, guarding against an import
    /// cycle re-entering `resolve_import` for the same script.
    importing: Vec<String>,
    errors: u64,
}

impl<'a> Checker<'a> {
    fn position_of(&self, node: NodeId) -> Position {
        self.tree.get(node).position.clone()
    }

    fn emit_error(&mut self, node: NodeId, code: Code, text: impl Into<String>) {
        let position = self.position_of(node);
        Message::new(Level::Error, code, position, self.sink)
            .append_str(&text.into())
            .emit();
        self.errors += 1;
    }

    // -- scope bookkeeping ------------------------------------------------

    /// The statement list that carries `owner`'s declarations: `PROGRAM`'s
    /// own children, or the trailing `DIRECTIVE_LIST` body of a
    /// class/interface/package/namespace/function.
    fn declaration_statements(&self, owner: NodeId) -> Vec<NodeId> {
        let node = self.tree.get(owner);
        if node.kind == NodeKind::Program {
            return node.children.clone();
        }
        node.children
            .iter()
            .rev()
            .find(|&&c| self.tree.get(c).kind == NodeKind::DirectiveList)
            .map(|&body| self.tree.get(body).children.clone())
            .unwrap_or_default()
    }

    fn collect_declaration(&self, node: NodeId, scope: &mut Scope) {
        let data = self.tree.get(node);
        match data.kind {
            NodeKind::Var => {
                for &variable in &data.variables {
                    let name = self.tree.get_string(variable);
                    scope.entry(name.to_string()).or_insert(variable);
                }
            }
            NodeKind::Function
            | NodeKind::Class
            | NodeKind::Interface
            | NodeKind::Enum
            | NodeKind::Import
            | NodeKind::Package
            | NodeKind::Namespace
            | NodeKind::Variable => {
                let name = self.tree.get_string(node);
                scope.entry(name.to_string()).or_insert(node);
            }
            _ => {}
        }
    }

    /// Declarations directly owned by `owner` (its statement list, plus its
    /// `PARAMS` child when `owner` is a `FUNCTION`).
    fn collect_scope(&self, owner: NodeId) -> Scope {
        let mut scope = Scope::new();
        for statement in self.declaration_statements(owner) {
            self.collect_declaration(statement, &mut scope);
        }
        if self.tree.get(owner).kind == NodeKind::Function {
            if let Some(&params) = self.tree.get(owner).children.first() {
                if self.tree.get(params).kind == NodeKind::Params {
                    for &param in &self.tree.get(params).children.clone() {
                        let name = self.tree.get_string(param);
                        scope.entry(name.to_string()).or_insert(param);
                    }
                }
            }
        }
        scope
    }

    /// Nearest-scope-first lookup across the active scope chain, falling
    /// back to the symbol database for the current package (§4.7.4).
    fn lookup(&self, name: &str) -> Option<NodeId> {
        for scope in self.scopes.iter().rev() {
            if let Some(&found) = scope.get(name) {
                return Some(found);
            }
        }
        None
    }

    /// Symbol-database fallback for the tail of §4.7.4's lookup chain
    /// ("…→ program → symbol DB"). A name outside any `PACKAGE` is looked
    /// up under the empty package name, matching how `current_package`
    /// starts as `None` at the program's own top level.
    fn lookup_in_database(&self, name: &str) -> bool {
        let Some(db) = self.db else { return false };
        let package_name = self.current_package.as_deref().unwrap_or("");
        db.get_package(package_name)
            .and_then(|package| package.get(name))
            .is_some()
    }

    // -- traversal ----------------------------------------------------------

    /// Visits a node that owns its own scope: `PROGRAM`, `PACKAGE`,
    /// `NAMESPACE`, `CLASS`/`INTERFACE`, or `FUNCTION`.
    fn visit_scope_owner(&mut self, owner: NodeId) {
        let scope = self.collect_scope(owner);
        self.scopes.push(scope);

        let previous_package = if self.tree.get(owner).kind == NodeKind::Package {
            let name = self.tree.get_string(owner).to_string();
            std::mem::replace(&mut self.current_package, Some(name))
        } else {
            self.current_package.clone()
        };

        if matches!(
            self.tree.get(owner).kind,
            NodeKind::Program | NodeKind::Function
        ) {
            self.link_gotos(owner);
        }

        for statement in self.declaration_statements(owner) {
            self.visit(statement);
        }

        if self.tree.get(owner).kind == NodeKind::Package {
            self.current_package = previous_package;
        }
        self.scopes.pop();
    }

    fn visit(&mut self, node: NodeId) {
        let kind = self.tree.get(node).kind;
        match kind {
            NodeKind::Program
            | NodeKind::Package
            | NodeKind::Namespace
            | NodeKind::Class
            | NodeKind::Interface
            | NodeKind::Function => {
                self.visit_scope_owner(node);
                self.propagate_attributes(node);
            }
            NodeKind::Member => self.visit_member(node),
            NodeKind::Identifier => self.visit_identifier(node),
            NodeKind::Goto | NodeKind::Label => {
                // Resolved in bulk by `link_gotos` for the enclosing scope.
            }
            NodeKind::Import => self.resolve_import(node),
            NodeKind::Variable | NodeKind::Param => {
                for &child in &self.tree.get(node).children.clone() {
                    self.visit(child);
                }
                self.propagate_attributes(node);
            }
            _ => {
                for &child in &self.tree.get(node).children.clone() {
                    self.visit(child);
                }
                // `CALL` is in `is_overloadable_operator` (its `()` spelling
                // doubles as the functor-overload name), but a plain call
                // expression is resolved against its callee, not rewritten
                // the way binary/unary operators are.
                if kind == NodeKind::Call {
                    self.resolve_call(node);
                } else if kind.is_overloadable_operator() {
                    self.resolve_operator(node);
                }
            }
        }
    }

    fn visit_identifier(&mut self, node: NodeId) {
        // The member-name slot of a `MEMBER` node is resolved by
        // `visit_member`, not here; `visit` never reaches it directly
        // because `MEMBER`'s second child is skipped in `visit_member`.
        let name = self.tree.get_string(node).to_string();
        match self.lookup(&name) {
            Some(declaration) => {
                self.tree.set_link(node, Link::Instance, Some(declaration));
                if let Some(type_node) = self.tree.get_link(declaration, Link::Type) {
                    self.tree.set_link(node, Link::Type, Some(type_node));
                }
            }
            None => {
                if !self.lookup_in_database(&name) {
                    self.emit_error(node, Code::NotFound, format!("identifier '{name}' not found"));
                }
            }
        }
    }

    fn visit_member(&mut self, node: NodeId) {
        let children = self.tree.get(node).children.clone();
        let (Some(&object), Some(&name_node)) = (children.first(), children.get(1)) else {
            return;
        };
        self.visit(object);

        let name = self.tree.get_string(name_node).to_string();
        let Some(class_node) = self.tree.get_link(object, Link::Type) else {
            self.emit_error(node, Code::TypeNotLinked, "member access on an unresolved type");
            return;
        };
        let members = self.collect_scope(class_node);
        match members.get(&name) {
            Some(&member) => {
                self.tree.set_link(name_node, Link::Instance, Some(member));
                if let Some(type_node) = self.tree.get_link(member, Link::Type) {
                    self.tree.set_link(node, Link::Type, Some(type_node));
                }
            }
            None => {
                self.emit_error(node, Code::NotFound, format!("member '{name}' not found"));
            }
        }
    }

    fn resolve_call(&mut self, node: NodeId) {
        let Some(&callee) = self.tree.get(node).children.first() else {
            return;
        };
        let Some(instance) = self.tree.get_link(callee, Link::Instance) else {
            return;
        };
        if self.tree.get(instance).kind == NodeKind::Function {
            self.tree.set_link(node, Link::Instance, Some(instance));
            if let Some(type_node) = self.tree.get_link(instance, Link::Type) {
                self.tree.set_link(node, Link::Type, Some(type_node));
            }
            return;
        }
        // `f` names a class/interface instance: look for its `()` overload.
        let Some(class_node) = self.tree.get_link(callee, Link::Type) else {
            return;
        };
        let members = self.collect_scope(class_node);
        if let Some(&overload) = members.get(NodeKind::Call.operator_symbol(false)) {
            self.tree.set_link(node, Link::Instance, Some(overload));
            if let Some(type_node) = self.tree.get_link(overload, Link::Type) {
                self.tree.set_link(node, Link::Type, Some(type_node));
            }
        }
    }

    /// Operator-overload resolution (§4.7.4): if the left operand's type is
    /// a user class defining a matching overload, rewrite the operator node.
    fn resolve_operator(&mut self, node: NodeId) {
        let kind = self.tree.get(node).kind;
        let children = self.tree.get(node).children.clone();
        let Some(&left) = children.first() else {
            return;
        };
        let Some(class_node) = self.tree.get_link(left, Link::Type) else {
            return;
        };
        if !matches!(
            self.tree.get(class_node).kind,
            NodeKind::Class | NodeKind::Interface
        ) {
            return;
        }

        let is_prefix = matches!(kind, NodeKind::Increment | NodeKind::Decrement);
        let symbol = kind.operator_symbol(is_prefix);
        let members = self.collect_scope(class_node);
        let Some(&overload) = members.get(symbol) else {
            return;
        };

        if self.tree.get_attribute(overload, Attributes::NATIVE) {
            let _ = self.tree.set_attribute(node, Attributes::NATIVE, true);
            return;
        }

        let position = self.position_of(node);
        let return_type = self.tree.get_link(overload, Link::Type);

        let call = self.tree.alloc(NodeKind::Call, position.clone());
        self.tree.set_link(call, Link::Instance, Some(overload));
        if let Some(type_node) = return_type {
            self.tree.set_link(call, Link::Type, Some(type_node));
        }
        for &argument in &children {
            self.tree.append_child(call, argument);
        }

        let replacement = if rewrites_to_call(kind) {
            call
        } else {
            let assignment = self.tree.alloc(NodeKind::Assignment, position);
            self.tree.append_child(assignment, left);
            self.tree.append_child(assignment, call);
            if let Some(type_node) = return_type {
                self.tree.set_link(assignment, Link::Type, Some(type_node));
            }
            assignment
        };
        self.replace_node(node, replacement);
    }

    fn replace_node(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.tree.get(old).parent else {
            return;
        };
        if let Some(index) = self.tree.get(parent).children.iter().position(|&c| c == old) {
            self.tree.replace_child(parent, index, new);
        }
    }

    /// Synthesizes the `ATTRIBUTES` child a declaration inherits from its
    /// enclosing scope (§4.7.4) and links it via `attribute_node`. A no-op
    /// when the node carries no attributes (nothing to propagate).
    fn propagate_attributes(&mut self, node: NodeId) {
        let attributes = self.tree.get(node).attributes;
        if attributes.is_empty() {
            return;
        }
        let position = self.position_of(node);
        let marker = self.tree.alloc(NodeKind::Attributes, position);
        let _ = self.tree.set_attribute(marker, attributes, true);
        self.tree.append_child(node, marker);
        self.tree.set_link(node, Link::Attribute, Some(marker));
    }

    // -- imports -------------------------------------------------------------

    /// Resolves one `IMPORT` statement against `self.retriever` (§4.7.3):
    /// retrieves the named script's source, parses it standalone (its own
    /// fresh `Tree`/`OptionSet` — imports don't inherit the importing
    /// file's dialect pragmas), and clones its top-level declarations into
    /// the current scope so identifier lookup can find them. A retriever
    /// returning `None` — the default, no-op behavior — leaves the import
    /// inert, matching the original's "no imports resolvable".
    fn resolve_import(&mut self, node: NodeId) {
        let Some(retriever) = self.retriever else { return };
        let name = self.tree.get_string(node).to_string();
        let filename = format!("{}.as", name.replace('.', "/"));
        if self.importing.contains(&filename) {
            return;
        }
        let Some(source) = retriever.retrieve(&filename) else {
            return;
        };

        self.importing.push(filename.clone());
        let mut import_tree = Tree::new();
        let options = RefCell::new(OptionSet::new());
        let scanner = Scanner::new(&filename, &source, &options, self.sink);
        let mut parser = Parser::new(scanner, &mut import_tree, &options, self.sink);
        let imported_root = parser.parse();
        self.importing.pop();

        let Some(imported_root) = imported_root else { return };
        let Some(&program) = import_tree.get(imported_root).children.first() else {
            return;
        };
        let declarations = import_tree.get(program).children.clone();
        let mut collected = Scope::new();
        for declaration in declarations {
            let cloned = self.tree.clone_subtree(&import_tree, declaration);
            self.collect_declaration(cloned, &mut collected);
        }
        if let Some(scope) = self.scopes.last_mut() {
            for (name, id) in collected {
                scope.entry(name).or_insert(id);
            }
        }
    }

    // -- goto / label linking -----------------------------------------------

    /// Links every `GOTO` in `owner`'s body to its matching `LABEL`,
    /// without crossing into a nested `FUNCTION` (§4.7.4: "the same
    /// function").
    fn link_gotos(&mut self, owner: NodeId) {
        let statements = self.declaration_statements(owner);
        let mut labels = HashMap::new();
        for &statement in &statements {
            self.collect_labels(statement, &mut labels);
        }
        for &statement in &statements {
            self.resolve_gotos(statement, &labels);
        }
    }

    fn collect_labels(&self, node: NodeId, labels: &mut HashMap<String, NodeId>) {
        let data = self.tree.get(node);
        if data.kind == NodeKind::Function {
            return;
        }
        if data.kind == NodeKind::Label {
            labels.insert(self.tree.get_string(node).to_string(), node);
        }
        for &child in &data.children {
            self.collect_labels(child, labels);
        }
    }

    fn resolve_gotos(&mut self, node: NodeId, labels: &HashMap<String, NodeId>) {
        let kind = self.tree.get(node).kind;
        if kind == NodeKind::Function {
            return;
        }
        if kind == NodeKind::Goto {
            let name = self.tree.get_string(node).to_string();
            match labels.get(name.as_str()).copied() {
                Some(label) => {
                    self.tree.set_link(node, Link::GotoExit, Some(label));
                    self.append_goto_source(label, node);
                }
                None => {
                    self.emit_error(node, Code::LabelNotFound, "label not found");
                }
            }
        }
        for child in self.tree.get(node).children.clone() {
            self.resolve_gotos(child, labels);
        }
    }

    /// Appends `source` to the aggregator hung off `label.goto_enter`,
    /// allocating the aggregator node on first use. The aggregator holds
    /// the goto nodes non-owningly (their real parent stays the statement
    /// list they were parsed into) — only its own `children` vector is
    /// pushed to, so `append_child`'s parent-reassignment is not used here.
    fn append_goto_source(&mut self, label: NodeId, source: NodeId) {
        let container = match self.tree.get_link(label, Link::GotoEnter) {
            Some(container) => container,
            None => {
                let position = self.position_of(label);
                let container = self.tree.alloc(NodeKind::DirectiveList, position);
                self.tree.set_link(label, Link::GotoEnter, Some(container));
                container
            }
        };
        self.tree.get_mut(container).children.push(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::global;
    use crate::numbers::Integer;

    fn pos() -> Position {
        Position::new("test.as")
    }

    fn root_with_program(tree: &mut Tree) -> (NodeId, NodeId) {
        let root = tree.alloc(NodeKind::Root, pos());
        let program = tree.alloc(NodeKind::Program, pos());
        tree.append_child(root, program);
        (root, program)
    }

    #[test]
    fn identifier_resolves_to_matching_variable_in_scope() {
        let mut tree = Tree::new();
        let (root, program) = root_with_program(&mut tree);

        let var_stmt = tree.alloc(NodeKind::Var, pos());
        let variable = tree.alloc(NodeKind::Variable, pos());
        tree.set_string(variable, "x");
        tree.append_child(var_stmt, variable);
        tree.get_mut(var_stmt).variables.push(variable);
        tree.append_child(program, var_stmt);

        let identifier = tree.alloc(NodeKind::Identifier, pos());
        tree.set_string(identifier, "x");
        tree.append_child(program, identifier);

        let errors = compile(&mut tree, root, global());
        assert_eq!(errors, 0);
        assert_eq!(tree.get_link(identifier, Link::Instance), Some(variable));
    }

    #[test]
    fn unresolved_identifier_reports_not_found() {
        let mut tree = Tree::new();
        let (root, program) = root_with_program(&mut tree);
        let identifier = tree.alloc(NodeKind::Identifier, pos());
        tree.set_string(identifier, "missing");
        tree.append_child(program, identifier);

        let errors = compile(&mut tree, root, global());
        assert_eq!(errors, 1);
        assert_eq!(tree.get_link(identifier, Link::Instance), None);
    }

    #[test]
    fn member_access_resolves_to_class_member() {
        let mut tree = Tree::new();
        let (root, program) = root_with_program(&mut tree);

        let class = tree.alloc(NodeKind::Class, pos());
        tree.set_string(class, "Foo");
        let class_body = tree.alloc(NodeKind::DirectiveList, pos());
        let member_var = tree.alloc(NodeKind::Variable, pos());
        tree.set_string(member_var, "bar");
        tree.append_child(class_body, member_var);
        tree.append_child(class, class_body);
        tree.append_child(program, class);

        let var_stmt = tree.alloc(NodeKind::Var, pos());
        let obj = tree.alloc(NodeKind::Variable, pos());
        tree.set_string(obj, "obj");
        tree.set_link(obj, Link::Type, Some(class));
        tree.append_child(var_stmt, obj);
        tree.get_mut(var_stmt).variables.push(obj);
        tree.append_child(program, var_stmt);

        let member = tree.alloc(NodeKind::Member, pos());
        let obj_ref = tree.alloc(NodeKind::Identifier, pos());
        tree.set_string(obj_ref, "obj");
        let name_node = tree.alloc(NodeKind::Identifier, pos());
        tree.set_string(name_node, "bar");
        tree.append_child(member, obj_ref);
        tree.append_child(member, name_node);
        tree.append_child(program, member);

        let errors = compile(&mut tree, root, global());
        assert_eq!(errors, 0);
        assert_eq!(tree.get_link(name_node, Link::Instance), Some(member_var));
    }

    #[test]
    fn goto_resolves_to_label_in_same_function() {
        let mut tree = Tree::new();
        let (root, program) = root_with_program(&mut tree);

        let function = tree.alloc(NodeKind::Function, pos());
        tree.set_string(function, "run");
        let params = tree.alloc(NodeKind::Params, pos());
        tree.append_child(function, params);
        let body = tree.alloc(NodeKind::DirectiveList, pos());
        let label = tree.alloc(NodeKind::Label, pos());
        tree.set_string(label, "target");
        let goto = tree.alloc(NodeKind::Goto, pos());
        tree.set_string(goto, "target");
        tree.append_child(body, label);
        tree.append_child(body, goto);
        tree.append_child(function, body);
        tree.append_child(program, function);

        let errors = compile(&mut tree, root, global());
        assert_eq!(errors, 0);
        assert_eq!(tree.get_link(goto, Link::GotoExit), Some(label));
        let aggregator = tree.get_link(label, Link::GotoEnter).expect("aggregator");
        assert_eq!(tree.get(aggregator).children, vec![goto]);
    }

    #[test]
    fn unresolved_goto_reports_label_not_found() {
        let mut tree = Tree::new();
        let (root, program) = root_with_program(&mut tree);
        let function = tree.alloc(NodeKind::Function, pos());
        let params = tree.alloc(NodeKind::Params, pos());
        tree.append_child(function, params);
        let body = tree.alloc(NodeKind::DirectiveList, pos());
        let goto = tree.alloc(NodeKind::Goto, pos());
        tree.set_string(goto, "nowhere");
        tree.append_child(body, goto);
        tree.append_child(function, body);
        tree.append_child(program, function);

        let errors = compile(&mut tree, root, global());
        assert_eq!(errors, 1);
    }

    #[test]
    fn native_operator_overload_sets_native_attribute_without_rewriting() {
        let mut tree = Tree::new();
        let (root, program) = root_with_program(&mut tree);

        let class = tree.alloc(NodeKind::Class, pos());
        tree.set_string(class, "Native");
        let class_body = tree.alloc(NodeKind::DirectiveList, pos());
        let plus_fn = tree.alloc(NodeKind::Function, pos());
        tree.set_string(plus_fn, "+");
        tree.set_attribute(plus_fn, Attributes::NATIVE, true).unwrap();
        tree.append_child(class_body, plus_fn);
        tree.append_child(class, class_body);
        tree.append_child(program, class);

        let left = tree.alloc(NodeKind::Integer, pos());
        tree.set_integer(left, Integer::new(1));
        tree.set_link(left, Link::Type, Some(class));
        let right = tree.alloc(NodeKind::Integer, pos());
        tree.set_integer(right, Integer::new(2));
        let add = tree.alloc(NodeKind::Add, pos());
        tree.append_child(add, left);
        tree.append_child(add, right);
        tree.append_child(program, add);

        let errors = compile(&mut tree, root, global());
        assert_eq!(errors, 0);
        assert_eq!(tree.get(add).kind, NodeKind::Add);
        assert!(tree.get_attribute(add, Attributes::NATIVE));
    }

    #[test]
    fn user_overload_rewrites_mutating_operator_to_call() {
        let mut tree = Tree::new();
        let (root, program) = root_with_program(&mut tree);

        let class = tree.alloc(NodeKind::Class, pos());
        tree.set_string(class, "Counter");
        let class_body = tree.alloc(NodeKind::DirectiveList, pos());
        let increment_fn = tree.alloc(NodeKind::Function, pos());
        tree.set_string(increment_fn, "++x");
        tree.append_child(class_body, increment_fn);
        tree.append_child(class, class_body);
        tree.append_child(program, class);

        let operand = tree.alloc(NodeKind::Identifier, pos());
        tree.set_string(operand, "c");
        tree.set_link(operand, Link::Type, Some(class));
        let increment = tree.alloc(NodeKind::Increment, pos());
        tree.append_child(increment, operand);
        tree.append_child(program, increment);

        let errors = compile(&mut tree, root, global());
        assert_eq!(errors, 0);
        let rewritten = tree.get(program).children[1];
        assert_eq!(tree.get(rewritten).kind, NodeKind::Call);
        assert_eq!(tree.get_link(rewritten, Link::Instance), Some(increment_fn));
    }
}
