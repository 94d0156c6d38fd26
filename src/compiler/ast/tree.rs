//! The arena that owns every node of one compilation (§4.4.1). Parent,
//! child, and link fields are all [`NodeId`]s indexing into a single
//! `Vec<NodeData>`, so cyclic `instance`/`type_node`/`attribute_node`/
//! `goto_*` links never need `Rc`/`Weak` and never dangle mid-compilation.

use std::collections::HashMap;

use crate::diagnostics::{InternalError, Position};
use crate::numbers::{Float, Integer};

use super::attributes::Attributes;
use super::ids::NodeId;
use super::kind::NodeKind;
use super::node::{NodeData, Payload};
use super::node_flags::NodeFlags;

/// The five non-owning link slots a node can carry (§3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Instance,
    Type,
    Attribute,
    GotoExit,
    GotoEnter,
}

pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new() -> Self {
        Tree { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind, position));
        id
    }

    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.value() as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.value() as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -- children -----------------------------------------------------

    /// Appends `child` to `parent`'s child list and sets `child`'s parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(child);
    }

    /// Inserts `child` at `index` (`None` meaning append, matching the
    /// original's "index -1 means append").
    pub fn insert_child(&mut self, parent: NodeId, index: Option<usize>, child: NodeId) {
        self.get_mut(child).parent = Some(parent);
        let children = &mut self.get_mut(parent).children;
        match index {
            Some(i) => children.insert(i.min(children.len()), child),
            None => children.push(child),
        }
    }

    /// Replaces the child at `index`, clearing the old child's parent link.
    pub fn replace_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let old = self.get(parent).children[index];
        self.get_mut(old).parent = None;
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children[index] = child;
    }

    /// Removes the child at `index`, clearing its parent pointer.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> NodeId {
        let removed = self.get_mut(parent).children.remove(index);
        self.get_mut(removed).parent = None;
        removed
    }

    /// Pre-order search starting at (and including) `start` for the first
    /// node of `kind` satisfying `predicate`.
    pub fn find_descendant(
        &self,
        start: NodeId,
        kind: NodeKind,
        predicate: impl Fn(&NodeData) -> bool,
    ) -> Option<NodeId> {
        let node = self.get(start);
        if node.kind == kind && predicate(node) {
            return Some(start);
        }
        for &child in &node.children {
            if let Some(found) = self.find_descendant(child, kind, &predicate) {
                return Some(found);
            }
        }
        None
    }

    /// Scans `parent`'s children, starting just after `prev_child`, for the
    /// next one of `kind`.
    pub fn find_next_child(&self, parent: NodeId, prev_child: NodeId, kind: NodeKind) -> Option<NodeId> {
        let children = &self.get(parent).children;
        let start = children.iter().position(|&c| c == prev_child)? + 1;
        children[start..]
            .iter()
            .copied()
            .find(|&c| self.get(c).kind == kind)
    }

    // -- flags / attributes / payload ----------------------------------

    pub fn set_flag(&mut self, id: NodeId, flag: NodeFlags, value: bool) {
        let kind = self.get(id).kind;
        if !NodeFlags::is_valid_for(kind, flag) {
            panic!(
                "{}",
                InternalError::new(format!(
                    "flag {:?} is not valid on node kind {}",
                    flag,
                    kind.name()
                ))
            );
        }
        let node = self.get_mut(id);
        node.flags.set(flag, value);
    }

    pub fn get_flag(&self, id: NodeId, flag: NodeFlags) -> bool {
        self.get(id).flags.contains(flag)
    }

    /// Sets `attribute`, enforcing the conflict groups of §3.3.3 and the
    /// `TYPE`-attribute kind allow-list. Returns `Err` (diagnostic text,
    /// not a panic: conflicts are a normal compile-time diagnostic, not a
    /// programmer error) without mutating the set on conflict.
    pub fn set_attribute(&mut self, id: NodeId, attribute: Attributes, value: bool) -> Result<(), String> {
        if attribute == Attributes::TYPE && !super::node::supports_type_attribute(self.get(id).kind) {
            panic!(
                "{}",
                InternalError::new(format!(
                    "TYPE attribute is not queryable/settable on node kind {}",
                    self.get(id).kind.name()
                ))
            );
        }
        if value {
            let current = self.get(id).attributes;
            if current.conflicts_with(attribute) {
                return Err(format!(
                    "attribute {:?} conflicts with already-set attributes {:?}",
                    attribute, current
                ));
            }
        }
        self.get_mut(id).attributes.set(attribute, value);
        Ok(())
    }

    pub fn get_attribute(&self, id: NodeId, attribute: Attributes) -> bool {
        self.get(id).attributes.contains(attribute)
    }

    pub fn set_payload(&mut self, id: NodeId, payload: Payload) {
        if let Err(message) = self.get(id).check_payload(&payload) {
            panic!("{}", InternalError::new(message));
        }
        self.get_mut(id).payload = payload;
    }

    pub fn set_string(&mut self, id: NodeId, value: impl Into<String>) {
        self.set_payload(id, Payload::String(value.into()));
    }

    pub fn set_integer(&mut self, id: NodeId, value: Integer) {
        self.set_payload(id, Payload::Integer(value));
    }

    pub fn set_float(&mut self, id: NodeId, value: Float) {
        self.set_payload(id, Payload::Float(value));
    }

    /// Reads a string payload, panicking (`INTERNAL_ERROR`) rather than
    /// returning `None` when `id` doesn't carry one (§7): "accessing the
    /// wrong payload type" is a programmer error, not a recoverable one.
    pub fn get_string(&self, id: NodeId) -> &str {
        let node = self.get(id);
        node.payload.as_str().unwrap_or_else(|| {
            panic!(
                "{}",
                InternalError::new(format!(
                    "get_string() called with non-string node type: \"{}\"",
                    node.kind.name()
                ))
            )
        })
    }

    pub fn get_integer(&self, id: NodeId) -> &Integer {
        let node = self.get(id);
        node.payload.as_integer().unwrap_or_else(|| {
            panic!(
                "{}",
                InternalError::new(format!(
                    "get_integer() called with non-integer node type: \"{}\"",
                    node.kind.name()
                ))
            )
        })
    }

    pub fn get_float(&self, id: NodeId) -> &Float {
        let node = self.get(id);
        node.payload.as_float().unwrap_or_else(|| {
            panic!(
                "{}",
                InternalError::new(format!(
                    "get_float() called with non-float node type: \"{}\"",
                    node.kind.name()
                ))
            )
        })
    }

    // -- links -----------------------------------------------------------

    pub fn set_link(&mut self, id: NodeId, link: Link, target: Option<NodeId>) {
        let node = self.get_mut(id);
        match link {
            Link::Instance => node.instance = target,
            Link::Type => node.type_node = target,
            Link::Attribute => node.attribute_node = target,
            Link::GotoExit => node.goto_exit = target,
            Link::GotoEnter => node.goto_enter = target,
        }
    }

    pub fn get_link(&self, id: NodeId, link: Link) -> Option<NodeId> {
        let node = self.get(id);
        match link {
            Link::Instance => node.instance,
            Link::Type => node.type_node,
            Link::Attribute => node.attribute_node,
            Link::GotoExit => node.goto_exit,
            Link::GotoEnter => node.goto_enter,
        }
    }

    // -- locking -----------------------------------------------------------

    pub fn lock(&mut self, id: NodeId) {
        self.get_mut(id).lock_count += 1;
    }

    pub fn unlock(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        node.lock_count = node.lock_count.saturating_sub(1);
    }

    /// Every node whose lock count is still nonzero. Non-empty here at
    /// `Tree` drop time is the invariant violation §8.3 requires to abort
    /// the process, not merely return an error.
    pub fn locked_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_locked())
            .map(|(i, _)| NodeId::new(i as u32))
            .collect()
    }

    // -- cross-tree import --------------------------------------------------

    /// Deep-copies `node` and its full subtree from `other` into `self`,
    /// returning the new root's id. Used to pull an imported script's
    /// declarations (§4.7.3) into the importing compilation's own arena —
    /// a `NodeId` is only meaningful within the `Tree` that allocated it, so
    /// a retrieved script's nodes cannot simply be linked in by reference.
    ///
    /// `instance`/`type_node`/`attribute_node`/`goto_*` links are not
    /// copied: they point at `other`'s arena and would dangle in `self`'s.
    /// The copy is therefore a structurally faithful but semantically
    /// undecorated declaration, sufficient for scope lookup to find and for
    /// member resolution to walk, which is what an imported declaration is
    /// used for.
    pub fn clone_subtree(&mut self, other: &Tree, node: NodeId) -> NodeId {
        let mut map = HashMap::new();
        let new_root = self.clone_node_only(other, node, &mut map);
        self.remap_variables_and_labels(other, node, &map);
        new_root
    }

    fn clone_node_only(&mut self, other: &Tree, node: NodeId, map: &mut HashMap<NodeId, NodeId>) -> NodeId {
        let data = other.get(node);
        let new_id = self.alloc(data.kind, data.position.clone());
        {
            let new_node = self.get_mut(new_id);
            new_node.payload = data.payload.clone();
            new_node.flags = data.flags;
            new_node.attributes = data.attributes;
            new_node.param_count = data.param_count;
            new_node.switch_operator = data.switch_operator;
        }
        map.insert(node, new_id);
        for &child in &other.get(node).children.clone() {
            let new_child = self.clone_node_only(other, child, map);
            self.append_child(new_id, new_child);
        }
        new_id
    }

    /// Second pass: `variables`/`labels` name nodes that are already
    /// somewhere in the same subtree (a `VAR`'s declared variables are also
    /// its children, a function's labels are already nested in its body),
    /// so they're remapped against `map` rather than cloned again.
    fn remap_variables_and_labels(&mut self, other: &Tree, node: NodeId, map: &HashMap<NodeId, NodeId>) {
        let data = other.get(node);
        let new_id = map[&node];
        for &variable in &data.variables {
            if let Some(&mapped) = map.get(&variable) {
                self.get_mut(new_id).variables.push(mapped);
            }
        }
        for (name, &label) in &data.labels {
            if let Some(&mapped) = map.get(&label) {
                self.get_mut(new_id).labels.insert(name.clone(), mapped);
            }
        }
        for &child in &data.children.clone() {
            self.remap_variables_and_labels(other, child, map);
        }
    }

    // -- pretty printing ---------------------------------------------------

    /// Renders `root` and its full subtree in the textual format described
    /// in §4.4: one line per node, `kind-code: kind-name`, payload, flags,
    /// attributes, and position, followed by indented `instance`/`type
    /// node`/`attribute node`/`goto exit`/`goto enter`/`children` sections.
    pub fn pretty_print(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.pretty_print_node(root, 0, &mut out);
        out
    }

    fn pretty_print_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.get(id);
        let indent = "  ".repeat(depth);
        out.push_str(&format!(
            "{indent}{id}: {code}: {name}",
            id = id,
            code = node.kind.code(),
            name = node.kind.name()
        ));
        match &node.payload {
            Payload::None => {}
            Payload::String(s) => out.push_str(&format!(" = {:?}", s)),
            Payload::Integer(i) => out.push_str(&format!(" = {}", i.get())),
            Payload::Float(f) => out.push_str(&format!(" = {}", f.get())),
        }
        if !node.flags.is_empty() {
            out.push_str(&format!(" flags={:?}", node.flags));
        }
        if !node.attributes.is_empty() {
            out.push_str(&format!(" attrs={:?}", node.attributes));
        }
        out.push_str(&format!(" ({})\n", node.position));

        self.pretty_print_link(node.instance, "instance", depth + 1, out);
        self.pretty_print_link(node.type_node, "type node", depth + 1, out);
        self.pretty_print_link(node.attribute_node, "attribute node", depth + 1, out);
        self.pretty_print_link(node.goto_exit, "goto exit", depth + 1, out);
        self.pretty_print_link(node.goto_enter, "goto enter", depth + 1, out);

        if !node.variables.is_empty() {
            let var_indent = "  ".repeat(depth + 1);
            out.push_str(&format!("{var_indent}variables:\n"));
            for &v in &node.variables {
                out.push_str(&format!("{var_indent}= "));
                self.pretty_print_node(v, depth + 2, out);
            }
        }
        if !node.labels.is_empty() {
            let label_indent = "  ".repeat(depth + 1);
            out.push_str(&format!("{label_indent}labels:\n"));
            let mut names: Vec<_> = node.labels.keys().collect();
            names.sort();
            for name in names {
                out.push_str(&format!("{label_indent}: {name}\n"));
            }
        }
        if !node.children.is_empty() {
            let child_indent = "  ".repeat(depth + 1);
            out.push_str(&format!("{child_indent}children:\n"));
            for &child in &node.children {
                self.pretty_print_node(child, depth + 2, out);
            }
        }
    }

    fn pretty_print_link(&self, target: Option<NodeId>, label: &str, depth: usize, out: &mut String) {
        if let Some(target) = target {
            let indent = "  ".repeat(depth);
            out.push_str(&format!("{indent}-{label}:\n"));
            self.pretty_print_node(target, depth + 1, out);
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        let locked = self.locked_nodes();
        if !locked.is_empty() {
            eprintln!("node lock/unlock aborted");
            std::process::abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Position;

    fn pos() -> Position {
        Position::new("test.as")
    }

    #[test]
    fn append_and_find_descendant() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Root, pos());
        let ident = tree.alloc(NodeKind::Identifier, pos());
        tree.set_string(ident, "x");
        tree.append_child(root, ident);

        let found = tree.find_descendant(root, NodeKind::Identifier, |n| n.payload.as_str() == Some("x"));
        assert_eq!(found, Some(ident));
        assert_eq!(tree.get(ident).parent, Some(root));
    }

    #[test]
    fn remove_child_clears_parent() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Root, pos());
        let child = tree.alloc(NodeKind::Empty, pos());
        tree.append_child(root, child);
        tree.remove_child(root, 0);
        assert_eq!(tree.get(child).parent, None);
        assert!(tree.get(root).children.is_empty());
    }

    #[test]
    #[should_panic]
    fn setting_flag_on_wrong_kind_panics() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Root, pos());
        tree.set_flag(root, NodeFlags::FOR_IN, true);
    }

    #[test]
    fn conflicting_attribute_is_rejected_without_mutation() {
        let mut tree = Tree::new();
        let class = tree.alloc(NodeKind::Class, pos());
        tree.set_attribute(class, Attributes::PUBLIC, true).unwrap();
        let result = tree.set_attribute(class, Attributes::PRIVATE, true);
        assert!(result.is_err());
        assert!(tree.get_attribute(class, Attributes::PUBLIC));
        assert!(!tree.get_attribute(class, Attributes::PRIVATE));
    }

    #[test]
    #[should_panic]
    fn setting_wrong_payload_kind_panics() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Root, pos());
        tree.set_string(root, "nope");
    }

    #[test]
    fn get_string_reads_back_what_was_set() {
        let mut tree = Tree::new();
        let ident = tree.alloc(NodeKind::Identifier, pos());
        tree.set_string(ident, "x");
        assert_eq!(tree.get_string(ident), "x");
    }

    #[test]
    #[should_panic(expected = "get_string() called with non-string node type")]
    fn get_string_on_wrong_kind_panics() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Root, pos());
        tree.get_string(root);
    }

    #[test]
    #[should_panic(expected = "get_integer() called with non-integer node type")]
    fn get_integer_on_wrong_kind_panics() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Root, pos());
        tree.get_integer(root);
    }

    #[test]
    fn unlock_balances_lock_and_allows_clean_drop() {
        let mut tree = Tree::new();
        let node = tree.alloc(NodeKind::Integer, pos());
        tree.lock(node);
        tree.unlock(node);
        assert!(tree.locked_nodes().is_empty());
    }

    #[test]
    fn links_are_independently_settable() {
        let mut tree = Tree::new();
        let a = tree.alloc(NodeKind::Identifier, pos());
        let b = tree.alloc(NodeKind::Variable, pos());
        tree.set_link(a, Link::Instance, Some(b));
        assert_eq!(tree.get_link(a, Link::Instance), Some(b));
        assert_eq!(tree.get_link(a, Link::Type), None);
    }

    #[test]
    fn clone_subtree_copies_structure_and_remaps_variables() {
        let mut source = Tree::new();
        let var_stmt = source.alloc(NodeKind::Var, pos());
        let variable = source.alloc(NodeKind::Variable, pos());
        source.set_string(variable, "x");
        source.append_child(var_stmt, variable);
        source.get_mut(var_stmt).variables.push(variable);

        let mut dest = Tree::new();
        let cloned = dest.clone_subtree(&source, var_stmt);

        assert_eq!(dest.get(cloned).kind, NodeKind::Var);
        assert_eq!(dest.get(cloned).children.len(), 1);
        let cloned_variable = dest.get(cloned).children[0];
        assert_eq!(dest.get(cloned_variable).payload.as_str(), Some("x"));
        // The remapped `variables` entry must point at the *cloned* node,
        // not reuse the source tree's `NodeId` (which may not even exist
        // in `dest`'s arena).
        assert_eq!(dest.get(cloned).variables, vec![cloned_variable]);
    }
}
