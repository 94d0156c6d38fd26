//! Operator-overload name lookups for the compiler pass (§4.7.4): given an
//! operator node kind, the method name a user class must define to
//! overload it, and whether that overload mutates its receiver.

use super::ast::NodeKind;

/// The class-method name an overload of `kind` must be declared under.
/// Prefix/postfix increment and decrement share a spelling distinguished
/// only by `is_prefix`, mirroring the `"++x"`/`"x++"` naming in §4.7.4.
pub fn overload_name(kind: NodeKind, is_prefix: bool) -> Option<String> {
    if !kind.is_overloadable_operator() {
        return None;
    }
    Some(kind.operator_symbol(is_prefix).to_string())
}

/// Whether resolving an overload of `kind` rewrites the call site into a
/// `CALL` (mutating) rather than an `ASSIGNMENT` wrapping a `CALL`
/// (simple-evaluated), per §4.7.4.
pub fn rewrites_to_call(kind: NodeKind) -> bool {
    kind.is_mutating_operator() || matches!(kind, NodeKind::Call)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_add_overload_is_named_plus() {
        assert_eq!(overload_name(NodeKind::Add, false), Some("+".to_string()));
    }

    #[test]
    fn prefix_and_postfix_increment_have_distinct_names() {
        assert_eq!(overload_name(NodeKind::Increment, true), Some("++x".to_string()));
        assert_eq!(overload_name(NodeKind::Increment, false), Some("x++".to_string()));
    }

    #[test]
    fn non_operator_kinds_have_no_overload_name() {
        assert_eq!(overload_name(NodeKind::Identifier, false), None);
    }

    #[test]
    fn mutating_operators_rewrite_to_call_not_assignment() {
        assert!(rewrites_to_call(NodeKind::AssignmentAdd));
        assert!(!rewrites_to_call(NodeKind::Add));
    }
}
