//! Per-kind internal flags (§3.3.1 "Flags"), distinct from [`super::attributes::Attributes`].
//! One bit per flag, heavy doc comments, a combined bitset rather than
//! one enum per kind.
//! Unlike attributes, flags carry no conflict groups — validity is purely
//! "does this kind support this flag", checked against [`NodeKind::valid_flags`].

use bitflags::bitflags;

use super::kind::NodeKind;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u64 {
        /// `catch (e : Type)` — the caught identifier carries a type annotation.
        const CATCH_TYPED = 1 << 0;
        /// A `DIRECTIVE_LIST` introduced new variables not present in its parent scope.
        const DIRECTIVE_LIST_NEW_VARIABLES = 1 << 1;
        /// `enum class` rather than a plain `enum`.
        const ENUM_CLASS = 1 << 2;
        /// `for (const ...)`.
        const FOR_CONST = 1 << 3;
        /// `for each (...)`.
        const FOR_FOREACH = 1 << 4;
        /// `for (... in ...)`.
        const FOR_IN = 1 << 5;
        /// Function declares a getter.
        const FUNCTION_GETTER = 1 << 6;
        /// Function declares a setter.
        const FUNCTION_SETTER = 1 << 7;
        /// Function has an `out` return parameter.
        const FUNCTION_OUT = 1 << 8;
        /// Function is declared to return `void`.
        const FUNCTION_VOID = 1 << 9;
        /// Function is declared `never` (does not return).
        const FUNCTION_NEVER = 1 << 10;
        /// Function takes no parameters.
        const FUNCTION_NOPARAMS = 1 << 11;
        /// Function is an operator overload.
        const FUNCTION_OPERATOR = 1 << 12;
        /// Identifier appears inside a `with` statement's scope.
        const IDENTIFIER_WITH = 1 << 13;
        /// Identifier carries an explicit type annotation.
        const IDENTIFIER_TYPED = 1 << 14;
        /// `import` statement also implements the named interface.
        const IMPORT_IMPLEMENTS = 1 << 15;
        /// Package has had its label table resolved at least once.
        const PACKAGE_FOUND_LABELS = 1 << 16;
        /// Package is referenced by at least one `import`.
        const PACKAGE_REFERENCED = 1 << 17;
        /// Parameter is `const`.
        const PARAM_CONST = 1 << 18;
        /// Parameter is declared `in`.
        const PARAM_IN = 1 << 19;
        /// Parameter is declared `out`.
        const PARAM_OUT = 1 << 20;
        /// Parameter is passed by name rather than position.
        const PARAM_NAMED = 1 << 21;
        /// Parameter is a rest (`...args`) parameter.
        const PARAM_REST = 1 << 22;
        /// Parameter's type is unchecked at the call site.
        const PARAM_UNCHECKED = 1 << 23;
        /// Parameter has no declared prototype to match against.
        const PARAM_UNPROTOTYPED = 1 << 24;
        /// Parameter was referenced at least once in the function body.
        const PARAM_REFERENCED = 1 << 25;
        /// Parameter participates in a `PARAM_MATCH` reference.
        const PARAM_PARAMREF = 1 << 26;
        /// Parameter is the identifier bound by a `catch` clause.
        const PARAM_CATCH = 1 << 27;
        /// `PARAM_MATCH` node has no prototype to match against.
        const PARAM_MATCH_UNPROTOTYPED = 1 << 28;
        /// `switch` has an explicit `default` case.
        const SWITCH_DEFAULT = 1 << 29;
        /// Type uses modulo (wraparound) arithmetic.
        const TYPE_MODULO = 1 << 30;
        /// Variable is `const`.
        const VARIABLE_CONST = 1 << 31;
        /// Variable is `final` (assignable once, then immutable).
        const VARIABLE_FINAL = 1 << 32;
        /// Variable is local to a function body.
        const VARIABLE_LOCAL = 1 << 33;
        /// Variable is a class member.
        const VARIABLE_MEMBER = 1 << 34;
        /// Variable carries an attached `VAR_ATTRIBUTES` node.
        const VARIABLE_ATTRIBUTES = 1 << 35;
        /// Variable is an enum member.
        const VARIABLE_ENUM = 1 << 36;
        /// Variable's initializer has already been compiled.
        const VARIABLE_COMPILED = 1 << 37;
        /// Variable is currently being resolved (cycle guard).
        const VARIABLE_INUSE = 1 << 38;
        /// Variable has one or more attributes pending application.
        const VARIABLE_ATTRS = 1 << 39;
        /// Variable has a `defined(...)` guard attached.
        const VARIABLE_DEFINED = 1 << 40;
        /// Variable is in the process of being defined (recursion guard).
        const VARIABLE_DEFINING = 1 << 41;
        /// Variable is queued to be added to its enclosing scope's variable list.
        const VARIABLE_TOADD = 1 << 42;
    }
}

impl NodeFlags {
    /// The flags meaningful for a given kind (§3.3.1: "setting a flag
    /// unsupported by the node's type is a programmer error"). Kinds not
    /// listed here accept no flags at all.
    pub fn valid_for(kind: NodeKind) -> NodeFlags {
        use NodeKind::*;
        match kind {
            Catch => NodeFlags::CATCH_TYPED,
            DirectiveList => NodeFlags::DIRECTIVE_LIST_NEW_VARIABLES,
            Enum => NodeFlags::ENUM_CLASS,
            For | ForIn | ForEach => {
                NodeFlags::FOR_CONST | NodeFlags::FOR_FOREACH | NodeFlags::FOR_IN
            }
            Function => {
                NodeFlags::FUNCTION_GETTER
                    | NodeFlags::FUNCTION_SETTER
                    | NodeFlags::FUNCTION_OUT
                    | NodeFlags::FUNCTION_VOID
                    | NodeFlags::FUNCTION_NEVER
                    | NodeFlags::FUNCTION_NOPARAMS
                    | NodeFlags::FUNCTION_OPERATOR
            }
            Identifier | Videntifier => NodeFlags::IDENTIFIER_WITH | NodeFlags::IDENTIFIER_TYPED,
            Import => NodeFlags::IMPORT_IMPLEMENTS,
            Package => NodeFlags::PACKAGE_FOUND_LABELS | NodeFlags::PACKAGE_REFERENCED,
            Param => {
                NodeFlags::PARAM_CONST
                    | NodeFlags::PARAM_IN
                    | NodeFlags::PARAM_OUT
                    | NodeFlags::PARAM_NAMED
                    | NodeFlags::PARAM_REST
                    | NodeFlags::PARAM_UNCHECKED
                    | NodeFlags::PARAM_UNPROTOTYPED
                    | NodeFlags::PARAM_REFERENCED
                    | NodeFlags::PARAM_PARAMREF
                    | NodeFlags::PARAM_CATCH
            }
            ParamMatch => NodeFlags::PARAM_MATCH_UNPROTOTYPED,
            Switch => NodeFlags::SWITCH_DEFAULT,
            Variable => {
                NodeFlags::VARIABLE_CONST
                    | NodeFlags::VARIABLE_FINAL
                    | NodeFlags::VARIABLE_LOCAL
                    | NodeFlags::VARIABLE_MEMBER
                    | NodeFlags::VARIABLE_ATTRIBUTES
                    | NodeFlags::VARIABLE_ENUM
                    | NodeFlags::VARIABLE_COMPILED
                    | NodeFlags::VARIABLE_INUSE
                    | NodeFlags::VARIABLE_ATTRS
                    | NodeFlags::VARIABLE_DEFINED
                    | NodeFlags::VARIABLE_DEFINING
                    | NodeFlags::VARIABLE_TOADD
            }
            _ => NodeFlags::empty(),
        }
    }

    pub fn is_valid_for(kind: NodeKind, flag: NodeFlags) -> bool {
        Self::valid_for(kind).contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_in_is_only_valid_on_for_kinds() {
        assert!(NodeFlags::is_valid_for(NodeKind::For, NodeFlags::FOR_IN));
        assert!(!NodeFlags::is_valid_for(NodeKind::Function, NodeFlags::FOR_IN));
    }

    #[test]
    fn function_accepts_getter_and_setter_together() {
        let valid = NodeFlags::valid_for(NodeKind::Function);
        assert!(valid.contains(NodeFlags::FUNCTION_GETTER));
        assert!(valid.contains(NodeFlags::FUNCTION_SETTER));
    }

    #[test]
    fn unrelated_kind_accepts_no_flags() {
        assert_eq!(NodeFlags::valid_for(NodeKind::Add), NodeFlags::empty());
    }
}
