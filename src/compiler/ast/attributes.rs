//! The closed attribute enumeration (§3.3.3): visibility, storage, and
//! semantic markers a node can carry, plus conflicting-group enforcement.
//! One bit per attribute rather than per syntax-kind flag, the same
//! bitflags style as [`super::node_flags::NodeFlags`].

use bitflags::bitflags;

bitflags! {
    /// Attribute bits a node may carry. Unlike [`super::node_flags::NodeFlags`]
    /// these are meaningful on many different node kinds (declarations,
    /// operators, members) and are additionally subject to the
    /// mutually-exclusive groups enforced by [`Attributes::conflicts_with`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attributes: u32 {
        /// Visible outside the declaring package.
        const PUBLIC = 1 << 0;
        /// Visible only within the declaring class.
        const PRIVATE = 1 << 1;
        /// Visible within the declaring class and its subclasses.
        const PROTECTED = 1 << 2;
        /// Visible only within the declaring package.
        const INTERNAL = 1 << 3;
        /// Excluded from serialization.
        const TRANSIENT = 1 << 4;
        /// Excluded from optimizer reordering/caching.
        const VOLATILE = 1 << 5;
        /// Belongs to the class itself rather than to instances.
        const STATIC = 1 << 6;
        /// Declared without a body; must be overridden.
        const ABSTRACT = 1 << 7;
        /// May be overridden in a subclass.
        const VIRTUAL = 1 << 8;
        /// Array-typed declaration.
        const ARRAY = 1 << 9;
        /// Precondition clause (`require else`).
        const REQUIRE_ELSE = 1 << 10;
        /// Postcondition clause (`ensure then`).
        const ENSURE_THEN = 1 << 11;
        /// Implemented by the runtime/host, not by user bytecode.
        const NATIVE = 1 << 12;
        /// Marked for removal; using it should warn.
        const DEPRECATED = 1 << 13;
        /// Opts out of the dialect's safety checks (paired with `UnsafeMath`).
        const UNSAFE = 1 << 14;
        /// Marks a class member as its constructor.
        const CONSTRUCTOR = 1 << 15;
        /// Cannot be overridden further.
        const FINAL = 1 << 16;
        /// Included when enumerating an object's own properties.
        const ENUMERABLE = 1 << 17;
        /// Constant-folds to boolean `true`.
        const TRUE = 1 << 18;
        /// Constant-folds to boolean `false`.
        const FALSE = 1 << 19;
        /// Declared but intentionally unreferenced; suppresses unused warnings.
        const UNUSED = 1 << 20;
        /// Permits properties to be added after construction.
        const DYNAMIC = 1 << 21;
        /// `switch` falls through by iterating (`foreach`-style case groups).
        const FOREACH = 1 << 22;
        /// `switch` case does not fall through to the next case.
        const NOBREAK = 1 << 23;
        /// `switch` case implicitly breaks (the default case-grouping mode).
        const AUTOBREAK = 1 << 24;
        /// Contributed by a `defined(...)` attribute guard.
        const DEFINED = 1 << 25;
        /// Marks the node as a type reference rather than a value.
        const TYPE = 1 << 26;
    }
}

impl Attributes {
    /// Groups in which setting a second member while the first is already
    /// set is a conflict (§3.3.3): `set_attribute` must refuse the second
    /// set and report `INVALID_ATTRIBUTES` rather than silently clobber it.
    const CONFLICT_GROUPS: &'static [Attributes] = &[
        Attributes::from_bits_truncate(
            Attributes::PUBLIC.bits() | Attributes::PRIVATE.bits() | Attributes::PROTECTED.bits(),
        ),
        Attributes::from_bits_truncate(
            Attributes::ABSTRACT.bits()
                | Attributes::STATIC.bits()
                | Attributes::VIRTUAL.bits()
                | Attributes::FINAL.bits(),
        ),
        Attributes::from_bits_truncate(Attributes::TRUE.bits() | Attributes::FALSE.bits()),
        Attributes::from_bits_truncate(
            Attributes::FOREACH.bits() | Attributes::NOBREAK.bits() | Attributes::AUTOBREAK.bits(),
        ),
        Attributes::from_bits_truncate(
            Attributes::REQUIRE_ELSE.bits() | Attributes::ENSURE_THEN.bits(),
        ),
        Attributes::from_bits_truncate(Attributes::NATIVE.bits() | Attributes::UNSAFE.bits()),
    ];

    /// True if setting `candidate` on top of `self` would put two members of
    /// the same conflict group in the set simultaneously.
    pub fn conflicts_with(&self, candidate: Attributes) -> bool {
        Self::CONFLICT_GROUPS.iter().any(|group| {
            group.contains(candidate) && !(*self & *group).difference(candidate).is_empty()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_group_conflicts() {
        let current = Attributes::PUBLIC;
        assert!(current.conflicts_with(Attributes::PRIVATE));
        assert!(!current.conflicts_with(Attributes::STATIC));
    }

    #[test]
    fn native_and_unsafe_conflict() {
        assert!(Attributes::NATIVE.conflicts_with(Attributes::UNSAFE));
        assert!(Attributes::UNSAFE.conflicts_with(Attributes::NATIVE));
    }

    #[test]
    fn setting_same_attribute_twice_is_not_a_conflict() {
        assert!(!Attributes::PUBLIC.conflicts_with(Attributes::PUBLIC));
    }

    #[test]
    fn unrelated_attributes_combine_freely() {
        let current = Attributes::PUBLIC | Attributes::STATIC | Attributes::DEPRECATED;
        assert!(current.conflicts_with(Attributes::FINAL));
        assert!(!current.conflicts_with(Attributes::NATIVE));
    }
}
