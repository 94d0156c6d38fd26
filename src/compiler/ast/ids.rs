/// Index of a node inside a single compilation's [`super::tree::Tree`] arena.
///
/// Kept as a plain newtype over `u32` rather than a pointer or `Rc`/`Weak`,
/// so links can reference any node regardless of traversal or drop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
