//! Single-node data (§3.3): the payload, links, flags, attributes, and
//! bookkeeping slots carried by one arena slot. See [`super::tree::Tree`]
//! for the arena that owns a collection of these and enforces the
//! ownership/locking invariants across them.

use std::collections::HashMap;

use crate::diagnostics::Position;
use crate::numbers::{Float, Integer};

use super::attributes::Attributes;
use super::ids::NodeId;
use super::kind::NodeKind;
use super::node_flags::NodeFlags;

/// The value a node carries, per the fixed per-kind table in §3.3.1.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    String(String),
    Integer(Integer),
    Float(Float),
}

impl Payload {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Payload::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&Float> {
        match self {
            Payload::Float(f) => Some(f),
            _ => None,
        }
    }
}

/// Which [`Payload`] variant, if any, a given kind is allowed to carry.
/// [`PayloadKind::mismatch`] names the variant actually required, for the
/// `INTERNAL_ERROR` message raised on a wrong-kind access attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    None,
    String,
    Integer,
    Float,
}

impl PayloadKind {
    pub fn for_kind(kind: NodeKind) -> PayloadKind {
        use NodeKind::*;
        match kind {
            Identifier | Videntifier | String | RegularExpression | Class | Function | Enum
            | Import | Interface | Label | Namespace | Package | Break | Continue | Goto
            | TemplateHead | TemplateMiddle | TemplateTail | TemplateLiteral | Variable
            | VarAttributes | Param => PayloadKind::String,
            Integer => PayloadKind::Integer,
            FloatingPoint => PayloadKind::Float,
            _ => PayloadKind::None,
        }
    }

    fn matches(&self, payload: &Payload) -> bool {
        matches!(
            (self, payload),
            (PayloadKind::None, Payload::None)
                | (PayloadKind::String, Payload::String(_))
                | (PayloadKind::Integer, Payload::Integer(_))
                | (PayloadKind::Float, Payload::Float(_))
        )
    }
}

/// Kinds on which the `TYPE` attribute (§3.3.3) may be queried or set; any
/// other kind raises `INTERNAL_ERROR` on access, mirroring the original's
/// `g_node_types_support_type` allow-list.
pub fn supports_type_attribute(kind: NodeKind) -> bool {
    use NodeKind::*;
    matches!(
        kind,
        Identifier
            | Videntifier
            | Class
            | Interface
            | Enum
            | Function
            | Variable
            | Param
            | Member
            | Call
    )
}

/// One arena slot. Parent/child/link fields are all [`NodeId`]s into the
/// owning [`super::tree::Tree`]; nothing here is a pointer or `Rc`.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub payload: Payload,
    pub children: Vec<NodeId>,
    pub variables: Vec<NodeId>,
    pub labels: HashMap<String, NodeId>,
    pub parent: Option<NodeId>,
    pub instance: Option<NodeId>,
    pub type_node: Option<NodeId>,
    pub attribute_node: Option<NodeId>,
    pub goto_exit: Option<NodeId>,
    pub goto_enter: Option<NodeId>,
    pub flags: NodeFlags,
    pub attributes: Attributes,
    pub position: Position,
    pub lock_count: u32,
    /// Parameter-count side slot, meaningful only on `CALL`/`FUNCTION` nodes.
    pub param_count: Option<u32>,
    /// Comparison-operator side slot, meaningful only on `SWITCH` nodes.
    pub switch_operator: Option<NodeKind>,
}

impl NodeData {
    pub fn new(kind: NodeKind, position: Position) -> Self {
        NodeData {
            kind,
            payload: Payload::None,
            children: Vec::new(),
            variables: Vec::new(),
            labels: HashMap::new(),
            parent: None,
            instance: None,
            type_node: None,
            attribute_node: None,
            goto_exit: None,
            goto_enter: None,
            flags: NodeFlags::empty(),
            attributes: Attributes::empty(),
            position,
            lock_count: 0,
            param_count: None,
            switch_operator: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock_count > 0
    }

    /// Validates `payload` against [`PayloadKind::for_kind`], returning an
    /// error message (never panicking itself — callers decide whether to
    /// panic, per §7's "programmer error" classification) when mismatched.
    pub fn check_payload(&self, payload: &Payload) -> Result<(), String> {
        let expected = PayloadKind::for_kind(self.kind);
        if expected.matches(payload) {
            Ok(())
        } else {
            Err(format!(
                "node of kind {} does not accept a {:?} payload (expects {:?})",
                self.kind.name(),
                payload,
                expected
            ))
        }
    }
}
