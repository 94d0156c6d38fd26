//! The uniform AST node model (component D, §3.3/§4.4): kinds, flags,
//! attributes, single-node data, and the arena that ties them together.

pub mod attributes;
pub mod ids;
pub mod kind;
pub mod node;
pub mod node_flags;
pub mod tree;

pub use attributes::Attributes;
pub use ids::NodeId;
pub use kind::NodeKind;
pub use node::{NodeData, Payload, PayloadKind};
pub use node_flags::NodeFlags;
pub use tree::{Link, Tree};
