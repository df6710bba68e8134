#![forbid(unsafe_code)]

//! Core: UI-node boundary, headless node tree, and animation timing.

pub mod animation;
pub mod memory_node;
pub mod node;
pub mod timer;

pub use memory_node::MemoryNode;
pub use node::{CHECKED_FLAG, InputListener, ListenerId, Node, NodeId, NodeKind};
pub use timer::{Timer, TokioTimer};
