#![forbid(unsafe_code)]

//! The UI-node boundary consumed by the reactive and view layers.
//!
//! Hosts (a DOM bridge, a terminal tree, the headless [`MemoryNode`]) implement
//! [`Node`] on a cheap, clonable handle type. Everything above this module
//! talks to nodes only through the trait.
//!
//! # Invariants
//!
//! 1. A node's [`NodeKind`] is fixed at construction.
//! 2. Every operation is infallible. Writing to, styling, or removing a
//!    detached node is a silent no-op.
//! 3. Input listeners fire after the node's content has been updated, so
//!    [`Node::content`] inside a listener returns the new content.
//!
//! [`MemoryNode`]: crate::MemoryNode

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animation::{AnimationRequest, Playback};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Capability class of a node. Binding projections are selected from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Displays text (paragraphs, spans, headings).
    #[default]
    TextDisplay,
    /// A button whose label is its text.
    ButtonLabel,
    /// Single-line editable input.
    SingleLineInput,
    /// Multi-line editable input.
    MultiLineInput,
    /// Checkbox or radio-like control driven by a presence flag.
    Togglable,
}

impl NodeKind {
    /// Whether the user can edit this node's content.
    #[inline]
    #[must_use]
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::SingleLineInput | Self::MultiLineInput)
    }

    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextDisplay => "text",
            Self::ButtonLabel => "button",
            Self::SingleLineInput => "input",
            Self::MultiLineInput => "textarea",
            Self::Togglable => "toggle",
        }
    }
}

/// Callback fired with the node's new content on change or keystroke.
pub type InputListener = Rc<dyn Fn(&str)>;

/// Token for one listener registered with [`Node::on_input`]. Unique per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Name of the presence flag toggled on [`NodeKind::Togglable`] nodes.
pub const CHECKED_FLAG: &str = "checked";

/// A handle to a UI node.
///
/// Implementations are reference handles: cloning yields another handle to
/// the same node, and equality of [`Node::id`] means identity.
pub trait Node: Clone + 'static {
    /// Identity of the underlying node.
    fn id(&self) -> NodeId;

    /// Capability class.
    fn kind(&self) -> NodeKind;

    /// Displayed text (label for buttons).
    fn text(&self) -> String;

    /// Replace displayed text.
    fn set_text(&self, text: &str);

    /// Editable content.
    fn content(&self) -> String;

    /// Replace editable content.
    fn set_content(&self, content: &str);

    /// Whether the boolean presence attribute `name` is set.
    fn has_flag(&self, name: &str) -> bool;

    /// Set or clear the boolean presence attribute `name`.
    fn set_flag(&self, name: &str, present: bool);

    /// Current value of an inline style property.
    fn style(&self, property: &str) -> Option<String>;

    /// Set an inline style property.
    fn set_style(&self, property: &str, value: &str);

    /// Register a listener for user edits.
    fn on_input(&self, listener: InputListener) -> ListenerId;

    /// Drop a listener registered with [`Node::on_input`]. Returns `false` if
    /// it was already gone.
    fn remove_input_listener(&self, listener: ListenerId) -> bool;

    /// Append `child`, detaching it from any previous parent first.
    fn append_child(&self, child: &Self);

    /// Remove every child, then append `child`.
    fn replace_children(&self, child: &Self);

    /// Detach this node from its parent.
    fn remove(&self);

    /// Current children, in order.
    fn children(&self) -> Vec<Self>;

    /// Current parent, if attached.
    fn parent(&self) -> Option<Self>;

    /// Start a keyframe animation on this node.
    fn play(&self, request: &AnimationRequest) -> Playback;

    /// Whether the node is in the live tree and not fully transparent.
    fn is_visible(&self) -> bool;
}
