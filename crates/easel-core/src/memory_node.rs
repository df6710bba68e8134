#![forbid(unsafe_code)]

//! Headless, in-memory implementation of [`Node`].
//!
//! `MemoryNode` is a retained tree with just enough behavior to host the
//! reactive and view layers without a real renderer: text, editable content,
//! presence flags, inline styles, input listeners, and parent/child links.
//! It is what the test suites run against, and it is usable by hosts that
//! render from a tree snapshot.
//!
//! # Design
//!
//! Nodes are `Rc<RefCell<..>>` handles. Parents own their children strongly;
//! children point back through a `Weak`, so dropping a detached subtree frees
//! it. Only trees hanging off a [`MemoryNode::root`] count as connected.
//!
//! Animations apply the final keyframe immediately (fill-forwards) and hand
//! back a completion signal that fires when [`MemoryNode::finish_animations`]
//! is called. Detached nodes skip animations entirely. Signals whose receiver
//! is gone are pruned on the next `play`, and the request log keeps only the
//! last [`ANIMATION_LOG_LIMIT`] entries, so long-lived nodes stay bounded.
//!
//! # Failure Modes
//!
//! - Appending a node to itself or to one of its descendants is ignored.
//! - `remove()` on a detached node is a no-op.
//! - Input simulated on a non-editable node is ignored.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

use tokio::sync::oneshot;

use crate::animation::{AnimationRequest, Playback};
use crate::node::{InputListener, ListenerId, Node, NodeId, NodeKind};

/// Number of played requests [`MemoryNode::animations`] remembers.
pub const ANIMATION_LOG_LIMIT: usize = 64;

struct MemoryNodeInner {
    id: NodeId,
    kind: NodeKind,
    /// Document roots are always connected.
    is_root: bool,
    text: String,
    content: String,
    flags: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    children: Vec<MemoryNode>,
    parent: Weak<RefCell<MemoryNodeInner>>,
    listeners: Vec<(ListenerId, InputListener)>,
    next_listener: u64,
    /// Most recent requests played, oldest first.
    animations: VecDeque<AnimationRequest>,
    /// Completion senders for animations not yet finished.
    pending: Vec<oneshot::Sender<()>>,
}

/// A node in an in-memory UI tree.
#[derive(Clone)]
pub struct MemoryNode {
    inner: Rc<RefCell<MemoryNodeInner>>,
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryNode")
            .field("id", &inner.id)
            .field("kind", &inner.kind)
            .field("text", &inner.text)
            .field("content", &inner.content)
            .field("children", &inner.children.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl MemoryNode {
    fn build(kind: NodeKind, is_root: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryNodeInner {
                id: NodeId::next(),
                kind,
                is_root,
                text: String::new(),
                content: String::new(),
                flags: BTreeSet::new(),
                styles: BTreeMap::new(),
                children: Vec::new(),
                parent: Weak::new(),
                listeners: Vec::new(),
                next_listener: 0,
                animations: VecDeque::new(),
                pending: Vec::new(),
            })),
        }
    }

    /// A connected document root (the top of a live tree).
    #[must_use]
    pub fn root() -> Self {
        Self::build(NodeKind::TextDisplay, true)
    }

    /// A detached node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self::build(kind, false)
    }

    /// A detached text-display node.
    #[must_use]
    pub fn text(text: &str) -> Self {
        let node = Self::new(NodeKind::TextDisplay);
        node.set_text(text);
        node
    }

    /// A detached container with no text of its own.
    #[must_use]
    pub fn container() -> Self {
        Self::new(NodeKind::TextDisplay)
    }

    /// A detached button.
    #[must_use]
    pub fn button(label: &str) -> Self {
        let node = Self::new(NodeKind::ButtonLabel);
        node.set_text(label);
        node
    }

    /// A detached single-line input.
    #[must_use]
    pub fn text_input() -> Self {
        Self::new(NodeKind::SingleLineInput)
    }

    /// A detached multi-line input.
    #[must_use]
    pub fn text_area() -> Self {
        Self::new(NodeKind::MultiLineInput)
    }

    /// A detached checkbox.
    #[must_use]
    pub fn checkbox() -> Self {
        Self::new(NodeKind::Togglable)
    }

    /// Append `child` and return `self` (builder pattern).
    #[must_use]
    pub fn with_child(self, child: &MemoryNode) -> Self {
        self.append_child(child);
        self
    }
}

// ---------------------------------------------------------------------------
// Host-side helpers
// ---------------------------------------------------------------------------

impl MemoryNode {
    /// Simulate the user editing this node: set content, then fire listeners.
    pub fn simulate_input(&self, content: &str) {
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            if !inner.kind.accepts_input() {
                return;
            }
            inner.content = content.to_string();
            inner
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect::<Vec<_>>()
        };
        for listener in listeners {
            listener(content);
        }
    }

    /// Resolve every in-flight animation's completion signal.
    ///
    /// Returns the number of signals fired. Signals nobody is waiting on are
    /// not counted.
    pub fn finish_animations(&self) -> usize {
        let pending = std::mem::take(&mut self.inner.borrow_mut().pending);
        pending
            .into_iter()
            .filter_map(|done| done.send(()).ok())
            .count()
    }

    /// The last [`ANIMATION_LOG_LIMIT`] requests played on this node, oldest
    /// first.
    #[must_use]
    pub fn animations(&self) -> Vec<AnimationRequest> {
        self.inner.borrow().animations.iter().cloned().collect()
    }

    /// Number of registered input listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Whether this node hangs off a document root.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let mut cursor = self.clone();
        loop {
            if cursor.inner.borrow().is_root {
                return true;
            }
            match cursor.parent() {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    fn is_transparent(&self) -> bool {
        self.inner
            .borrow()
            .styles
            .get("opacity")
            .and_then(|o| o.trim().trim_end_matches('%').parse::<f32>().ok())
            .is_some_and(|o| o <= 0.0)
    }

    /// Whether `self` is `other` or one of its ancestors.
    fn contains(&self, other: &MemoryNode) -> bool {
        let target = self.id();
        let mut cursor = Some(other.clone());
        while let Some(node) = cursor {
            if node.id() == target {
                return true;
            }
            cursor = node.parent();
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Node implementation
// ---------------------------------------------------------------------------

impl Node for MemoryNode {
    fn id(&self) -> NodeId {
        self.inner.borrow().id
    }

    fn kind(&self) -> NodeKind {
        self.inner.borrow().kind
    }

    fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.inner.borrow_mut().text = text.to_string();
    }

    fn content(&self) -> String {
        self.inner.borrow().content.clone()
    }

    fn set_content(&self, content: &str) {
        self.inner.borrow_mut().content = content.to_string();
    }

    fn has_flag(&self, name: &str) -> bool {
        self.inner.borrow().flags.contains(name)
    }

    fn set_flag(&self, name: &str, present: bool) {
        let mut inner = self.inner.borrow_mut();
        if present {
            inner.flags.insert(name.to_string());
        } else {
            inner.flags.remove(name);
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.inner.borrow().styles.get(property).cloned()
    }

    fn set_style(&self, property: &str, value: &str) {
        self.inner
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn on_input(&self, listener: InputListener) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId::new(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.push((id, listener));
        id
    }

    fn remove_input_listener(&self, listener: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(id, _)| *id != listener);
        inner.listeners.len() < before
    }

    fn append_child(&self, child: &Self) {
        if child.contains(self) {
            return;
        }
        child.remove();
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().children.push(child.clone());
    }

    fn replace_children(&self, child: &Self) {
        if child.contains(self) {
            return;
        }
        let old = std::mem::take(&mut self.inner.borrow_mut().children);
        for node in old {
            node.inner.borrow_mut().parent = Weak::new();
        }
        self.append_child(child);
    }

    fn remove(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        let id = self.id();
        parent
            .inner
            .borrow_mut()
            .children
            .retain(|c| c.id() != id);
        self.inner.borrow_mut().parent = Weak::new();
    }

    fn children(&self) -> Vec<Self> {
        self.inner.borrow().children.clone()
    }

    fn parent(&self) -> Option<Self> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| MemoryNode { inner })
    }

    fn play(&self, request: &AnimationRequest) -> Playback {
        if !self.is_connected() {
            return Playback::Skipped;
        }
        let (done_tx, done_rx) = oneshot::channel();
        let mut inner = self.inner.borrow_mut();
        if let Some(last) = request.final_keyframe() {
            for (property, value) in last.iter() {
                inner.styles.insert(property.to_string(), value.to_string());
            }
        }
        if inner.animations.len() == ANIMATION_LOG_LIMIT {
            inner.animations.pop_front();
        }
        inner.animations.push_back(request.clone());
        inner.pending.retain(|done| !done.is_closed());
        inner.pending.push(done_tx);
        Playback::Tracked(done_rx)
    }

    fn is_visible(&self) -> bool {
        let mut cursor = self.clone();
        loop {
            if cursor.is_transparent() {
                return false;
            }
            if cursor.inner.borrow().is_root {
                return true;
            }
            match cursor.parent() {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Keyframe;
    use std::cell::RefCell;
    use std::time::Duration;

    fn fade_out() -> AnimationRequest {
        AnimationRequest::new(
            vec![Keyframe::new().opacity(0.0)],
            Duration::from_millis(300),
            1,
        )
    }

    #[test]
    fn append_and_remove() {
        let root = MemoryNode::root();
        let child = MemoryNode::text("hi");
        root.append_child(&child);
        assert_eq!(root.child_count(), 1);
        assert_eq!(child.parent().map(|p| p.id()), Some(root.id()));
        assert!(child.is_connected());

        child.remove();
        assert_eq!(root.child_count(), 0);
        assert!(child.parent().is_none());
        assert!(!child.is_connected());

        // Second remove is a no-op.
        child.remove();
    }

    #[test]
    fn append_moves_between_parents() {
        let a = MemoryNode::container();
        let b = MemoryNode::container();
        let child = MemoryNode::text("x");
        a.append_child(&child);
        b.append_child(&child);
        assert_eq!(a.child_count(), 0);
        assert_eq!(b.child_count(), 1);
    }

    #[test]
    fn cycles_are_rejected() {
        let outer = MemoryNode::container();
        let inner = MemoryNode::container();
        outer.append_child(&inner);
        inner.append_child(&outer);
        outer.append_child(&outer);
        assert_eq!(inner.child_count(), 0);
        assert_eq!(outer.child_count(), 1);
    }

    #[test]
    fn replace_children_detaches_previous() {
        let root = MemoryNode::root();
        let old = MemoryNode::text("old");
        let new = MemoryNode::text("new");
        root.append_child(&old);
        root.replace_children(&new);
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].id(), new.id());
        assert!(old.parent().is_none());
    }

    #[test]
    fn flags_toggle() {
        let node = MemoryNode::checkbox();
        node.set_flag("checked", true);
        assert!(node.has_flag("checked"));
        node.set_flag("checked", false);
        assert!(!node.has_flag("checked"));
    }

    #[test]
    fn simulate_input_updates_content_before_listeners() {
        let node = MemoryNode::text_input();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let observed = Rc::clone(&seen);
        let handle = node.clone();
        node.on_input(Rc::new(move |value: &str| {
            observed
                .borrow_mut()
                .push((value.to_string(), handle.content()));
        }));

        node.simulate_input("abc");
        assert_eq!(
            *seen.borrow(),
            vec![("abc".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn simulate_input_ignored_on_display_nodes() {
        let node = MemoryNode::text("label");
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        node.on_input(Rc::new(move |_: &str| *flag.borrow_mut() = true));
        node.simulate_input("x");
        assert!(!*fired.borrow());
        assert_eq!(node.content(), "");
    }

    #[test]
    fn removed_listener_stops_firing() {
        let node = MemoryNode::text_input();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let first = node.on_input(Rc::new(move |_: &str| *counter.borrow_mut() += 1));
        let second = node.on_input(Rc::new(|_: &str| {}));
        assert_ne!(first, second);

        assert!(node.remove_input_listener(first));
        assert!(!node.remove_input_listener(first));
        assert_eq!(node.listener_count(), 1);

        node.simulate_input("x");
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn dropped_signals_do_not_accumulate() {
        let root = MemoryNode::root();
        let node = MemoryNode::text("x");
        root.append_child(&node);

        for _ in 0..50 {
            drop(node.play(&fade_out()));
        }
        let _waiting = node.play(&fade_out());
        assert_eq!(node.inner.borrow().pending.len(), 1);
        assert_eq!(node.finish_animations(), 1);
    }

    #[test]
    fn animation_log_is_bounded() {
        let root = MemoryNode::root();
        let node = MemoryNode::text("x");
        root.append_child(&node);

        let requests: Vec<_> = (0..ANIMATION_LOG_LIMIT as u64 + 10)
            .map(|ms| AnimationRequest::new(vec![Keyframe::new()], Duration::from_millis(ms), 1))
            .collect();
        for request in &requests {
            drop(node.play(request));
        }

        let log = node.animations();
        assert_eq!(log.len(), ANIMATION_LOG_LIMIT);
        assert_eq!(log[0].duration, Duration::from_millis(10));
        assert_eq!(log.last(), requests.last());
    }

    #[test]
    fn play_applies_final_keyframe_when_connected() {
        let root = MemoryNode::root();
        let node = MemoryNode::text("x");
        root.append_child(&node);

        let playback = node.play(&fade_out());
        assert!(matches!(playback, Playback::Tracked(_)));
        assert_eq!(node.style("opacity").as_deref(), Some("0"));
        assert_eq!(node.animations().len(), 1);
        assert_eq!(node.finish_animations(), 1);
        assert_eq!(node.finish_animations(), 0);
    }

    #[test]
    fn play_on_detached_node_is_skipped() {
        let node = MemoryNode::text("x");
        assert!(matches!(node.play(&fade_out()), Playback::Skipped));
        assert!(node.style("opacity").is_none());
        assert!(node.animations().is_empty());
    }

    #[test]
    fn visibility_follows_opacity_chain() {
        let root = MemoryNode::root();
        let wrapper = MemoryNode::container();
        let leaf = MemoryNode::text("x");
        root.append_child(&wrapper);
        wrapper.append_child(&leaf);
        assert!(leaf.is_visible());

        wrapper.set_style("opacity", "0");
        assert!(!leaf.is_visible());

        wrapper.set_style("opacity", "1");
        assert!(leaf.is_visible());

        leaf.remove();
        assert!(!leaf.is_visible());
    }

    #[test]
    fn dropping_root_detaches_subtree() {
        let child = MemoryNode::text("x");
        {
            let root = MemoryNode::root();
            root.append_child(&child);
            assert!(child.is_connected());
        }
        assert!(!child.is_connected());
    }
}
