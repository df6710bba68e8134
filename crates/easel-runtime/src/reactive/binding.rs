#![forbid(unsafe_code)]

//! Automatic wiring between a [`Store`] and a UI node.
//!
//! `bind` picks the projection from the node's [`NodeKind`]:
//!
//! | kind | store → node | node → store |
//! |---|---|---|
//! | `TextDisplay` | displayed text | none |
//! | `ButtonLabel` | label text | none |
//! | `SingleLineInput`, `MultiLineInput` | editable content | `set(parsed content)` on input |
//! | `Togglable` | `checked` flag from truthiness | none |
//!
//! The forward direction is an ordinary subscriber, so it replays the current
//! value immediately. The reverse direction is an input listener that holds
//! only a [`WeakStore`](super::WeakStore).
//!
//! # Invariants
//!
//! 1. When a node's own input event produces a publish, the forward
//!    projection skips writing that one value back into the node. Other nodes
//!    bound to the same store still update, and any later value (one set by
//!    another subscriber reacting to the input, say) reaches the node too.
//! 2. Input that fails [`BindValue::parse_input`] leaves the store unchanged.
//! 3. After [`Store::unbind`], neither direction touches the store or node,
//!    and the reverse listener is removed from the node.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use easel_core::{CHECKED_FLAG, ListenerId, Node, NodeId, NodeKind};

use super::store::{Store, Subscription};
use super::value::BindValue;

/// Handle describing one store/node wiring.
#[derive(Clone)]
pub struct Binding {
    node: NodeId,
    kind: NodeKind,
    subscription: Subscription,
    listener: Option<ListenerId>,
    armed: Rc<Cell<bool>>,
    /// Removes the reverse listener from the node.
    detach: Option<Rc<dyn Fn()>>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("node", &self.node)
            .field("kind", &self.kind)
            .field("subscription", &self.subscription)
            .field("listener", &self.listener)
            .field("active", &self.armed.get())
            .finish()
    }
}

impl Binding {
    /// The bound node.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Capability class the projection was chosen for.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The forward subscriber's token.
    #[must_use]
    pub fn subscription(&self) -> Subscription {
        self.subscription
    }

    /// Whether node edits flow back into the store.
    #[must_use]
    pub fn is_two_way(&self) -> bool {
        self.listener.is_some()
    }

    /// The reverse listener's token on the node, for two-way bindings.
    #[must_use]
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    /// False once the binding has been removed with [`Store::unbind`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.armed.get()
    }
}

/// Write `value` into `node` according to its capability class.
pub fn project<N: Node, T: BindValue>(node: &N, value: &T) {
    match node.kind() {
        NodeKind::TextDisplay | NodeKind::ButtonLabel => node.set_text(&value.to_display()),
        NodeKind::SingleLineInput | NodeKind::MultiLineInput => {
            node.set_content(&value.to_display());
        }
        NodeKind::Togglable => node.set_flag(CHECKED_FLAG, value.is_truthy()),
    }
}

impl<T: BindValue> Store<T> {
    /// Bind `node` using the projection for its kind. Input nodes also get a
    /// reverse listener that feeds edits back into the store.
    pub fn bind<N: Node>(&self, node: &N) -> Binding {
        let kind = node.kind();
        let armed = Rc::new(Cell::new(true));
        // Version of the store produced by this node's own input, until the
        // forward projection has skipped it.
        let echo: Rc<Cell<Option<u64>>> = Rc::new(Cell::new(None));

        let target = node.clone();
        let source = self.downgrade();
        let forward_armed = Rc::clone(&armed);
        let forward_echo = Rc::clone(&echo);
        let subscription = self.subscribe(move |value: &T| {
            if !forward_armed.get() {
                return;
            }
            if let Some(own) = forward_echo.get() {
                let delivering = source.upgrade().map(|store| store.delivering_version());
                if delivering == Some(own) {
                    forward_echo.set(None);
                    tracing::trace!(message = "binding.echo_suppressed", node = %target.id(), version = own);
                    return;
                }
            }
            project(&target, value);
        });

        let mut listener = None;
        let mut detach: Option<Rc<dyn Fn()>> = None;
        if kind.accepts_input() {
            let store = self.downgrade();
            let reverse_armed = Rc::clone(&armed);
            let node_id = node.id();
            let id = node.on_input(Rc::new(move |content: &str| {
                if !reverse_armed.get() {
                    return;
                }
                let Some(store) = store.upgrade() else {
                    return;
                };
                match T::parse_input(content) {
                    Some(value) => {
                        echo.set(Some(store.version() + 1));
                        store.set(value);
                    }
                    None => {
                        tracing::debug!(message = "binding.input_rejected", node = %node_id, content);
                    }
                }
            }));
            let owner = node.clone();
            listener = Some(id);
            detach = Some(Rc::new(move || {
                owner.remove_input_listener(id);
            }));
        }

        tracing::debug!(
            message = "binding.bind",
            node = %node.id(),
            kind = kind.as_str(),
            two_way = listener.is_some(),
        );

        Binding {
            node: node.id(),
            kind,
            subscription,
            listener,
            armed,
            detach,
        }
    }
}

impl<T: Clone + 'static> Store<T> {
    /// Bind `node` with a caller-supplied forward projection. No reverse
    /// listener is installed.
    pub fn bind_with<N: Node>(&self, node: &N, projection: impl Fn(&N, &T) + 'static) -> Binding {
        let armed = Rc::new(Cell::new(true));
        let target = node.clone();
        let forward_armed = Rc::clone(&armed);
        let subscription = self.subscribe(move |value: &T| {
            if forward_armed.get() {
                projection(&target, value);
            }
        });

        tracing::debug!(
            message = "binding.bind",
            node = %node.id(),
            kind = node.kind().as_str(),
            two_way = false,
        );

        Binding {
            node: node.id(),
            kind: node.kind(),
            subscription,
            listener: None,
            armed,
            detach: None,
        }
    }

    /// Disconnect a binding in both directions. Returns `false` if it was
    /// already removed.
    pub fn unbind(&self, binding: &Binding) -> bool {
        if !binding.armed.replace(false) {
            return false;
        }
        tracing::debug!(message = "binding.unbind", node = %binding.node);
        if let Some(detach) = &binding.detach {
            detach();
        }
        self.unsubscribe(binding.subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::MemoryNode;
    use tracing_test::traced_test;

    #[test]
    fn text_node_follows_store() {
        let store = Store::new("initial".to_string());
        let node = MemoryNode::text("");
        let binding = store.bind(&node);

        assert_eq!(node.text(), "initial");
        store.set("hello".to_string());
        assert_eq!(node.text(), "hello");
        assert!(!binding.is_two_way());
        assert_eq!(node.listener_count(), 0);
    }

    #[test]
    fn button_label_follows_store() {
        let store = Store::new(3);
        let node = MemoryNode::button("");
        store.bind(&node);
        store.set(4);
        assert_eq!(node.text(), "4");
    }

    #[test]
    fn checkbox_flag_follows_truthiness() {
        let store = Store::new(false);
        let node = MemoryNode::checkbox();
        let binding = store.bind(&node);

        assert!(!node.has_flag(CHECKED_FLAG));
        store.set(true);
        assert!(node.has_flag(CHECKED_FLAG));
        store.set(false);
        assert!(!node.has_flag(CHECKED_FLAG));
        assert!(!binding.is_two_way());
    }

    #[test]
    fn input_round_trip() {
        let store = Store::new(String::new());
        let input = MemoryNode::text_input();
        let binding = store.bind(&input);
        assert!(binding.is_two_way());

        input.simulate_input("x");
        assert_eq!(store.get(), "x");
        assert_eq!(input.content(), "x");

        store.set("y".to_string());
        assert_eq!(input.content(), "y");
    }

    #[test]
    fn own_input_is_not_written_back() {
        let store = Store::new(0_i64);
        let input = MemoryNode::text_input();
        let other = MemoryNode::text_input();
        let mirror = MemoryNode::text("");
        store.bind(&input);
        store.bind(&other);
        store.bind(&mirror);

        // Normalizing " 12 " to "12" would be visible if the echo were written.
        input.simulate_input(" 12 ");
        assert_eq!(store.get(), 12);
        assert_eq!(input.content(), " 12 ");
        assert_eq!(other.content(), "12");
        assert_eq!(mirror.text(), "12");

        // Programmatic sets still reach the input.
        store.set(7);
        assert_eq!(input.content(), "7");
    }

    #[test]
    fn correction_during_own_input_reaches_the_input() {
        let store = Store::new(0_i64);
        let input = MemoryNode::text_input();
        store.bind(&input);
        let clamp = store.clone();
        store.subscribe(move |v: &i64| {
            if *v > 100 {
                clamp.set(100);
            }
        });

        input.simulate_input("150");
        assert_eq!(store.get(), 100);
        assert_eq!(input.content(), "100");
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn correction_subscribed_before_binding_reaches_the_input() {
        let store = Store::new(0_i64);
        let clamp = store.clone();
        store.subscribe(move |v: &i64| {
            if *v > 100 {
                clamp.set(100);
            }
        });
        let input = MemoryNode::text_input();
        store.bind(&input);

        input.simulate_input("150");
        assert_eq!(input.content(), "100");

        // In-range input is still left exactly as typed.
        input.simulate_input(" 42");
        assert_eq!(store.get(), 42);
        assert_eq!(input.content(), " 42");
    }

    #[test]
    fn text_area_is_two_way() {
        let store = Store::new(String::from("draft"));
        let area = MemoryNode::text_area();
        let preview = MemoryNode::text("");
        let binding = store.bind(&area);
        store.bind(&preview);

        assert!(binding.is_two_way());
        assert_eq!(binding.kind(), NodeKind::MultiLineInput);
        assert_eq!(area.content(), "draft");

        area.simulate_input("line one\nline two");
        assert_eq!(store.get(), "line one\nline two");
        assert_eq!(preview.text(), "line one\nline two");

        store.set(String::from("reset"));
        assert_eq!(area.content(), "reset");
    }

    #[test]
    fn unparseable_input_is_ignored() {
        let store = Store::new(10_i64);
        let input = MemoryNode::text_input();
        store.bind(&input);

        input.simulate_input("abc");
        assert_eq!(store.get(), 10);
        assert_eq!(store.version(), 0);

        input.simulate_input("12");
        assert_eq!(store.get(), 12);
    }

    #[test]
    #[traced_test]
    fn rejected_input_is_logged() {
        let store = Store::new(1_u8);
        let input = MemoryNode::text_input();
        store.bind(&input);
        input.simulate_input("lots");
        assert!(logs_contain("binding.input_rejected"));
        assert!(logs_contain("binding.bind"));
    }

    #[test]
    fn unbind_disconnects_both_directions() {
        let store = Store::new(String::new());
        let input = MemoryNode::text_input();
        let binding = store.bind(&input);

        assert!(store.unbind(&binding));
        assert!(!binding.is_active());
        assert!(!store.unbind(&binding));
        assert_eq!(input.listener_count(), 0);

        input.simulate_input("ignored");
        assert_eq!(store.get(), "");
        store.set("not shown".to_string());
        assert_eq!(input.content(), "ignored");
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn repeated_bind_unbind_leaves_no_listeners() {
        let store = Store::new(String::new());
        let input = MemoryNode::text_input();
        for _ in 0..100 {
            let binding = store.bind(&input);
            assert_eq!(input.listener_count(), 1);
            assert!(binding.listener().is_some());
            store.unbind(&binding);
        }
        assert_eq!(input.listener_count(), 0);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn dropped_store_makes_listener_inert() {
        let input = MemoryNode::text_input();
        {
            let store = Store::new(String::new());
            store.bind(&input);
        }
        // Must not panic or resurrect the store.
        input.simulate_input("late");
        assert_eq!(input.content(), "late");
    }

    #[test]
    fn custom_projection() {
        let store = Store::new(vec![1, 2, 3]);
        let node = MemoryNode::text("");
        store.bind_with(&node, |n: &MemoryNode, v: &Vec<i32>| {
            n.set_text(&format!("{} items", v.len()));
        });
        assert_eq!(node.text(), "3 items");
        store.set(vec![]);
        assert_eq!(node.text(), "0 items");
    }
}
