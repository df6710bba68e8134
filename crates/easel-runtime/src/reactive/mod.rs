#![forbid(unsafe_code)]

//! Reactive value cells and their bindings to UI nodes.
//!
//! - [`Store`]: a shared value with ordered publish/subscribe notification.
//! - [`Subscription`]: token returned by [`Store::subscribe`], accepted by
//!   [`Store::unsubscribe`].
//! - [`Binding`]: a store wired to a node, with a projection picked from the
//!   node's [`NodeKind`](easel_core::NodeKind).
//! - [`BindValue`] / [`ValueLen`]: what a value type must offer to be bound
//!   to nodes or measured.
//!
//! # Architecture
//!
//! `Store<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are strong `Rc<dyn Fn(&T)>` callbacks kept in subscription
//! order. Publishing never holds a borrow while a callback runs, so callbacks
//! may read the store, subscribe, or `set` again.
//!
//! # Invariants
//!
//! 1. A new subscriber is called once with the current value before it sees
//!    any later change (replay).
//! 2. Subscribers are notified in subscription order.
//! 3. Every `set` publishes, including one that stores an equal value.
//! 4. Every subscriber observes every published value, in publish order. A
//!    `set` issued from inside a callback is delivered after the current
//!    publish finishes.
//! 5. `version()` increments exactly once per `set`.

pub mod binding;
pub mod store;
pub mod value;

pub use binding::Binding;
pub use store::{Store, Subscription, WeakStore};
pub use value::{BindValue, ValueLen};
