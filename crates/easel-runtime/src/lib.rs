#![forbid(unsafe_code)]

//! Runtime: reactive stores, automatic node bindings, and the view lifecycle.
//!
//! Everything here runs on one logical thread. Suspension happens only at
//! `await` points (store transforms, animation waits), so the types use
//! `Rc`/`RefCell` and carry no `Send` bounds.

pub mod config;
pub mod error;
pub mod reactive;
pub mod view;

pub use config::RuntimeConfig;
pub use error::{ConfigError, RenderError, ViewError};
pub use reactive::{BindValue, Binding, Store, Subscription, ValueLen, WeakStore};
pub use view::{ControllerState, View, ViewController, ViewId};
