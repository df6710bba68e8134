#![forbid(unsafe_code)]

//! Easel public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

#[cfg(feature = "logging")]
pub mod logging;

pub mod prelude {
    pub use easel_core as core;
    pub use easel_runtime as runtime;

    pub use easel_core::animation::{Actor, AnimationRequest, Animator, Easing, Keyframe, Preset, Scene};
    pub use easel_core::{ListenerId, MemoryNode, Node, NodeId, NodeKind, Timer, TokioTimer};
    pub use easel_runtime::{
        BindValue, Binding, ControllerState, RenderError, RuntimeConfig, Store, Subscription,
        View, ViewController, ViewError,
    };
}
