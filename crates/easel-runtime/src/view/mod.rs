#![forbid(unsafe_code)]

//! View lifecycle: render, attach, reveal, dissolve.
//!
//! A [`View`] knows how to produce its root node and how to fade it away. A
//! [`ViewController`] owns a mount point and guarantees that at most one
//! view's root is attached to it at a time.

pub mod controller;
pub mod lifecycle;

pub use controller::{ControllerState, ViewController};
pub use lifecycle::{View, ViewId};
