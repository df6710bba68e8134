#![forbid(unsafe_code)]

//! Sequencing of view replacement on a single mount point.
//!
//! # State machine
//!
//! ```text
//!            load(v)                     load(w)
//!   Empty ───────────▶ Active(v) ───────────────────▶ Active(w)
//!     ▲                   │      dissolve v, render w
//!     └──── clear() ──────┘
//! ```
//!
//! `load` runs, in order: dissolve the current view (exit fade, then detach),
//! make the new view current, render it hidden, attach it under the mount
//! point replacing residual children, run its `on_load` hook, and fade it in.
//!
//! # Invariants
//!
//! 1. Transitions are serialized: a `load` or `clear` issued while another is
//!    in flight waits for it, so transitions run in call order and two views'
//!    roots never coexist under the mount point.
//! 2. The outgoing view is fully dissolved and detached before the incoming
//!    view renders.
//! 3. `current()` changes only at the end of a dissolve (to `None`) and just
//!    before a render (to the new view).
//! 4. The `on_load` hook sees its root attached but still transparent.
//!
//! # Failure Modes
//!
//! - **Renderer error**: the previous view is already gone, so the controller
//!   settles in `Empty` with nothing attached and `load` returns
//!   [`ViewError::Render`].
//! - **Calling `load` from inside a renderer or hook and awaiting it**:
//!   deadlocks on the transition gate. Spawn it as a separate local task.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use easel_core::Node;
use easel_core::animation::Animator;
use tokio::sync::Mutex;

use super::lifecycle::{View, ViewId};
use crate::config::RuntimeConfig;
use crate::error::ViewError;

/// Externally observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Empty,
    Active(ViewId),
}

struct ControllerInner<N> {
    mount: N,
    current: RefCell<Option<View<N>>>,
    /// One in-flight transition at a time.
    gate: Mutex<()>,
    animator: Animator,
    config: RuntimeConfig,
}

/// Owns a mount point and swaps views in and out of it.
///
/// Cloning shares the controller, which lets renderers keep a handle for
/// later navigation.
pub struct ViewController<N> {
    inner: Rc<ControllerInner<N>>,
}

impl<N> Clone for ViewController<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N: Node + fmt::Debug> fmt::Debug for ViewController<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewController")
            .field("mount", &self.inner.mount)
            .field("state", &self.state())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl<N: Node> ViewController<N> {
    /// Controller with default timing.
    #[must_use]
    pub fn new(mount: N) -> Self {
        Self::with_config(mount, RuntimeConfig::default())
    }

    /// Controller with explicit timing, animating on tokio time.
    #[must_use]
    pub fn with_config(mount: N, config: RuntimeConfig) -> Self {
        let animator = config.animator();
        Self::with_animator(mount, config, animator)
    }

    /// Controller with explicit timing and animator.
    #[must_use]
    pub fn with_animator(mount: N, config: RuntimeConfig, animator: Animator) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                mount,
                current: RefCell::new(None),
                gate: Mutex::new(()),
                animator,
                config,
            }),
        }
    }

    /// The mount point.
    #[must_use]
    pub fn mount(&self) -> &N {
        &self.inner.mount
    }

    /// The animator used for transitions.
    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.inner.animator
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// The current view, if any.
    #[must_use]
    pub fn current(&self) -> Option<View<N>> {
        self.inner.current.borrow().clone()
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        match &*self.inner.current.borrow() {
            Some(view) => ControllerState::Active(view.id()),
            None => ControllerState::Empty,
        }
    }

    /// Whether a `load` or `clear` is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.inner.gate.try_lock().is_err()
    }

    /// Replace the current view with `view`.
    pub async fn load(&self, view: View<N>) -> Result<(), ViewError> {
        let _turn = self.inner.gate.lock().await;
        tracing::debug!(message = "view.load", view = %view.id());

        self.dissolve_current().await;

        *self.inner.current.borrow_mut() = Some(view.clone());
        let root = match view.render(self) {
            Ok(root) => root,
            Err(source) => {
                self.inner.current.borrow_mut().take();
                tracing::warn!(message = "view.render_failed", view = %view.id(), error = %source);
                return Err(ViewError::Render {
                    view: view.id(),
                    source,
                });
            }
        };

        self.inner.mount.replace_children(&root);
        view.run_on_load();

        self.inner
            .animator
            .fade_in(&root, self.inner.config.enter_duration)
            .await;
        tracing::debug!(message = "view.loaded", view = %view.id(), node = %root.id());
        Ok(())
    }

    /// Dissolve the current view, leaving the controller empty.
    pub async fn clear(&self) {
        let _turn = self.inner.gate.lock().await;
        self.dissolve_current().await;
    }

    async fn dissolve_current(&self) {
        let Some(previous) = self.current() else {
            return;
        };
        previous
            .dissolve(&self.inner.animator, self.inner.config.exit_duration)
            .await;
        self.inner.current.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use easel_core::MemoryNode;
    use tracing_test::traced_test;

    fn labelled(label: &'static str) -> View<MemoryNode> {
        View::new(move |_, _| Ok(MemoryNode::text(label)))
    }

    #[tokio::test(start_paused = true)]
    async fn load_attaches_and_reveals() {
        let mount = MemoryNode::root();
        let controller = ViewController::new(mount.clone());
        let view = labelled("home");

        controller.load(view.clone()).await.unwrap();

        assert_eq!(controller.state(), ControllerState::Active(view.id()));
        let children = mount.children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text(), "home");
        assert!(children[0].is_visible());
        assert!(!controller.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn load_replaces_residual_children() {
        let mount = MemoryNode::root();
        mount.append_child(&MemoryNode::text("server-rendered"));
        let controller = ViewController::new(mount.clone());

        controller.load(labelled("app")).await.unwrap();
        let children = mount.children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text(), "app");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_on_empty_is_noop() {
        let mount = MemoryNode::root();
        let controller = ViewController::new(mount.clone());
        let start = tokio::time::Instant::now();
        controller.clear().await;
        assert_eq!(start.elapsed(), std::time::Duration::ZERO);
        assert_eq!(controller.state(), ControllerState::Empty);
        assert!(mount.animations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn render_failure_leaves_controller_empty() {
        let mount = MemoryNode::root();
        let controller = ViewController::new(mount.clone());
        controller.load(labelled("first")).await.unwrap();

        let broken: View<MemoryNode> = View::new(|_, _| Err(RenderError::new("template missing")));
        let err = controller.load(broken.clone()).await.unwrap_err();

        assert_eq!(err.view(), broken.id());
        assert_eq!(controller.state(), ControllerState::Empty);
        assert_eq!(mount.child_count(), 0);

        // The controller is still usable afterwards.
        controller.load(labelled("recovered")).await.unwrap();
        assert_eq!(mount.children()[0].text(), "recovered");
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn render_failure_is_logged() {
        let controller = ViewController::new(MemoryNode::root());
        let broken: View<MemoryNode> = View::new(|_, _| Err(RenderError::new("template missing")));
        assert!(controller.load(broken).await.is_err());
        assert!(logs_contain("view.render_failed"));
        assert!(logs_contain("template missing"));
    }

    #[test]
    fn debug_output_names_state() {
        let controller = ViewController::new(MemoryNode::root());
        let text = format!("{controller:?}");
        assert!(text.contains("Empty"));
    }
}
