#![forbid(unsafe_code)]

//! A unit of renderable content with an attach/detach lifecycle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use easel_core::Node;
use easel_core::animation::Animator;

use super::controller::ViewController;
use crate::error::RenderError;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique view identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

type Renderer<N> = dyn Fn(&View<N>, &ViewController<N>) -> Result<N, RenderError>;
type LoadHook<N> = dyn Fn(&View<N>);

struct ViewInner<N> {
    id: ViewId,
    renderer: Box<Renderer<N>>,
    on_load: Option<Rc<LoadHook<N>>>,
    root: RefCell<Option<N>>,
}

/// Renderable content. Cloning shares the same view.
pub struct View<N> {
    inner: Rc<ViewInner<N>>,
}

impl<N> Clone for View<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for View<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.inner.id)
            .field("root", &self.inner.root.borrow())
            .field("on_load", &self.inner.on_load.is_some())
            .finish()
    }
}

impl<N: Node> View<N> {
    /// Create a view from its renderer.
    pub fn new(
        renderer: impl Fn(&View<N>, &ViewController<N>) -> Result<N, RenderError> + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                id: ViewId::next(),
                renderer: Box::new(renderer),
                on_load: None,
                root: RefCell::new(None),
            }),
        }
    }

    /// Attach a hook that runs after the root is attached, before it fades in.
    ///
    /// Must be called before the view is cloned; later calls on a shared view
    /// are ignored.
    #[must_use]
    pub fn on_load(mut self, hook: impl Fn(&View<N>) + 'static) -> Self {
        let id = self.inner.id;
        if let Some(inner) = Rc::get_mut(&mut self.inner) {
            inner.on_load = Some(Rc::new(hook));
        } else {
            tracing::warn!(message = "view.on_load.shared", view = %id);
        }
        self
    }

    #[must_use]
    pub fn id(&self) -> ViewId {
        self.inner.id
    }

    /// The currently rendered root, if any.
    #[must_use]
    pub fn root(&self) -> Option<N> {
        self.inner.root.borrow().clone()
    }

    /// Whether a root is currently held.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.inner.root.borrow().is_some()
    }

    /// Whether two handles refer to the same view.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Produce the root node, hidden (opacity zero), and remember it.
    pub fn render(&self, controller: &ViewController<N>) -> Result<N, RenderError> {
        let root = (self.inner.renderer)(self, controller)?;
        root.set_style("opacity", "0");
        *self.inner.root.borrow_mut() = Some(root.clone());
        Ok(root)
    }

    pub(crate) fn run_on_load(&self) {
        if let Some(hook) = self.inner.on_load.clone() {
            hook(self);
        }
    }

    /// Fade the root out, then detach it. No-op when nothing is rendered.
    pub async fn dissolve(&self, animator: &Animator, duration: Duration) {
        let Some(root) = self.root() else {
            return;
        };
        animator.fade_out(&root, duration).await;
        root.remove();
        self.inner.root.borrow_mut().take();
        tracing::debug!(message = "view.dissolved", view = %self.inner.id, node = %root.id());
    }
}
