#![forbid(unsafe_code)]

//! Timed keyframe animations that gate visual transitions.
//!
//! The engine is deliberately thin: a node is asked to [`play`] an
//! [`AnimationRequest`], and the caller is suspended on the [`Timer`] for the
//! request's duration plus one frame. The renderer's own notion of completion
//! is not consulted by [`Animator::animate`]; callers that need exact
//! synchronization use [`Animator::animate_until_finished`], which waits for
//! the node's completion signal instead.
//!
//! # Invariants
//!
//! 1. [`Animator::animate`] never resolves before `duration` has elapsed on the
//!    animator's timer.
//! 2. The final keyframe's properties are authoritative once the call
//!    resolves (fill-forwards), regardless of interpolation progress.
//! 3. No call in this module can fail. Animating a detached node still waits
//!    out the duration but touches nothing.
//!
//! [`play`]: crate::Node::play

pub mod presets;
pub mod scene;

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::node::Node;
use crate::timer::{Timer, TokioTimer};

pub use presets::Preset;
pub use scene::{Actor, Scene};

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Timing curve applied across a keyframe interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// CSS-style cubic Bézier with fixed endpoints (0,0) and (1,1).
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Symmetric ease-in/ease-out used by every transition in this crate.
    pub const STANDARD: Self = Self::CubicBezier(0.42, 0.0, 0.58, 1.0);

    /// Eased progress for linear progress `t` (clamped to 0.0–1.0).
    #[must_use]
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicBezier(x1, y1, x2, y2) => {
                // x(s) is monotonic for x1, x2 in [0, 1]; bisect for s.
                let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
                let mut s = t;
                for _ in 0..32 {
                    let x = bezier(s, x1, x2);
                    if (x - t).abs() < 1e-6 {
                        break;
                    }
                    if x < t {
                        lo = s;
                    } else {
                        hi = s;
                    }
                    s = (lo + hi) * 0.5;
                }
                bezier(s, y1, y2)
            }
        }
    }

    /// CSS timing-function text.
    #[must_use]
    pub fn css(self) -> String {
        match self {
            Self::Linear => "linear".to_string(),
            Self::CubicBezier(x1, y1, x2, y2) => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

// ---------------------------------------------------------------------------
// Keyframes and requests
// ---------------------------------------------------------------------------

/// A snapshot of style properties used as an interpolation endpoint.
///
/// Properties keep insertion order; setting an existing property replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyframe {
    properties: Vec<(String, String)>,
}

impl Keyframe {
    /// Empty keyframe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary property.
    #[must_use]
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if let Some(slot) = self.properties.iter_mut().find(|(p, _)| p == property) {
            slot.1 = value;
        } else {
            self.properties.push((property.to_string(), value));
        }
        self
    }

    /// Set `opacity`.
    #[must_use]
    pub fn opacity(self, opacity: f32) -> Self {
        self.with("opacity", format!("{opacity}"))
    }

    /// Set `transform`.
    #[must_use]
    pub fn transform(self, transform: &str) -> Self {
        self.with("transform", transform)
    }

    /// Set `filter`.
    #[must_use]
    pub fn filter(self, filter: &str) -> Self {
        self.with("filter", filter)
    }

    /// Value of `property`, if present.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Iterator over (property, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Number of properties.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the keyframe sets nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Everything a node needs to run one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    pub keyframes: Vec<Keyframe>,
    pub duration: Duration,
    pub iterations: u32,
    pub easing: Easing,
}

impl AnimationRequest {
    /// Request with the standard easing.
    #[must_use]
    pub fn new(keyframes: Vec<Keyframe>, duration: Duration, iterations: u32) -> Self {
        Self {
            keyframes,
            duration,
            iterations: iterations.max(1),
            easing: Easing::STANDARD,
        }
    }

    /// Override the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// The keyframe whose values persist after the animation ends.
    #[must_use]
    pub fn final_keyframe(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }
}

/// What a node did with an [`AnimationRequest`].
#[derive(Debug)]
pub enum Playback {
    /// Applied; the host offers no completion signal.
    Untracked,
    /// Applied; the receiver resolves (or is dropped) when the host finishes.
    Tracked(oneshot::Receiver<()>),
    /// The node is detached; nothing was applied.
    Skipped,
}

// ---------------------------------------------------------------------------
// Animator
// ---------------------------------------------------------------------------

/// Runs animations on nodes and suspends callers until they are done.
///
/// Cloning an `Animator` shares its timer.
#[derive(Clone)]
pub struct Animator {
    timer: Rc<dyn Timer>,
    easing: Easing,
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(TokioTimer::new())
    }
}

impl Animator {
    /// Create an animator suspending on `timer`.
    #[must_use]
    pub fn new(timer: impl Timer + 'static) -> Self {
        Self {
            timer: Rc::new(timer),
            easing: Easing::STANDARD,
        }
    }

    /// Create an animator sharing an existing timer.
    #[must_use]
    pub fn with_shared_timer(timer: Rc<dyn Timer>) -> Self {
        Self {
            timer,
            easing: Easing::STANDARD,
        }
    }

    /// Override the easing used for requests built by this animator.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Build a request using this animator's easing.
    #[must_use]
    pub fn request(
        &self,
        keyframes: Vec<Keyframe>,
        duration: Duration,
        iterations: u32,
    ) -> AnimationRequest {
        AnimationRequest::new(keyframes, duration, iterations).with_easing(self.easing)
    }

    /// Play `keyframes` on `node` and resolve after `duration` plus one frame.
    pub async fn animate<N: Node>(
        &self,
        node: &N,
        keyframes: Vec<Keyframe>,
        duration: Duration,
        iterations: u32,
    ) {
        let request = self.request(keyframes, duration, iterations);
        self.run(node, &request).await;
    }

    /// Timed execution of a prepared request.
    pub async fn run<N: Node>(&self, node: &N, request: &AnimationRequest) {
        let playback = node.play(request);
        tracing::trace!(
            message = "animation.start",
            node = %node.id(),
            duration_ms = request.duration.as_millis() as u64,
            iterations = request.iterations,
            skipped = matches!(playback, Playback::Skipped),
        );
        // The completion signal, if any, is ignored here by contract.
        drop(playback);
        self.timer.sleep(request.duration).await;
        self.timer.next_frame().await;
    }

    /// Play `request` and resolve when the node reports completion.
    ///
    /// Skipped playback and dropped signals resolve immediately. Nodes that
    /// cannot signal completion fall back to the timed wait of [`run`].
    ///
    /// [`run`]: Animator::run
    pub async fn animate_until_finished<N: Node>(&self, node: &N, request: &AnimationRequest) {
        match node.play(request) {
            Playback::Tracked(done) => {
                // A dropped sender means the host tore the node down.
                let _ = done.await;
            }
            Playback::Untracked => {
                self.timer.sleep(request.duration).await;
                self.timer.next_frame().await;
            }
            Playback::Skipped => {}
        }
        tracing::trace!(message = "animation.finished", node = %node.id());
    }

    /// Play a named preset with its default duration.
    pub async fn play<N: Node>(&self, node: &N, preset: Preset) {
        self.play_for(node, preset, preset.default_duration()).await;
    }

    /// Play a named preset with an explicit duration.
    pub async fn play_for<N: Node>(&self, node: &N, preset: Preset, duration: Duration) {
        self.animate(node, preset.keyframes(), duration, preset.iterations())
            .await;
    }

    /// Fade `node` to fully opaque.
    pub async fn fade_in<N: Node>(&self, node: &N, duration: Duration) {
        self.play_for(node, Preset::FadeIn, duration).await;
    }

    /// Fade `node` to fully transparent.
    pub async fn fade_out<N: Node>(&self, node: &N, duration: Duration) {
        self.play_for(node, Preset::FadeOut, duration).await;
    }
}
