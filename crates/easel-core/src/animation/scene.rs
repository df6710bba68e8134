#![forbid(unsafe_code)]

//! Scenes: labelled groups of animations played together.
//!
//! An [`Actor`] stores one animation request bound to a node. A [`Scene`]
//! holds named actors and plays them concurrently; [`Scene::play`] resolves
//! once every actor has resolved.
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use easel_core::animation::{Actor, Animator, Preset, Scene};
//!
//! let scene = Scene::new()
//!     .add("title", Actor::preset(title.clone(), Preset::FadeInUp))
//!     .add("logo", Actor::preset(logo.clone(), Preset::Grow));
//!
//! scene.play(&Animator::default()).await;
//! ```
//!
//! # Invariants
//!
//! 1. Each actor has a unique label; duplicate labels overwrite in place.
//! 2. `play()` starts every actor before awaiting any of them.
//! 3. An empty scene resolves immediately.
//! 4. `duration()` is the longest actor duration (zero when empty).

use std::time::Duration;

use futures::future::join_all;

use super::{Animator, Keyframe, Preset};
use crate::node::Node;

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// A node plus the animation it should perform.
#[derive(Debug, Clone)]
pub struct Actor<N> {
    node: N,
    keyframes: Vec<Keyframe>,
    duration: Duration,
    iterations: u32,
}

impl<N: Node> Actor<N> {
    /// Create an actor with explicit keyframes.
    #[must_use]
    pub fn new(node: N, keyframes: Vec<Keyframe>, duration: Duration, iterations: u32) -> Self {
        Self {
            node,
            keyframes,
            duration,
            iterations,
        }
    }

    /// Create an actor from a preset with its default duration.
    #[must_use]
    pub fn preset(node: N, preset: Preset) -> Self {
        Self::new(
            node,
            preset.keyframes(),
            preset.default_duration(),
            preset.iterations(),
        )
    }

    /// Override the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// The node this actor animates.
    #[inline]
    #[must_use]
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Configured duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Run this actor's animation.
    pub async fn play(&self, animator: &Animator) {
        animator
            .animate(
                &self.node,
                self.keyframes.clone(),
                self.duration,
                self.iterations,
            )
            .await;
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct SceneMember<N> {
    label: String,
    actor: Actor<N>,
}

/// A collection of labelled actors played concurrently.
#[derive(Debug, Clone)]
pub struct Scene<N> {
    members: Vec<SceneMember<N>>,
}

impl<N: Node> Default for Scene<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> Scene<N> {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Add a labelled actor (builder pattern).
    #[must_use]
    pub fn add(mut self, label: &str, actor: Actor<N>) -> Self {
        self.insert(label, actor);
        self
    }

    /// Insert a labelled actor, replacing any actor with the same label.
    pub fn insert(&mut self, label: &str, actor: Actor<N>) {
        if let Some(existing) = self.members.iter_mut().find(|m| m.label == label) {
            existing.actor = actor;
        } else {
            self.members.push(SceneMember {
                label: label.to_string(),
                actor,
            });
        }
    }

    /// Remove a labelled actor. Returns `true` if found and removed.
    pub fn remove(&mut self, label: &str) -> bool {
        let len_before = self.members.len();
        self.members.retain(|m| m.label != label);
        self.members.len() < len_before
    }

    /// Number of actors.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the scene has no actors.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up an actor by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Actor<N>> {
        self.members
            .iter()
            .find(|m| m.label == label)
            .map(|m| &m.actor)
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.label.as_str())
    }

    /// Longest actor duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.members
            .iter()
            .map(|m| m.actor.duration())
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Play every actor concurrently and resolve when all have finished.
    pub async fn play(&self, animator: &Animator) {
        tracing::debug!(
            message = "scene.play",
            actors = self.members.len(),
            duration_ms = self.duration().as_millis() as u64,
        );
        join_all(self.members.iter().map(|m| m.actor.play(animator))).await;
    }
}
