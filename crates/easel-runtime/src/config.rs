#![forbid(unsafe_code)]

//! Runtime configuration: transition durations and frame pacing.
//!
//! Defaults match the built-in fade presets (300ms enter, 300ms exit) and a
//! ~60 Hz frame. Values can be overridden in code, from environment
//! variables, or (with the `config-file` feature) from TOML.
//!
//! | variable | field | unit |
//! |---|---|---|
//! | `EASEL_FRAME_MS` | `frame_interval` | ms |
//! | `EASEL_ENTER_MS` | `enter_duration` | ms |
//! | `EASEL_EXIT_MS` | `exit_duration` | ms |

use std::time::Duration;

use easel_core::TokioTimer;
use easel_core::animation::{Animator, Preset};
use easel_core::timer::DEFAULT_FRAME_INTERVAL;

use crate::error::ConfigError;

pub const ENV_FRAME_MS: &str = "EASEL_FRAME_MS";
pub const ENV_ENTER_MS: &str = "EASEL_ENTER_MS";
pub const ENV_EXIT_MS: &str = "EASEL_EXIT_MS";

/// Timing knobs for the view lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// One rendering frame; added after every timed animation.
    pub frame_interval: Duration,
    /// Entrance fade for a freshly loaded view.
    pub enter_duration: Duration,
    /// Exit fade for a dissolving view.
    pub exit_duration: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            enter_duration: Preset::FadeIn.default_duration(),
            exit_duration: Preset::FadeOut.default_duration(),
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    #[must_use]
    pub fn with_enter_duration(mut self, duration: Duration) -> Self {
        self.enter_duration = duration;
        self
    }

    #[must_use]
    pub fn with_exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    /// Defaults overridden by `EASEL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `EASEL_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = parse_ms(&lookup, ENV_FRAME_MS)? {
            config.frame_interval = ms;
        }
        if let Some(ms) = parse_ms(&lookup, ENV_ENTER_MS)? {
            config.enter_duration = ms;
        }
        if let Some(ms) = parse_ms(&lookup, ENV_EXIT_MS)? {
            config.exit_duration = ms;
        }
        Ok(config)
    }

    /// Parse TOML of the form `frame_ms = 16`, `enter_ms = 300`, `exit_ms = 300`.
    /// Missing keys keep their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut config = Self::default();
        if let Some(ms) = raw.frame_ms {
            config.frame_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.enter_ms {
            config.enter_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.exit_ms {
            config.exit_duration = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// An animator running on tokio time with this config's frame interval.
    #[must_use]
    pub fn animator(&self) -> Animator {
        Animator::new(TokioTimer::new().with_frame_interval(self.frame_interval))
    }
}

fn parse_ms(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

#[cfg(feature = "config-file")]
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    frame_ms: Option<u64>,
    enter_ms: Option<u64>,
    exit_ms: Option<u64>,
}
