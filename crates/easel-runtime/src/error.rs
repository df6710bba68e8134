#![forbid(unsafe_code)]

//! Error types for rendering, view transitions, and configuration.

use thiserror::Error;

use crate::view::ViewId;

/// Failure reported by a view's renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{message}")]
    Message { message: String },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl RenderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Failure of a view-controller transition.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("{view} failed to render")]
    Render {
        view: ViewId,
        #[source]
        source: RenderError,
    },
}

impl ViewError {
    /// The view the failure belongs to.
    #[must_use]
    pub fn view(&self) -> ViewId {
        match self {
            Self::Render { view, .. } => *view,
        }
    }
}

/// Invalid runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} (expected milliseconds)")]
    InvalidEnv { key: &'static str, value: String },

    #[cfg(feature = "config-file")]
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn render_error_message() {
        assert_eq!(RenderError::new("boom").to_string(), "boom");
    }

    #[test]
    fn view_error_keeps_source() {
        let view = ViewId::next();
        let err = ViewError::Render {
            view,
            source: RenderError::new("template missing"),
        };
        assert_eq!(err.view(), view);
        assert_eq!(err.to_string(), format!("{view} failed to render"));
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("template missing")
        );
    }

    #[test]
    fn boxed_errors_convert() {
        let io = std::io::Error::other("disk gone");
        let err: RenderError = RenderError::from(Box::new(io) as Box<dyn std::error::Error>);
        assert_eq!(err.to_string(), "disk gone");
    }
}
