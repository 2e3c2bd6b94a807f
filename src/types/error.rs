//! Error types
//!
//! Nothing here is fatal to the control loop; the controller recovers every
//! variant at the tick boundary.

use thiserror::Error;

pub type AttentionResult<T> = Result<T, AttentionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttentionError {
    #[error("no transform from '{source_frame}' to '{target_frame}'")]
    TransformUnavailable {
        source_frame: String,
        target_frame: String,
    },

    #[error("attention region '{0}' could not be resolved")]
    RegionLookupFailed(String),

    #[error("no face selected")]
    NoFaceSelected,

    #[error("unknown {kind} mode '{value}'")]
    UnknownMode { kind: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("could not load '{path}': {message}")]
    ConfigIo { path: String, message: String },
}

impl AttentionError {
    pub fn transform_unavailable(source: &str, target: &str) -> Self {
        Self::TransformUnavailable {
            source_frame: source.to_string(),
            target_frame: target.to_string(),
        }
    }
}
