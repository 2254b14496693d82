//! Typed errors for the few fallible, non-hot-path operations
//!
//! Per-frame work never returns errors: missing bodies or meshes are skipped.

use thiserror::Error;

/// Convex hull generation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HullError {
    #[error("convex hull needs at least 4 points, got {0}")]
    TooFewPoints(usize),
    #[error("convex hull accepts at most {max} points, got {got}")]
    TooManyPoints { got: usize, max: usize },
    #[error("point {0} is not finite")]
    NonFinite(usize),
    #[error("points are coplanar or coincident")]
    Degenerate,
}

/// Level / tuning loading failures
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
    #[error("invalid level '{name}': {reason}")]
    Invalid { name: String, reason: String },
}
