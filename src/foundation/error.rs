/// Convenience result type used across stamp.
pub type StampResult<T> = Result<T, StampError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Most scene-graph operations degrade silently (logging instead of failing), so these
/// variants cover API misuse and IO rather than the as-built structural checks.
#[derive(thiserror::Error, Debug)]
pub enum StampError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Scene-graph misuse: unknown node ids, group operations on leaves.
    #[error("graph error: {0}")]
    Graph(String),

    /// Image loading or decoding failures.
    #[error("asset error: {0}")]
    Asset(String),

    /// Failures while rendering a scene to its surface.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies, IO or event listeners.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StampError {
    /// Build a [`StampError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StampError::Graph`] value.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }

    /// Build a [`StampError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`StampError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
