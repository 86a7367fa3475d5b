/// Convenience result type used across Jolt.
pub type JoltResult<T> = Result<T, JoltError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum JoltError {
    /// An operation named a layer that is not in the layer store.
    #[error("layer not found: '{0}'")]
    LayerNotFound(String),

    /// Invalid user-provided names or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Surface allocation or pixel buffer errors.
    #[error("surface error: {0}")]
    Surface(String),

    /// The engine was disposed and can no longer be used.
    #[error("engine has been disposed")]
    Disposed,

    /// Error raised by a user callback, or a wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JoltError {
    /// Build a [`JoltError::LayerNotFound`] value.
    pub fn layer_not_found(name: impl Into<String>) -> Self {
        Self::LayerNotFound(name.into())
    }

    /// Build a [`JoltError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`JoltError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
