/// Convenience result type used across quadblit.
pub type QuadblitResult<T> = Result<T, QuadblitError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum QuadblitError {
    /// Invalid buffer geometry or draw-request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Raster handle bytes cannot be interpreted as pixels.
    #[error("unsupported raster format: {0}")]
    UnsupportedFormat(String),

    /// Operation on a context whose writes were already committed.
    #[error("context disposed: {0}")]
    ContextDisposed(String),

    /// Corner correspondence does not describe an invertible mapping.
    #[error("degenerate transform: {0}")]
    DegenerateTransform(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuadblitError {
    /// Build a [`QuadblitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuadblitError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`QuadblitError::ContextDisposed`] value.
    pub fn context_disposed(msg: impl Into<String>) -> Self {
        Self::ContextDisposed(msg.into())
    }

    /// Build a [`QuadblitError::DegenerateTransform`] value.
    pub fn degenerate_transform(msg: impl Into<String>) -> Self {
        Self::DegenerateTransform(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
