/// Convenience result type used across abstrakt.
pub type AbstraktResult<T> = Result<T, AbstraktError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum AbstraktError {
    /// A `[min, max]` setting pair was written with `min > max`.
    #[error("invalid range for '{path}': min {min} exceeds max {max}")]
    InvalidRange {
        /// Base path of the range setting (without `.min`/`.max`).
        path: String,
        /// Rejected lower bound.
        min: f64,
        /// Rejected upper bound.
        max: f64,
    },

    /// Invalid user-provided settings, filters or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing a scene or reading back pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while capturing a history thumbnail.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AbstraktError {
    /// Build an [`AbstraktError::InvalidRange`] value.
    pub fn invalid_range(path: impl Into<String>, min: f64, max: f64) -> Self {
        Self::InvalidRange {
            path: path.into(),
            min,
            max,
        }
    }

    /// Build an [`AbstraktError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AbstraktError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`AbstraktError::Snapshot`] value.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Build an [`AbstraktError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
