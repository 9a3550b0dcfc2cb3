/// Convenience result type used across memegen.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Numeric parameters outside their documented range never produce an error; they are
/// clamped where they are consumed.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// Zero-size or undecodable images, unknown filter/gradient names, malformed documents.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`MemeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors caused by the caller's data rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<serde_json::Error> for MemeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
