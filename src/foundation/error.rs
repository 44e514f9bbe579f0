/// Convenience result type used across imagedrift.
pub type DriftResult<T> = Result<T, DriftError>;

/// Top-level error taxonomy used by the generation and encoding APIs.
#[derive(thiserror::Error, Debug)]
pub enum DriftError {
    /// Missing or out-of-range configuration, detected before any frame work begins.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failures while preparing the source image or writing preview/sequence frames.
    #[error("generation error: {0}")]
    Generation(String),

    /// The external encoder is missing, fails to start, or exits non-zero.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DriftError {
    /// Build a [`DriftError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`DriftError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`DriftError::Encoder`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    /// Re-tag a wrapped lower-level error as a generation failure, keeping its context chain.
    pub fn into_generation(self) -> Self {
        match self {
            Self::Other(e) => Self::Generation(format!("{e:#}")),
            other => other,
        }
    }

    /// Process exit code used by the CLI for this class of error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Generation(_) => 3,
            Self::Encoder(_) => 4,
            Self::Other(_) => 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
