use std::path::PathBuf;

/// Convenience result type used across gifsquare.
pub type GifSquareResult<T> = Result<T, GifSquareError>;

/// Top-level error taxonomy used by the conversion pipeline.
#[derive(thiserror::Error, Debug)]
pub enum GifSquareError {
    /// Invalid options or frame data that violates a model invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed source animation.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failure while serializing the output animation.
    #[error("encode error: {0}")]
    Encode(String),

    /// Filesystem error tied to a specific path.
    #[error("io error at '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifSquareError {
    /// Build a [`GifSquareError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifSquareError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GifSquareError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GifSquareError::Io`] value for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<gif::DecodingError> for GifSquareError {
    fn from(err: gif::DecodingError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<png::EncodingError> for GifSquareError {
    fn from(err: png::EncodingError) -> Self {
        Self::Encode(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
