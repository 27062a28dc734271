//! Error types for form body reading.

/// Errors that can occur while reading a form body.
///
/// Limit violations are unrecoverable for the current read operation:
/// the read stops immediately and no partial results are returned.
#[derive(Debug)]
pub enum FormError {
    /// The total number of form values exceeded the configured limit.
    ValueCountLimit {
        /// The configured maximum number of values.
        limit: usize,
    },
    /// A decoded key or value exceeded the configured character length limit.
    KeyOrValueLengthLimit {
        /// The configured maximum length that was exceeded.
        limit: usize,
    },
    /// The underlying byte source failed.
    Io(std::io::Error),
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValueCountLimit { limit } => {
                write!(f, "form value count limit {limit} exceeded")
            }
            Self::KeyOrValueLengthLimit { limit } => {
                write!(f, "form key or value length limit {limit} exceeded")
            }
            Self::Io(e) => write!(f, "form body read failed: {e}"),
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FormError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
