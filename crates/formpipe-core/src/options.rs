//! Configuration for form body reading.

use crate::encoding::TextEncoding;

/// Default maximum number of values across all keys (1024).
pub const DEFAULT_VALUE_COUNT_LIMIT: usize = 1024;

/// Default maximum decoded key length in characters (2048).
pub const DEFAULT_KEY_LENGTH_LIMIT: usize = 2048;

/// Default maximum decoded value length in characters (4MB).
pub const DEFAULT_VALUE_LENGTH_LIMIT: usize = 4 * 1024 * 1024;

/// Configuration applied to one form read operation.
///
/// Limits bound attacker-controlled memory growth: a request body can
/// declare any number of pairs of any length, so every pair is checked
/// against these ceilings as it is decoded.
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Maximum total number of values across all keys.
    value_count_limit: usize,
    /// Maximum decoded key length in characters.
    key_length_limit: usize,
    /// Maximum decoded value length in characters.
    value_length_limit: usize,
    /// Text encoding of the form body.
    encoding: TextEncoding,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            value_count_limit: DEFAULT_VALUE_COUNT_LIMIT,
            key_length_limit: DEFAULT_KEY_LENGTH_LIMIT,
            value_length_limit: DEFAULT_VALUE_LENGTH_LIMIT,
            encoding: TextEncoding::Utf8,
        }
    }
}

impl FormOptions {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum total number of values.
    #[must_use]
    pub fn with_value_count_limit(mut self, limit: usize) -> Self {
        self.value_count_limit = limit;
        self
    }

    /// Set the maximum decoded key length in characters.
    #[must_use]
    pub fn with_key_length_limit(mut self, limit: usize) -> Self {
        self.key_length_limit = limit;
        self
    }

    /// Set the maximum decoded value length in characters.
    #[must_use]
    pub fn with_value_length_limit(mut self, limit: usize) -> Self {
        self.value_length_limit = limit;
        self
    }

    /// Set the text encoding of the form body.
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Returns the maximum total number of values.
    #[must_use]
    pub fn value_count_limit(&self) -> usize {
        self.value_count_limit
    }

    /// Returns the maximum decoded key length in characters.
    #[must_use]
    pub fn key_length_limit(&self) -> usize {
        self.key_length_limit
    }

    /// Returns the maximum decoded value length in characters.
    #[must_use]
    pub fn value_length_limit(&self) -> usize {
        self.value_length_limit
    }

    /// Returns the text encoding of the form body.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}
