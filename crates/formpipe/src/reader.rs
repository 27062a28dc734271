//! The async form read driver.

use log::{debug, trace};

use formpipe_core::{FormCollection, FormError, FormOptions, KeyValueAccumulator};

use crate::scanner::FormScanner;
use crate::segments::SegmentQueue;
use crate::source::ChunkSource;

/// Reads a complete `application/x-www-form-urlencoded` body from a
/// chunked source.
///
/// The reader drives one read operation: it buffers chunks as they arrive,
/// scans out every complete pair, releases consumed bytes, and suspends
/// only when it needs more data — never in the middle of a token. Partial
/// tokens stay buffered across suspension points.
///
/// [`read_form`](Self::read_form) consumes the reader, so cancelling the
/// read (dropping the future) discards accumulator and buffer state
/// outright; a cancelled read can never surface partial results.
///
/// # Example
///
/// ```
/// use formpipe::{BytesSource, FormReader};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let reader = FormReader::new(BytesSource::new("a=1&b=2&a=3"));
/// let form = reader.read_form().await?;
///
/// assert_eq!(form.get("a"), Some("1,3"));
/// assert_eq!(form.get("b"), Some("2"));
/// # Ok::<(), formpipe::FormError>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct FormReader<S> {
    source: S,
    options: FormOptions,
}

impl<S: ChunkSource> FormReader<S> {
    /// Create a reader with default options.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_options(source, FormOptions::default())
    }

    /// Create a reader with explicit options.
    #[must_use]
    pub fn with_options(source: S, options: FormOptions) -> Self {
        Self { source, options }
    }

    /// Returns the options this reader applies.
    #[must_use]
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Read the whole body and return the final form collection.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ValueCountLimit`] or
    /// [`FormError::KeyOrValueLengthLimit`] when the body violates a
    /// configured quota, and [`FormError::Io`] when the source fails.
    /// Either way the read operation is over; none of the pairs decoded so
    /// far are returned.
    pub async fn read_form(mut self) -> Result<FormCollection, FormError> {
        let mut scanner = FormScanner::new(&self.options);
        let mut accumulator = KeyValueAccumulator::new(&self.options);
        let mut buffer = SegmentQueue::new();
        let mut body_bytes = 0usize;

        loop {
            let chunk = self.source.next_chunk().await?;
            let is_final = chunk.is_none();
            if let Some(chunk) = chunk {
                body_bytes += chunk.len();
                trace!(
                    "buffered {} body bytes ({} pending)",
                    chunk.len(),
                    buffer.len() + chunk.len()
                );
                buffer.push(chunk);
            }

            let consumed = {
                let slices = buffer.slices();
                scanner.parse_values(&slices, &mut accumulator, is_final)?
            };
            buffer.consume(consumed);

            if is_final {
                break;
            }
        }

        debug!(
            "form read complete: {} keys, {} values, {} body bytes",
            accumulator.key_count(),
            accumulator.value_count(),
            body_bytes
        );
        Ok(accumulator.results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BytesSource;

    #[tokio::test]
    async fn reads_single_chunk_body() {
        let form = FormReader::new(BytesSource::new("foo=bar&baz=boo"))
            .read_form()
            .await
            .unwrap();
        assert_eq!(form.get("foo"), Some("bar"));
        assert_eq!(form.get("baz"), Some("boo"));
    }

    #[tokio::test]
    async fn empty_body_yields_empty_form() {
        let form = FormReader::new(BytesSource::default())
            .read_form()
            .await
            .unwrap();
        assert!(form.is_empty());
    }

    #[tokio::test]
    async fn source_error_propagates() {
        struct FailingSource;
        impl ChunkSource for FailingSource {
            async fn next_chunk(&mut self) -> std::io::Result<Option<Vec<u8>>> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "peer gone",
                ))
            }
        }

        let err = FormReader::new(FailingSource).read_form().await.unwrap_err();
        assert!(matches!(err, FormError::Io(_)));
    }
}
