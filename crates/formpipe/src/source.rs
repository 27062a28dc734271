//! Chunked byte sources feeding a form read.

use std::collections::VecDeque;
use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Default chunk size for sources that read from a stream (4KB).
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// An ordered, asynchronous producer of body chunks.
///
/// `Ok(Some(chunk))` delivers the next run of body bytes; chunk boundaries
/// are arbitrary and carry no meaning. `Ok(None)` is the final-block
/// signal: no further bytes will ever arrive. Errors from the underlying
/// transport propagate unchanged and abort the read.
pub trait ChunkSource {
    /// Pull the next chunk, waiting if none is available yet.
    fn next_chunk(&mut self) -> impl Future<Output = io::Result<Option<Vec<u8>>>>;
}

/// An in-memory body, delivered at caller-chosen chunk boundaries.
///
/// Useful for tests and for bodies that were already buffered elsewhere.
#[derive(Debug, Default)]
pub struct BytesSource {
    chunks: VecDeque<Vec<u8>>,
}

impl BytesSource {
    /// A body delivered as one chunk.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            chunks: VecDeque::from([body.into()]),
        }
    }

    /// A body delivered as the given chunks, in order.
    #[must_use]
    pub fn from_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }

    /// A body split into chunks of at most `chunk_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    #[must_use]
    pub fn chunked(body: &[u8], chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            chunks: body.chunks(chunk_size).map(<[u8]>::to_vec).collect(),
        }
    }
}

impl ChunkSource for BytesSource {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.chunks.pop_front())
    }
}

/// Adapter from any async byte reader to a [`ChunkSource`].
#[derive(Debug)]
pub struct IoSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: AsyncRead + Unpin> IoSource<R> {
    /// Wrap a reader with the default chunk size.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Wrap a reader, pulling at most `chunk_size` bytes per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    #[must_use]
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self { reader, chunk_size }
    }
}

impl<R: AsyncRead + Unpin> ChunkSource for IoSource<R> {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut chunk = vec![0u8; self.chunk_size];
        let n = self.reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        chunk.truncate(n);
        Ok(Some(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(mut source: impl ChunkSource) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = source.next_chunk().await.expect("source must not fail") {
            out.push(chunk);
        }
        out
    }

    #[tokio::test]
    async fn bytes_source_single_chunk() {
        let chunks = drain(BytesSource::new("foo=bar")).await;
        assert_eq!(chunks, vec![b"foo=bar".to_vec()]);
    }

    #[tokio::test]
    async fn bytes_source_preserves_chunk_boundaries() {
        let source = BytesSource::from_chunks(vec![b"foo=ba".to_vec(), b"r".to_vec()]);
        let chunks = drain(source).await;
        assert_eq!(chunks, vec![b"foo=ba".to_vec(), b"r".to_vec()]);
    }

    #[tokio::test]
    async fn bytes_source_chunked_split() {
        let chunks = drain(BytesSource::chunked(b"abcdefg", 3)).await;
        assert_eq!(chunks, vec![b"abc".to_vec(), b"def".to_vec(), b"g".to_vec()]);
    }

    #[tokio::test]
    async fn io_source_reads_until_eof() {
        let source = IoSource::with_chunk_size(&b"foo=bar&baz=boo"[..], 4);
        let chunks = drain(source).await;
        assert_eq!(chunks.concat(), b"foo=bar&baz=boo");
        assert!(chunks.iter().all(|c| c.len() <= 4));
    }
}
