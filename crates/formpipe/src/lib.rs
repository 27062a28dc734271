//! Streaming parser for `application/x-www-form-urlencoded` bodies.
//!
//! Request bodies arrive from the network as a sequence of non-contiguous
//! byte chunks. This crate decodes them incrementally: delimiters are found
//! across chunk boundaries, keys and values are percent/plus-decoded once
//! a whole token is available, and configurable count/length limits are
//! enforced as pairs accumulate — the body is never buffered contiguously.
//!
//! # Features
//!
//! - Chunk-boundary-transparent scanning, including escapes split across
//!   chunks (`%C3` | `%A1`)
//! - Multi-value keys with arrival order preserved
//! - Value count, key length, and value length limits with exact-limit
//!   error reporting
//! - UTF-8, ASCII, UTF-16LE, and UTF-32LE bodies
//! - Async sources via [`ChunkSource`], with a tokio [`IoSource`] adapter
//!
//! # Example
//!
//! ```
//! use formpipe::{BytesSource, FormReader};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! // Chunk boundaries are arbitrary; this one splits a token in half.
//! let source = BytesSource::from_chunks(vec![
//!     b"name=ali".to_vec(),
//!     b"ce&role=admin".to_vec(),
//! ]);
//! let form = FormReader::new(source).read_form().await?;
//!
//! assert_eq!(form.get("name"), Some("alice"));
//! assert_eq!(form.get("role"), Some("admin"));
//! # Ok::<(), formpipe::FormError>(())
//! # }).unwrap();
//! ```

#![deny(unsafe_code)]

mod reader;
mod scanner;
mod segments;
mod source;

pub use reader::FormReader;
pub use scanner::FormScanner;
pub use segments::SegmentQueue;
pub use source::{BytesSource, ChunkSource, DEFAULT_CHUNK_SIZE, IoSource};

pub use formpipe_core::{
    DEFAULT_KEY_LENGTH_LIMIT, DEFAULT_VALUE_COUNT_LIMIT, DEFAULT_VALUE_LENGTH_LIMIT,
    FormCollection, FormError, FormOptions, KeyValueAccumulator, TextEncoding, form_decode,
};
