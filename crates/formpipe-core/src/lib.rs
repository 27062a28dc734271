//! Core types for streaming `application/x-www-form-urlencoded` parsing.
//!
//! This crate provides the fundamental building blocks:
//! - [`KeyValueAccumulator`] collecting decoded pairs under quota limits
//! - [`FormCollection`], the immutable key → joined-values result
//! - [`form_decode`], the percent/plus token decoder
//! - [`FormOptions`] and [`TextEncoding`] configuration
//! - [`FormError`], the error taxonomy shared with the streaming layer
//!
//! # Design Principles
//!
//! - Decoding is total: malformed escapes degrade to literal text, never
//!   errors
//! - Limits are enforced as data arrives, before it is stored
//! - All state is owned per read operation; nothing is shared or global
//!
//! The streaming scanner and async reader live in the `formpipe` crate.

#![forbid(unsafe_code)]

mod accumulator;
mod collection;
mod decode;
mod encoding;
mod error;
mod options;

pub use accumulator::KeyValueAccumulator;
pub use collection::FormCollection;
pub use decode::form_decode;
pub use encoding::{CodeUnit, TextEncoding};
pub use error::FormError;
pub use options::{
    DEFAULT_KEY_LENGTH_LIMIT, DEFAULT_VALUE_COUNT_LIMIT, DEFAULT_VALUE_LENGTH_LIMIT, FormOptions,
};
