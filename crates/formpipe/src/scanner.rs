//! Incremental scanner for `&`/`=`-delimited form pairs.

use formpipe_core::{FormError, FormOptions, KeyValueAccumulator, TextEncoding, form_decode};

use crate::segments;

/// Scans buffered body chunks for complete key/value pairs.
///
/// Each [`parse_values`](Self::parse_values) call processes every complete
/// `&`-delimited pair currently available, feeds the decoded pairs to the
/// accumulator, and reports how many bytes it consumed. A trailing pair
/// with no `&` yet is left unconsumed until more data arrives — unless the
/// caller marks the block final, in which case the remainder is the last
/// pair.
///
/// The scanner is created per read operation. Its scratch buffer is reused
/// across tokens within that operation only, so decoded content never
/// crosses into another request.
#[derive(Debug)]
pub struct FormScanner {
    encoding: TextEncoding,
    key_length_limit: usize,
    value_length_limit: usize,
    /// Reassembly buffer for tokens that span chunk boundaries.
    scratch: Vec<u8>,
}

impl FormScanner {
    /// Create a scanner for one read operation.
    #[must_use]
    pub fn new(options: &FormOptions) -> Self {
        Self {
            encoding: options.encoding(),
            key_length_limit: options.key_length_limit(),
            value_length_limit: options.value_length_limit(),
            scratch: Vec::new(),
        }
    }

    /// Parse all complete pairs out of `chunks`.
    ///
    /// Returns the number of bytes consumed; the caller must drop exactly
    /// that prefix before the next call. With `is_final` set, trailing
    /// bytes without a closing `&` form the last pair and everything is
    /// consumed.
    ///
    /// # Errors
    ///
    /// Propagates accumulator limit errors, and fails with the combined
    /// key/value length limit when an unterminated token grows past any
    /// length a valid pair could still have (this caps buffering for
    /// bodies that never produce a `&`).
    pub fn parse_values(
        &mut self,
        chunks: &[&[u8]],
        accumulator: &mut KeyValueAccumulator,
        is_final: bool,
    ) -> Result<usize, FormError> {
        let width = self.encoding.code_unit_width();
        let amp = self.encoding.encode_ascii(b'&');
        let eq = self.encoding.encode_ascii(b'=');
        let total = segments::total_len(chunks);
        let mut consumed = 0;

        loop {
            match segments::find_pattern(chunks, consumed, total, amp.as_bytes()) {
                Some(pos) => {
                    self.append_pair(chunks, consumed, pos, eq.as_bytes(), accumulator)?;
                    consumed = pos + width;
                }
                None => {
                    if is_final {
                        if consumed < total {
                            self.append_pair(chunks, consumed, total, eq.as_bytes(), accumulator)?;
                            consumed = total;
                        }
                    } else {
                        self.check_pending(total - consumed, width)?;
                    }
                    return Ok(consumed);
                }
            }
        }
    }

    /// Split one `&`-delimited span on its first `=` and accumulate it.
    fn append_pair(
        &mut self,
        chunks: &[&[u8]],
        start: usize,
        end: usize,
        eq_pattern: &[u8],
        accumulator: &mut KeyValueAccumulator,
    ) -> Result<(), FormError> {
        if start == end {
            // Empty segment, e.g. `a=1&&b=2` or a trailing `&`.
            return Ok(());
        }

        let (key, value) = match segments::find_pattern(chunks, start, end, eq_pattern) {
            Some(eq) => (
                self.decode_range(chunks, start, eq),
                self.decode_range(chunks, eq + eq_pattern.len(), end),
            ),
            // No `=`: the whole span is the key.
            None => (self.decode_range(chunks, start, end), String::new()),
        };

        accumulator.append(key, value)
    }

    /// Decode one raw token, reassembling it first if it spans chunks.
    fn decode_range(&mut self, chunks: &[&[u8]], start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        if let Some(slice) = segments::contiguous(chunks, start, end) {
            form_decode(slice, self.encoding)
        } else {
            self.scratch.clear();
            segments::copy_range(chunks, start, end, &mut self.scratch);
            form_decode(&self.scratch, self.encoding)
        }
    }

    /// Bound the size of a retained partial token.
    ///
    /// An encoded pair can never be longer than key limit + value limit
    /// plus the `=`; anything larger must already violate a length limit,
    /// so fail now instead of buffering the rest of the body.
    fn check_pending(&self, pending: usize, width: usize) -> Result<(), FormError> {
        let limit = self.key_length_limit.saturating_add(self.value_length_limit);
        let cap = limit.saturating_add(2).saturating_mul(width);
        if pending > cap {
            return Err(FormError::KeyOrValueLengthLimit { limit });
        }
        Ok(())
    }
}
