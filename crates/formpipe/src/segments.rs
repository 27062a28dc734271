//! Buffering and addressing of non-contiguous body chunks.
//!
//! Body bytes arrive as separately-allocated chunks. The scanner addresses
//! them as one logical byte sequence: positions run from the first
//! unconsumed byte across every buffered chunk in order. [`SegmentQueue`]
//! owns the chunks and tracks consumption; the free functions below operate
//! on a borrowed `&[&[u8]]` view of that sequence.

use std::collections::VecDeque;

use memchr::memchr;

/// An ordered queue of body chunks with a consumed prefix.
///
/// Bytes are appended chunk-at-a-time and released front-to-back as the
/// scanner reports how much it consumed. The unconsumed remainder shrinks
/// monotonically within one read operation; a partial trailing token simply
/// stays queued until more data arrives.
#[derive(Debug, Default)]
pub struct SegmentQueue {
    segments: VecDeque<Vec<u8>>,
    /// Consumed prefix of the front segment.
    front_offset: usize,
    /// Total unconsumed bytes across all segments.
    len: usize,
}

impl SegmentQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Zero-length chunks are accepted and ignored.
    pub fn push(&mut self, chunk: Vec<u8>) {
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();
        self.segments.push_back(chunk);
    }

    /// Total unconsumed bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no unconsumed bytes remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the unconsumed remainder as an ordered list of slices.
    #[must_use]
    pub fn slices(&self) -> Vec<&[u8]> {
        let mut out = Vec::with_capacity(self.segments.len());
        for (i, segment) in self.segments.iter().enumerate() {
            if i == 0 {
                out.push(&segment[self.front_offset..]);
            } else {
                out.push(segment.as_slice());
            }
        }
        out
    }

    /// Release `n` consumed bytes from the front.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the unconsumed length; the scanner never
    /// reports more than it was given.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.len, "consumed past end of buffered data");
        self.len -= n;
        let mut remaining = n;
        while remaining > 0 {
            let Some(front) = self.segments.front() else {
                break;
            };
            let available = front.len() - self.front_offset;
            if remaining >= available {
                self.segments.pop_front();
                self.front_offset = 0;
                remaining -= available;
            } else {
                self.front_offset += remaining;
                remaining = 0;
            }
        }
    }
}

/// Total length of a chunk list.
#[must_use]
pub fn total_len(chunks: &[&[u8]]) -> usize {
    chunks.iter().map(|c| c.len()).sum()
}

/// Find a delimiter pattern in `[start, end)` of the logical sequence.
///
/// Matches are aligned: candidate positions step by the pattern width from
/// `start`, so a delimiter byte inside a wider code unit never matches.
/// `start` must itself be code-unit aligned, which holds because consumed
/// prefixes are always whole pairs.
#[must_use]
pub fn find_pattern(chunks: &[&[u8]], start: usize, end: usize, pattern: &[u8]) -> Option<usize> {
    if pattern.len() == 1 {
        // Single-byte code units: scan each chunk's overlap with the range.
        let byte = pattern[0];
        let mut base = 0;
        for chunk in chunks {
            let lo = start.max(base);
            let hi = end.min(base + chunk.len());
            if lo < hi {
                if let Some(i) = memchr(byte, &chunk[lo - base..hi - base]) {
                    return Some(lo + i);
                }
            }
            base += chunk.len();
            if base >= end {
                break;
            }
        }
        None
    } else {
        let mut unit = [0u8; 4];
        let mut pos = start;
        while pos + pattern.len() <= end {
            read_exact_at(chunks, pos, &mut unit[..pattern.len()]);
            if &unit[..pattern.len()] == pattern {
                return Some(pos);
            }
            pos += pattern.len();
        }
        None
    }
}

/// Borrow `[start, end)` as one slice if it lies within a single chunk.
#[must_use]
pub fn contiguous<'a>(chunks: &[&'a [u8]], start: usize, end: usize) -> Option<&'a [u8]> {
    let mut base = 0;
    for chunk in chunks {
        let next = base + chunk.len();
        if start >= base && end <= next {
            return Some(&chunk[start - base..end - base]);
        }
        if start < next {
            return None;
        }
        base = next;
    }
    // Only reachable for the empty range at the very end.
    (start == end).then_some(&[])
}

/// Copy `[start, end)` of the logical sequence into `out`.
pub fn copy_range(chunks: &[&[u8]], start: usize, end: usize, out: &mut Vec<u8>) {
    out.reserve(end - start);
    let mut base = 0;
    for chunk in chunks {
        let lo = start.max(base);
        let hi = end.min(base + chunk.len());
        if lo < hi {
            out.extend_from_slice(&chunk[lo - base..hi - base]);
        }
        base += chunk.len();
        if base >= end {
            break;
        }
    }
}

/// Read `buf.len()` bytes starting at `pos`, crossing chunk boundaries.
///
/// The caller guarantees the range is in bounds.
fn read_exact_at(chunks: &[&[u8]], pos: usize, buf: &mut [u8]) {
    let mut base = 0;
    let mut filled = 0;
    let end = pos + buf.len();
    for chunk in chunks {
        let lo = pos.max(base);
        let hi = end.min(base + chunk.len());
        if lo < hi {
            buf[filled..filled + (hi - lo)].copy_from_slice(&chunk[lo - base..hi - base]);
            filled += hi - lo;
        }
        base += chunk.len();
        if base >= end {
            break;
        }
    }
    debug_assert_eq!(filled, buf.len());
}
