//! Text encodings supported for form bodies.
//!
//! `application/x-www-form-urlencoded` bodies are almost always UTF-8, but
//! the charset may name another encoding. Delimiter scanning must then step
//! by the encoding's code unit width: in UTF-16LE an `&` is the byte pair
//! `26 00`, and a lone `0x26` inside another code unit is not a delimiter.

/// A text encoding for form body bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 (the default for form bodies).
    #[default]
    Utf8,
    /// 7-bit ASCII; bytes above `0x7F` decode to U+FFFD.
    Ascii,
    /// UTF-16, little-endian code units.
    Utf16Le,
    /// UTF-32, little-endian code units.
    Utf32Le,
}

/// An ASCII character encoded as a single code unit of some encoding.
///
/// Used for the delimiter bytes (`&`, `=`) the scanner searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeUnit {
    bytes: [u8; 4],
    len: usize,
}

impl CodeUnit {
    /// The encoded bytes of this code unit.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The width of this code unit in bytes.
    #[must_use]
    pub fn width(&self) -> usize {
        self.len
    }
}

impl TextEncoding {
    /// Width of one code unit in bytes.
    #[must_use]
    pub fn code_unit_width(self) -> usize {
        match self {
            Self::Utf8 | Self::Ascii => 1,
            Self::Utf16Le => 2,
            Self::Utf32Le => 4,
        }
    }

    /// Encode an ASCII byte as a single code unit of this encoding.
    ///
    /// Only meaningful for ASCII input; the scanner uses it for `&` and `=`.
    #[must_use]
    pub fn encode_ascii(self, ch: u8) -> CodeUnit {
        debug_assert!(ch.is_ascii());
        let mut bytes = [0u8; 4];
        bytes[0] = ch;
        CodeUnit {
            bytes,
            len: self.code_unit_width(),
        }
    }

    /// Decode raw bytes to text, replacing invalid input with U+FFFD.
    ///
    /// Trailing bytes that do not fill a whole code unit also decode to
    /// U+FFFD rather than being dropped silently.
    #[must_use]
    pub fn decode_lossy(self, raw: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(raw).into_owned(),
            Self::Ascii => raw
                .iter()
                .map(|&b| {
                    if b.is_ascii() {
                        b as char
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
            Self::Utf16Le => {
                let mut units = Vec::with_capacity(raw.len() / 2 + 1);
                let mut chunks = raw.chunks_exact(2);
                for pair in &mut chunks {
                    units.push(u16::from_le_bytes([pair[0], pair[1]]));
                }
                let mut text = String::from_utf16_lossy(&units);
                if !chunks.remainder().is_empty() {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            }
            Self::Utf32Le => {
                let mut text = String::with_capacity(raw.len() / 4 + 1);
                let mut chunks = raw.chunks_exact(4);
                for quad in &mut chunks {
                    let scalar = u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]);
                    text.push(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                if !chunks.remainder().is_empty() {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            }
        }
    }

    /// Encode text back to bytes in this encoding.
    ///
    /// Mostly useful for building test inputs in non-UTF-8 encodings.
    #[must_use]
    pub fn encode_str(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 | Self::Ascii => text.as_bytes().to_vec(),
            Self::Utf16Le => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
            Self::Utf32Le => {
                let mut out = Vec::with_capacity(text.len() * 4);
                for ch in text.chars() {
                    out.extend_from_slice(&(ch as u32).to_le_bytes());
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_unit_widths() {
        assert_eq!(TextEncoding::Utf8.code_unit_width(), 1);
        assert_eq!(TextEncoding::Ascii.code_unit_width(), 1);
        assert_eq!(TextEncoding::Utf16Le.code_unit_width(), 2);
        assert_eq!(TextEncoding::Utf32Le.code_unit_width(), 4);
    }

    #[test]
    fn ampersand_patterns() {
        assert_eq!(TextEncoding::Utf8.encode_ascii(b'&').as_bytes(), b"&");
        assert_eq!(
            TextEncoding::Utf16Le.encode_ascii(b'&').as_bytes(),
            &[0x26, 0x00]
        );
        assert_eq!(
            TextEncoding::Utf32Le.encode_ascii(b'&').as_bytes(),
            &[0x26, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn utf8_round_trip() {
        let bytes = TextEncoding::Utf8.encode_str("café");
        assert_eq!(TextEncoding::Utf8.decode_lossy(&bytes), "café");
    }

    #[test]
    fn utf16le_round_trip() {
        let bytes = TextEncoding::Utf16Le.encode_str("foo=bar");
        assert_eq!(bytes.len(), 14);
        assert_eq!(TextEncoding::Utf16Le.decode_lossy(&bytes), "foo=bar");
    }

    #[test]
    fn utf32le_round_trip() {
        let bytes = TextEncoding::Utf32Le.encode_str("a&b");
        assert_eq!(bytes.len(), 12);
        assert_eq!(TextEncoding::Utf32Le.decode_lossy(&bytes), "a&b");
    }

    #[test]
    fn ascii_high_bytes_are_replaced() {
        assert_eq!(
            TextEncoding::Ascii.decode_lossy(&[b'a', 0xFF, b'b']),
            "a\u{FFFD}b"
        );
    }

    #[test]
    fn truncated_wide_unit_is_replaced() {
        let mut bytes = TextEncoding::Utf16Le.encode_str("ok");
        bytes.push(0x41); // half a code unit
        assert_eq!(TextEncoding::Utf16Le.decode_lossy(&bytes), "ok\u{FFFD}");
    }
}
