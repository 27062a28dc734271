//! Percent/plus decoding of form tokens.
//!
//! A token is one raw key or value, already reassembled from however many
//! body chunks it spanned. Decoding rules for `application/x-www-form-urlencoded`:
//!
//! - `+` decodes to a space
//! - `%XX` (two hex digits) decodes to the byte `0xXX`; consecutive escapes
//!   form one byte sequence interpreted as UTF-8, so multi-byte characters
//!   split across escapes (`%C3%A1`) reassemble correctly
//! - a `%` not followed by two hex digits passes through literally, so the
//!   legacy `%uXXXX` notation stays verbatim
//!
//! Malformed input never fails; it degrades to literal pass-through.

use crate::encoding::TextEncoding;

/// Decode one raw token into text under the given encoding.
#[must_use]
pub fn form_decode(raw: &[u8], encoding: TextEncoding) -> String {
    match encoding.code_unit_width() {
        // Single-byte encodings: unescape in byte space, then decode.
        1 => encoding.decode_lossy(&unescape_bytes(raw)),
        // Wide encodings: escape characters occupy whole code units, so
        // decode to text first and unescape in char space.
        _ => unescape_text(&encoding.decode_lossy(raw)),
    }
}

/// Percent/plus-unescape a raw byte token.
fn unescape_bytes(raw: &[u8]) -> Vec<u8> {
    // Fast path: nothing to unescape.
    if !raw.contains(&b'%') && !raw.contains(&b'+') {
        return raw.to_vec();
    }

    let mut result = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        match raw[i] {
            b'%' if i + 2 < raw.len() => {
                if let (Some(hi), Some(lo)) = (hex_digit(raw[i + 1]), hex_digit(raw[i + 2])) {
                    result.push(hi << 4 | lo);
                    i += 3;
                } else {
                    // Invalid hex, keep the `%` as-is.
                    result.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                result.push(b' ');
                i += 1;
            }
            b => {
                result.push(b);
                i += 1;
            }
        }
    }

    result
}

/// Percent/plus-unescape a token already decoded to text.
///
/// Runs of `%XX` escapes collect into a byte buffer and decode as UTF-8,
/// matching the byte-space path.
fn unescape_text(token: &str) -> String {
    if !token.contains('%') && !token.contains('+') {
        return token.to_owned();
    }

    let chars: Vec<char> = token.chars().collect();
    let mut result = String::with_capacity(token.len());
    let mut escaped = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some(byte) = escape_at(&chars, i) {
            // Collect the maximal run of escapes before decoding.
            escaped.clear();
            escaped.push(byte);
            i += 3;
            while let Some(byte) = escape_at(&chars, i) {
                escaped.push(byte);
                i += 3;
            }
            result.push_str(&String::from_utf8_lossy(&escaped));
        } else if chars[i] == '+' {
            result.push(' ');
            i += 1;
        } else {
            result.push(chars[i]);
            i += 1;
        }
    }

    result
}

/// Returns the escaped byte if `chars[i..]` starts with a valid `%XX`.
fn escape_at(chars: &[char], i: usize) -> Option<u8> {
    if chars.get(i) != Some(&'%') {
        return None;
    }
    let hi = hex_char(*chars.get(i + 1)?)?;
    let lo = hex_char(*chars.get(i + 2)?)?;
    Some(hi << 4 | lo)
}

/// Convert a hex digit to its numeric value.
fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn hex_char(c: char) -> Option<u8> {
    u8::try_from(c).ok().and_then(hex_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(raw: &str) -> String {
        form_decode(raw.as_bytes(), TextEncoding::Utf8)
    }

    #[test]
    fn plain_token_is_unchanged() {
        assert_eq!(utf8("hello"), "hello");
    }

    #[test]
    fn plus_decodes_to_space() {
        assert_eq!(utf8("1+1"), "1 1");
        assert_eq!(utf8("++"), "  ");
    }

    #[test]
    fn ascii_escape() {
        assert_eq!(utf8("%41"), "A");
        assert_eq!(utf8("hello%20world"), "hello world");
    }

    #[test]
    fn multi_byte_utf8_escape_run() {
        assert_eq!(utf8("%C3%A1"), "\u{e1}");
        assert_eq!(utf8("caf%C3%A9"), "café");
    }

    #[test]
    fn legacy_utf16_escape_stays_literal() {
        assert_eq!(utf8("%u20AC"), "%u20AC");
    }

    #[test]
    fn invalid_or_incomplete_escapes_stay_literal() {
        assert_eq!(utf8("%ZZ"), "%ZZ");
        assert_eq!(utf8("%2"), "%2");
        assert_eq!(utf8("%"), "%");
        assert_eq!(utf8("100%"), "100%");
    }

    #[test]
    fn escaped_plus_is_literal_plus() {
        assert_eq!(utf8("++%2B"), "  +");
    }

    #[test]
    fn punctuation_escape_table() {
        assert_eq!(
            utf8("%22%25%2D%2E%3C%3E%5C%5E%5F%60%7B%7C%7D%7E"),
            "\"%-.<>\\^_`{|}~"
        );
    }

    #[test]
    fn wide_encodings_agree_with_utf8_path() {
        for encoding in [TextEncoding::Utf16Le, TextEncoding::Utf32Le] {
            let raw = encoding.encode_str("a+b%41%2Bc%u20AC");
            assert_eq!(form_decode(&raw, encoding), "a bA+c%u20AC");
        }
    }

    #[test]
    fn wide_encoding_escape_run_decodes_as_utf8() {
        let raw = TextEncoding::Utf16Le.encode_str("%C3%A1");
        assert_eq!(form_decode(&raw, TextEncoding::Utf16Le), "\u{e1}");
    }

    #[test]
    fn ascii_encoding_decodes_ascii_escapes() {
        assert_eq!(form_decode(b"1+1%21", TextEncoding::Ascii), "1 1!");
    }
}
