//! The fixed single-byte text encoding boundary (ISO-8859-1).
//!
//! File contents are processed as raw bytes, one byte per character, with no
//! auto-detection of the source encoding. Strings cross this boundary in two
//! places: find/replace text supplied by the caller is encoded once when the
//! pattern set is built, and line content is decoded on demand for the report
//! log. Because every ISO-8859-1 byte maps to exactly one Unicode code point,
//! both directions are cheap and positions are preserved.

/// Decodes ISO-8859-1 bytes into an owned `String`.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encodes a string as ISO-8859-1.
///
/// Characters outside the single-byte range cannot be represented and are
/// replaced with `?`.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
        .collect()
}

/// Lowercases one ISO-8859-1 character.
///
/// Covers the ASCII letters and the accented range `0xC0..=0xDE`, excluding
/// `0xD7` (the multiplication sign, which is not a letter).
pub fn to_lowercase(b: u8) -> u8 {
    match b {
        b'A'..=b'Z' => b + 32,
        0xC0..=0xD6 | 0xD8..=0xDE => b + 32,
        _ => b,
    }
}

/// Compares two byte slices for equality, ignoring letter case.
pub fn eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(&x, &y)| to_lowercase(x) == to_lowercase(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let text = "caf\u{e9} au lait";
        let bytes = encode(text);
        assert_eq!(bytes[3], 0xE9);
        assert_eq!(decode(&bytes), text);
    }

    #[test]
    fn test_unencodable_becomes_question_mark() {
        assert_eq!(encode("a\u{20ac}b"), b"a?b");
    }

    #[test]
    fn test_case_folding() {
        assert!(eq_ignore_case(b"CaT", b"cAt"));
        assert!(!eq_ignore_case(b"cat", b"car"));
        assert!(!eq_ignore_case(b"cat", b"cats"));
        // 0xC9 is 'E' acute, 0xE9 its lowercase form
        assert!(eq_ignore_case(&[0xC9], &[0xE9]));
        // the multiplication sign folds to itself
        assert_eq!(to_lowercase(0xD7), 0xD7);
    }
}
