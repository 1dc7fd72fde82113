//! Text decoding for recipe files.
//!
//! Recipes are expected to be UTF-8, but older overlays carry `PKGBUILD`s
//! written in ISO-8859-15 (Latin-9). Decoding is attempted with each
//! [`Encoding`] in [`Encoding::ATTEMPTS`] order and the first success wins.

use derive_more::Display;

use crate::error::{ErrorKind, Result};

/// A text encoding a recipe may be written in.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[display("UTF-8")]
    Utf8,
    #[display("ISO-8859-15")]
    Latin9,
}
impl Encoding {
    /// Encodings tried by [`decode_any`](Self::decode_any), in order.
    pub const ATTEMPTS: [Encoding; 2] = [Encoding::Utf8, Encoding::Latin9];

    /// Decodes `bytes` in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(text.to_string()),
                Err(_) => exn::bail!(ErrorKind::Decode(*self)),
            },
            Self::Latin9 => Ok(bytes.iter().map(|&b| latin9_char(b)).collect()),
        }
    }

    /// Decodes `bytes` with the first encoding in [`ATTEMPTS`](Self::ATTEMPTS)
    /// that accepts them.
    pub fn decode_any(bytes: &[u8]) -> Result<(Encoding, String)> {
        for encoding in Self::ATTEMPTS {
            match encoding.decode(bytes) {
                Ok(text) => return Ok((encoding, text)),
                Err(err) => tracing::warn!(%encoding, error = ?err, "recipe decoding failed; trying next encoding"),
            }
        }
        exn::bail!(ErrorKind::Undecodable);
    }
}

/// Latin-9 is Latin-1 with eight code points swapped out (most notably the
/// Euro sign at `0xA4`).
fn latin9_char(byte: u8) -> char {
    match byte {
        0xA4 => '\u{20AC}',
        0xA6 => '\u{0160}',
        0xA8 => '\u{0161}',
        0xB4 => '\u{017D}',
        0xB8 => '\u{017E}',
        0xBC => '\u{0152}',
        0xBD => '\u{0153}',
        0xBE => '\u{0178}',
        other => char::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_utf8_preferred() {
        let (encoding, text) = Encoding::decode_any("pkgdesc=\"Grüße\"".as_bytes()).unwrap();
        assert_eq!(encoding, Encoding::Utf8);
        assert_eq!(text, "pkgdesc=\"Grüße\"");
    }

    #[test]
    fn test_latin9_fallback() {
        // "Gr\xfc\xdfe \xa4" is "Grüße €" in Latin-9 and invalid UTF-8.
        let (encoding, text) = Encoding::decode_any(b"Gr\xfc\xdfe \xa4").unwrap();
        assert_eq!(encoding, Encoding::Latin9);
        assert_eq!(text, "Grüße €");
    }

    #[test]
    fn test_utf8_rejects_invalid() {
        let err = Encoding::Utf8.decode(b"\xff\xfe").unwrap_err();
        assert_eq!(*err, ErrorKind::Decode(Encoding::Utf8));
    }

    #[rstest]
    #[case(b'a', 'a')]
    #[case(0xE9, 'é')]
    #[case(0xA4, '€')]
    #[case(0xA6, 'Š')]
    #[case(0xBD, 'œ')]
    #[case(0xBE, 'Ÿ')]
    fn test_latin9_mapping(#[case] byte: u8, #[case] expected: char) {
        assert_eq!(latin9_char(byte), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(Encoding::Utf8.to_string(), "UTF-8");
        assert_eq!(Encoding::Latin9.to_string(), "ISO-8859-15");
    }
}
