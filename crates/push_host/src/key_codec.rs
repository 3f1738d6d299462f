//! URL-safe base64 codec for application server (VAPID) public keys.
//!
//! Keys arrive from the server in the URL-safe alphabet with padding stripped. The push API wants
//! the raw bytes, so decoding restores padding, translates the alphabet back to standard base64,
//! and decodes the payload.

use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurposeConfig, DecodePaddingMode, GeneralPurpose},
    DecodeError, Engine,
};
use thiserror::Error;

/// Standard-alphabet engine that tolerates non-zero trailing bits, the way `atob` does.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Length of an uncompressed SEC1 P-256 point.
const UNCOMPRESSED_P256_LEN: usize = 65;

/// Errors raised while decoding key material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyDecodeError {
    /// The key string was empty.
    #[error("application server key is empty")]
    Empty,
    /// A character outside the base64 alphabet was found.
    #[error("invalid character {character:?} at offset {offset}")]
    InvalidCharacter {
        /// Byte offset within the padded, translated payload.
        offset: usize,
        /// Offending character.
        character: char,
    },
    /// The payload length cannot be produced by any base64 encoding.
    #[error("invalid key length {0}")]
    InvalidLength(usize),
    /// Padding was misplaced inside the payload.
    #[error("invalid padding")]
    InvalidPadding,
}

impl From<DecodeError> for KeyDecodeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidByte(offset, byte) | DecodeError::InvalidLastSymbol(offset, byte) => {
                Self::InvalidCharacter {
                    offset,
                    character: char::from(byte),
                }
            }
            DecodeError::InvalidLength(len) => Self::InvalidLength(len),
            DecodeError::InvalidPadding => Self::InvalidPadding,
        }
    }
}

/// Decoded application server key bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationServerKey(Vec<u8>);

impl ApplicationServerKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw key bytes handed to the push manager.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of decoded bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key decoded to zero bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the bytes have the shape of an uncompressed P-256 point (`0x04 || x || y`).
    pub fn is_uncompressed_p256(&self) -> bool {
        self.0.len() == UNCOMPRESSED_P256_LEN && self.0.first() == Some(&0x04)
    }
}

/// Decodes a URL-safe, possibly unpadded base64 key into raw bytes.
///
/// ASCII whitespace anywhere in the input is ignored, as `atob` ignores it.
///
/// # Errors
///
/// Returns [`KeyDecodeError`] for empty input, characters outside the alphabet, or a length no
/// base64 encoding can produce. Input is never truncated to make it decode.
pub fn decode_key(encoded: &str) -> Result<ApplicationServerKey, KeyDecodeError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(KeyDecodeError::Empty);
    }
    let padding = (4 - compact.len() % 4) % 4;
    let standard: String = compact
        .chars()
        .chain(std::iter::repeat('=').take(padding))
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = LENIENT_STANDARD.decode(standard.as_bytes())?;
    Ok(ApplicationServerKey(bytes))
}

/// Encodes raw bytes into the URL-safe alphabet with canonical padding.
pub fn encode_key(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAPID_KEY: &str =
        "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";

    fn canonical_padded(s: &str) -> String {
        let padding = (4 - s.len() % 4) % 4;
        format!("{s}{}", "=".repeat(padding))
    }

    #[test]
    fn vapid_key_decodes_to_uncompressed_point() {
        let key = decode_key(VAPID_KEY).expect("decode");
        assert_eq!(key.len(), 65);
        assert!(key.is_uncompressed_p256());
        assert_eq!(encode_key(key.as_bytes()), canonical_padded(VAPID_KEY));
    }

    #[test]
    fn decoded_length_matches_padded_standard_form() {
        for input in ["", "QQ", "QUI", "QUJD", "QUJDRA", "-_-_", "_w", "AAECAwQFBgc"] {
            if input.is_empty() {
                assert_eq!(decode_key(input), Err(KeyDecodeError::Empty));
                continue;
            }
            let padded = canonical_padded(input);
            let expected = padded.trim_end_matches('=').len() * 3 / 4;
            let key = decode_key(input).expect("decode");
            assert_eq!(key.len(), expected, "input {input}");
            assert_eq!(encode_key(key.as_bytes()), padded, "input {input}");
        }
    }

    #[test]
    fn url_safe_characters_translate_to_standard_alphabet() {
        assert_eq!(decode_key("-_-_").expect("decode").as_bytes(), &[0xfb, 0xff, 0xbf]);
        assert_eq!(decode_key("+/+/").expect("decode").as_bytes(), &[0xfb, 0xff, 0xbf]);
    }

    #[test]
    fn decoding_is_deterministic() {
        assert_eq!(decode_key(VAPID_KEY), decode_key(VAPID_KEY));
    }

    #[test]
    fn malformed_input_fails_instead_of_truncating() {
        assert!(matches!(
            decode_key("AB$D"),
            Err(KeyDecodeError::InvalidCharacter { character: '$', .. })
        ));
        assert!(decode_key("ABCDE").is_err());
        assert!(decode_key("AB=D").is_err());
    }

    #[test]
    fn surrounding_and_embedded_whitespace_is_ignored() {
        let expected = decode_key(VAPID_KEY).expect("decode");
        assert_eq!(decode_key(&format!("{VAPID_KEY}\n")), Ok(expected.clone()));
        assert_eq!(decode_key(&format!("  {VAPID_KEY}\t")), Ok(expected.clone()));
        let (head, tail) = VAPID_KEY.split_at(40);
        assert_eq!(decode_key(&format!("{head}\r\n{tail}")), Ok(expected));
        assert_eq!(decode_key(" \n "), Err(KeyDecodeError::Empty));
    }

    #[test]
    fn short_keys_are_not_p256_points() {
        let key = decode_key("BAAA").expect("decode");
        assert_eq!(key.as_bytes(), &[0x04, 0x00, 0x00]);
        assert!(!key.is_uncompressed_p256());
    }
}
