//! Repeating-key XOR obfuscation with hex text encoding.
//!
//! This keeps casual listeners on the same frequency from reading message
//! text. It is not authenticated and offers no protection against anyone who
//! knows or guesses the passphrase.

use std::fmt;

use super::{Error, Result};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Pre-shared passphrase used to obfuscate data payloads.
#[derive(Clone, PartialEq, Eq)]
pub struct Cipher {
    key: Box<[u8]>,
}

impl Cipher {
    /// Build a cipher from a non-empty passphrase.
    pub fn new(passphrase: impl AsRef<[u8]>) -> Result<Self> {
        let key = passphrase.as_ref();
        if key.is_empty() {
            return Err(Error::EmptyPassphrase);
        }
        Ok(Self { key: key.into() })
    }

    /// XOR `plaintext` against the key and render each byte as two lowercase
    /// hex digits.
    #[must_use]
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        let mut out = String::with_capacity(plaintext.len() * 2);
        for (i, byte) in plaintext.iter().enumerate() {
            let masked = byte ^ self.key_byte(i);
            out.push(char::from(HEX_DIGITS[usize::from(masked >> 4)]));
            out.push(char::from(HEX_DIGITS[usize::from(masked & 0x0f)]));
        }
        out
    }

    /// Reverse [`Cipher::encrypt`].
    ///
    /// Returns an empty buffer for empty input, odd-length input, or any
    /// character that is not a hex digit.
    #[must_use]
    pub fn decrypt(&self, hex: &str) -> Vec<u8> {
        let digits = hex.as_bytes();
        if digits.is_empty() || digits.len() % 2 != 0 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(digits.len() / 2);
        for (i, pair) in digits.chunks_exact(2).enumerate() {
            let (Some(high), Some(low)) = (hex_value(pair[0]), hex_value(pair[1])) else {
                return Vec::new();
            };
            out.push(((high << 4) | low) ^ self.key_byte(i));
        }
        out
    }

    fn key_byte(&self, offset: usize) -> u8 {
        self.key[offset % self.key.len()]
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("key_len", &self.key.len())
            .finish_non_exhaustive()
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
