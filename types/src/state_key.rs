//! Hook state keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hook state key.
///
/// Hooks address state with keys of up to 32 bytes. Shorter keys are
/// right-aligned: `"MC"` is stored as thirty zero bytes followed by `M`, `C`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateKey(#[serde(with = "crate::hex_serde")] [u8; 32]);

impl StateKey {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Right-align `tail` in a 32-byte key. Inputs longer than 32 bytes keep
    /// their trailing 32 bytes.
    pub fn right_aligned(tail: &[u8]) -> Self {
        let mut key = [0u8; 32];
        let tail = &tail[tail.len().saturating_sub(Self::LEN)..];
        key[Self::LEN - tail.len()..].copy_from_slice(tail);
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({})", self.to_hex())
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keys_are_right_aligned() {
        let key = StateKey::right_aligned(b"MC");
        assert_eq!(&key.as_bytes()[..30], &[0u8; 30]);
        assert_eq!(&key.as_bytes()[30..], b"MC");
    }

    #[test]
    fn long_keys_keep_their_tail() {
        let mut long = vec![0xFFu8; 4];
        long.extend_from_slice(&[0x11u8; 32]);
        assert_eq!(StateKey::right_aligned(&long).as_bytes(), &[0x11u8; 32]);
    }
}
