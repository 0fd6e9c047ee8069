//! 256-bit digests: transaction hashes, hook hashes and hook namespaces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

fn array32(bytes: &[u8]) -> Result<[u8; 32], TypesError> {
    bytes.try_into().map_err(|_| TypesError::InvalidLength {
        expected: 32,
        actual: bytes.len(),
    })
}

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(#[serde(with = "crate::hex_serde")] [u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", hex::encode_upper(&self.0[..4]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// The hash of a hook definition (SHA-512Half of its code).
///
/// In a hook vote the zero hash means "remove the hook at this slot".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HookHash(#[serde(with = "crate::hex_serde")] [u8; 32]);

impl HookHash {
    pub const LEN: usize = 32;
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        Ok(Self(array32(bytes)?))
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        Self::from_slice(&hex::decode(s.trim())?)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for HookHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HookHash({})", hex::encode_upper(&self.0[..4]))
    }
}

impl fmt::Display for HookHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// A hook state namespace. Hooks installed with the same namespace on the same
/// account share their state.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace(#[serde(with = "crate::hex_serde")] [u8; 32]);

impl Namespace {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        Ok(Self(array32(&hex::decode(s.trim())?)?))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", hex::encode_upper(&self.0[..4]))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_hash_parses_upper_and_lower() {
        let upper = "AB".repeat(32);
        let a = HookHash::from_hex(&upper).unwrap();
        let b = HookHash::from_hex(&upper.to_lowercase()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), upper);
    }

    #[test]
    fn hook_hash_rejects_short_input() {
        assert!(matches!(
            HookHash::from_slice(&[0u8; 31]),
            Err(TypesError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn namespace_default_is_zero() {
        assert_eq!(Namespace::default(), Namespace::ZERO);
        assert_eq!(Namespace::ZERO.to_string(), "0".repeat(64));
    }
}
