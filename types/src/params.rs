//! Hook parameters: opaque name/value byte pairs carried by transactions and
//! hook installations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::TypesError;

/// An ordered set of hook parameters.
///
/// Transactions carry `L`/`T`/`V` vote parameters; governance hook installs
/// carry the `IMC`/`IS..` setup parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookParams(BTreeMap<Vec<u8>, Vec<u8>>);

impl HookParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.0.insert(name.into(), value.into());
    }

    /// Build from hex-encoded `(name, value)` pairs, as they appear on the wire.
    pub fn from_hex_pairs<'a, I>(pairs: I) -> Result<Self, TypesError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::new();
        for (name, value) in pairs {
            params.insert(hex::decode(name.trim())?, hex::decode(value.trim())?);
        }
        Ok(params)
    }

    pub fn get(&self, name: &[u8]) -> Option<&[u8]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.0.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_pairs_decode_names_and_values() {
        // 'T' = 0x54, topic 'S' seat 1
        let params = HookParams::from_hex_pairs([("4C", "02"), ("54", "5301")]).unwrap();
        assert_eq!(params.get(b"L"), Some(&[2u8][..]));
        assert_eq!(params.get(b"T"), Some(&[b'S', 1][..]));
        assert_eq!(params.get(b"V"), None);
    }

    #[test]
    fn bad_hex_is_an_error() {
        assert!(HookParams::from_hex_pairs([("4C", "0G")]).is_err());
    }
}
