//! XFL: the ledger's 64-bit decimal floating point format.
//!
//! Layout of a non-zero value:
//! - bit 63: always 0
//! - bit 62: sign, set for positive values
//! - bits 54..=61: exponent, biased by 97
//! - bits 0..=53: mantissa, normalised into `[10^15, 10^16)`
//!
//! Zero is the all-zero word. The value is `mantissa * 10^exponent`.
//! Hook parameters carry XFLs as the little-endian bytes of the word.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::TypesError;

const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
const MIN_EXPONENT: i32 = -96;
const MAX_EXPONENT: i32 = 80;
const EXPONENT_BIAS: i32 = 97;
const POSITIVE_BIT: u64 = 1 << 62;
const MANTISSA_MASK: u64 = (1 << 54) - 1;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Xfl(u64);

impl Xfl {
    pub const ZERO: Self = Self(0);

    /// Build a normalised XFL from sign, mantissa and exponent.
    ///
    /// Digits beyond sixteen significant places are truncated. Values too small
    /// to represent collapse to zero.
    pub fn from_parts(negative: bool, mantissa: u64, exponent: i32) -> Result<Self, TypesError> {
        if mantissa == 0 {
            return Ok(Self::ZERO);
        }
        let (mut m, mut e) = (mantissa, exponent);
        while m < MIN_MANTISSA {
            m *= 10;
            e -= 1;
        }
        while m > MAX_MANTISSA {
            m /= 10;
            e += 1;
        }
        if e < MIN_EXPONENT {
            return Ok(Self::ZERO);
        }
        if e > MAX_EXPONENT {
            return Err(TypesError::XflOverflow);
        }
        let mut raw = (((e + EXPONENT_BIAS) as u64) << 54) | m;
        if !negative {
            raw |= POSITIVE_BIT;
        }
        Ok(Self(raw))
    }

    /// Validate a raw XFL word.
    pub fn from_bits(raw: u64) -> Result<Self, TypesError> {
        if raw == 0 {
            return Ok(Self::ZERO);
        }
        let x = Self(raw);
        let valid = raw >> 63 == 0
            && (MIN_MANTISSA..=MAX_MANTISSA).contains(&x.mantissa())
            && (MIN_EXPONENT..=MAX_EXPONENT).contains(&x.exponent());
        if valid {
            Ok(x)
        } else {
            Err(TypesError::XflMalformed(raw))
        }
    }

    pub fn from_le_bytes(bytes: [u8; 8]) -> Result<Self, TypesError> {
        Self::from_bits(u64::from_le_bytes(bytes))
    }

    pub fn from_f64(value: f64) -> Result<Self, TypesError> {
        if !value.is_finite() {
            return Err(TypesError::XflNotFinite);
        }
        if value == 0.0 {
            return Ok(Self::ZERO);
        }
        let abs = value.abs();
        let exponent = abs.log10().floor() as i32 - 15;
        let mantissa = (abs / 10f64.powi(exponent)).round() as u64;
        Self::from_parts(value < 0.0, mantissa, exponent)
    }

    pub fn from_int(value: u64) -> Result<Self, TypesError> {
        Self::from_parts(false, value, 0)
    }

    pub fn to_bits(self) -> u64 {
        self.0
    }

    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        !self.is_zero() && self.0 & POSITIVE_BIT == 0
    }

    pub fn mantissa(self) -> u64 {
        self.0 & MANTISSA_MASK
    }

    pub fn exponent(self) -> i32 {
        if self.is_zero() {
            return 0;
        }
        ((self.0 >> 54) & 0xFF) as i32 - EXPONENT_BIAS
    }

    pub fn to_f64(self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let v = self.mantissa() as f64 * 10f64.powi(self.exponent());
        if self.is_negative() {
            -v
        } else {
            v
        }
    }

    /// Integer part of `self * 10^decimals`, truncating toward zero.
    pub fn to_int(self, decimals: u32) -> Result<u64, TypesError> {
        if self.is_negative() {
            return Err(TypesError::XflNegative);
        }
        if self.is_zero() {
            return Ok(0);
        }
        let shift = self.exponent() + decimals as i32;
        if shift >= 0 {
            10u64
                .checked_pow(shift as u32)
                .and_then(|p| self.mantissa().checked_mul(p))
                .ok_or(TypesError::XflOverflow)
        } else {
            Ok(10u64
                .checked_pow(shift.unsigned_abs())
                .map_or(0, |p| self.mantissa() / p))
        }
    }

    fn sign_rank(self) -> i8 {
        if self.is_zero() {
            0
        } else if self.is_negative() {
            -1
        } else {
            1
        }
    }
}

impl Ord for Xfl {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_sign = self.sign_rank().cmp(&other.sign_rank());
        if by_sign != Ordering::Equal || self.is_zero() {
            return by_sign;
        }
        let by_magnitude = self
            .exponent()
            .cmp(&other.exponent())
            .then(self.mantissa().cmp(&other.mantissa()));
        if self.is_negative() {
            by_magnitude.reverse()
        } else {
            by_magnitude
        }
    }
}

impl PartialOrd for Xfl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Xfl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Xfl({}e{})", self.mantissa(), self.exponent())
    }
}

impl fmt::Display for Xfl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}
