//! Payment amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AccountId, Xfl};

/// The amount field of a payment: native drops or an issued-currency value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    /// Native currency, in drops (the smallest indivisible unit).
    Native(u64),
    /// An issued currency balance.
    Issued {
        value: Xfl,
        currency: [u8; 20],
        issuer: AccountId,
    },
}

impl Amount {
    pub fn drops(&self) -> Option<u64> {
        match self {
            Amount::Native(drops) => Some(*drops),
            Amount::Issued { .. } => None,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Native(_))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Native(drops) => write!(f, "{drops} drops"),
            Amount::Issued { value, issuer, .. } => write!(f, "{value}/{issuer}"),
        }
    }
}
