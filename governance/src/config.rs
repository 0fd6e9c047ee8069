//! Governance hook configuration.

use serde::{Deserialize, Serialize};

use govern_types::AccountId;

use crate::quorum::ThresholdPolicy;
use crate::seats::SeatZeroPolicy;

/// The genesis account hosting the primary table.
pub const GENESIS_ACCOUNT: AccountId = AccountId::new([
    0xB5, 0xF7, 0x62, 0x79, 0x8A, 0x53, 0xD5, 0x43, 0xA0, 0x14, 0xCA, 0xF8, 0xB2, 0x97, 0xCF,
    0xF8, 0xF2, 0xF9, 0x37, 0xE8,
]);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Account whose table is the primary (layer 1) table.
    #[serde(default = "default_genesis")]
    pub genesis: AccountId,

    /// How many votes a topic needs before it is actioned.
    #[serde(default)]
    pub threshold: ThresholdPolicy,

    /// Whether seat 0 may be voted empty.
    #[serde(default)]
    pub seat_zero: SeatZeroPolicy,

    /// Largest payment, in drops, the rescue gate lets through to voting.
    #[serde(default = "default_rescue_payment_cap")]
    pub rescue_payment_cap_drops: u64,
}

fn default_genesis() -> AccountId {
    GENESIS_ACCOUNT
}

fn default_rescue_payment_cap() -> u64 {
    1
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            genesis: default_genesis(),
            threshold: ThresholdPolicy::default(),
            seat_zero: SeatZeroPolicy::default(),
            rescue_payment_cap_drops: default_rescue_payment_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_genesis_matches_hex() {
        assert_eq!(
            GovernanceConfig::default().genesis.to_hex(),
            "B5F762798A53D543A014CAF8B297CFF8F2F937E8"
        );
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: GovernanceConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, GovernanceConfig::default());
        assert_eq!(cfg.threshold, ThresholdPolicy::Majority);
        assert_eq!(cfg.seat_zero, SeatZeroPolicy::AllowVacancy);
    }

    #[test]
    fn test_toml_overrides() {
        let cfg: GovernanceConfig = toml::from_str(
            r#"
            genesis = "0101010101010101010101010101010101010101"
            threshold = "supermajority"
            seat_zero = "require-occupied"
            rescue_payment_cap_drops = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.genesis, AccountId::new([1u8; 20]));
        assert_eq!(cfg.threshold, ThresholdPolicy::Supermajority);
        assert_eq!(cfg.seat_zero, SeatZeroPolicy::RequireOccupied);
        assert_eq!(cfg.rescue_payment_cap_drops, 5);
    }
}
