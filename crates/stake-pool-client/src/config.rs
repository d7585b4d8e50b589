//! Client configuration.
//!
//! A [`ClientConfig`] is built once at startup (from defaults or JSON) and
//! passed by reference into every operation. Nothing in the crate reads
//! program ids from anywhere else.

use serde::{Deserialize, Serialize};
use sol_primitives::program_ids::{
    ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use sol_primitives::{const_address, Pubkey};

use crate::error::StakePoolError;
use crate::math::LAMPORTS_PER_SOL;

/// Address of the deployed stake pool program.
pub const STAKE_POOL_PROGRAM_ID: Pubkey = const_address("spooqgqqDxZgVc3pR6EvuVFZJ1kj7ABM4Hccz1gwAN1");

/// Minimum lamports a validator stake account keeps so later merges don't
/// trip over a credits-observed mismatch.
pub const MINIMUM_ACTIVE_STAKE: u64 = LAMPORTS_PER_SOL;

/// Upper bound on stake accounts split in a single withdrawal.
pub const MAX_WITHDRAW_ACCOUNTS: usize = 5;

/// How much of the payer's balance a native deposit must leave behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayerReserve {
    /// The whole balance may be deposited.
    #[default]
    None,
    /// Keep the rent-exempt minimum of a zero-data account.
    RentExempt,
}

/// Program ids and policy knobs shared by every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(with = "serde_address")]
    pub program_id: Pubkey,
    #[serde(with = "serde_address")]
    pub token_program_id: Pubkey,
    #[serde(with = "serde_address")]
    pub associated_token_program_id: Pubkey,
    #[serde(with = "serde_address")]
    pub token_metadata_program_id: Pubkey,
    pub minimum_active_stake: u64,
    pub max_withdraw_accounts: usize,
    pub payer_reserve: PayerReserve,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: STAKE_POOL_PROGRAM_ID,
            token_program_id: TOKEN_PROGRAM_ID,
            associated_token_program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
            token_metadata_program_id: TOKEN_METADATA_PROGRAM_ID,
            minimum_active_stake: MINIMUM_ACTIVE_STAKE,
            max_withdraw_accounts: MAX_WITHDRAW_ACCOUNTS,
            payer_reserve: PayerReserve::None,
        }
    }
}

impl ClientConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, StakePoolError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StakePoolError::InvalidArgument(format!("invalid client config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON with addresses in Base58.
    pub fn to_json(&self) -> Result<String, StakePoolError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StakePoolError::InvalidArgument(format!("config serialization: {e}")))
    }

    fn validate(&self) -> Result<(), StakePoolError> {
        if self.max_withdraw_accounts == 0 {
            return Err(StakePoolError::InvalidArgument(
                "max_withdraw_accounts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Base58 (de)serialization for raw 32-byte addresses.
mod serde_address {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use sol_primitives::{address_to_bytes, bytes_to_address, Pubkey};

    pub fn serialize<S: Serializer>(address: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&bytes_to_address(address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        address_to_bytes(&s).map_err(de::Error::custom)
    }
}
