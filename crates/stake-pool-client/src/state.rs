//! On-chain stake pool state, decoded with borsh.
//!
//! Accounts are allocated larger than their content (the validator list is
//! sized for `max_validators`), so decoding reads from the front of the
//! buffer and ignores trailing bytes.

use std::collections::HashSet;

use borsh::{BorshDeserialize, BorshSerialize};
use sol_primitives::{bytes_to_address, Pubkey};

use crate::error::StakePoolError;

/// Discriminates the account types owned by the stake pool program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum AccountType {
    #[default]
    Uninitialized,
    StakePool,
    ValidatorList,
}

/// A fee as a fraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Fee {
    pub denominator: u64,
    pub numerator: u64,
}

/// Stake account lockup applied to stake withdrawn from the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Lockup {
    pub unix_timestamp: i64,
    pub epoch: u64,
    pub custodian: Pubkey,
}

/// A value that takes effect after one or two epoch boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum FutureEpoch<T> {
    #[default]
    None,
    One(T),
    Two(T),
}

/// The stake pool account.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct StakePool {
    pub account_type: AccountType,
    pub manager: Pubkey,
    pub staker: Pubkey,
    pub stake_deposit_authority: Pubkey,
    pub stake_withdraw_bump_seed: u8,
    pub validator_list: Pubkey,
    pub reserve_stake: Pubkey,
    pub pool_mint: Pubkey,
    pub manager_fee_account: Pubkey,
    pub token_program_id: Pubkey,
    pub total_lamports: u64,
    pub pool_token_supply: u64,
    pub last_update_epoch: u64,
    pub lockup: Lockup,
    pub epoch_fee: Fee,
    pub next_epoch_fee: FutureEpoch<Fee>,
    pub preferred_deposit_validator_vote_address: Option<Pubkey>,
    pub preferred_withdraw_validator_vote_address: Option<Pubkey>,
    pub stake_deposit_fee: Fee,
    pub stake_withdrawal_fee: Fee,
    pub next_stake_withdrawal_fee: FutureEpoch<Fee>,
    pub stake_referral_fee: u8,
    pub sol_deposit_authority: Option<Pubkey>,
    pub sol_deposit_fee: Fee,
    pub sol_referral_fee: u8,
    pub sol_withdraw_authority: Option<Pubkey>,
    pub sol_withdrawal_fee: Fee,
    pub next_sol_withdrawal_fee: FutureEpoch<Fee>,
    pub last_epoch_pool_token_supply: u64,
    pub last_epoch_total_lamports: u64,
}

impl StakePool {
    /// Decode and sanity-check a stake pool account.
    pub fn unpack(data: &[u8]) -> Result<Self, StakePoolError> {
        let pool = Self::deserialize(&mut &data[..])
            .map_err(|e| StakePoolError::AccountDecodeError(format!("stake pool: {e}")))?;

        if pool.account_type != AccountType::StakePool {
            return Err(StakePoolError::AccountDecodeError(format!(
                "expected a stake pool account, found {:?}",
                pool.account_type
            )));
        }
        if pool.pool_token_supply == 0 && pool.total_lamports != 0 {
            return Err(StakePoolError::AccountDecodeError(format!(
                "stake pool holds {} lamports with no pool tokens outstanding",
                pool.total_lamports
            )));
        }
        Ok(pool)
    }
}

/// Lifecycle of a validator inside the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum StakeStatus {
    #[default]
    Active,
    DeactivatingTransient,
    ReadyForRemoval,
    DeactivatingValidator,
    DeactivatingAll,
}

/// Header of the validator list account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ValidatorListHeader {
    pub account_type: AccountType,
    pub max_validators: u32,
}

/// One validator's entry in the list (73 bytes on chain).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ValidatorStakeInfo {
    pub active_stake_lamports: u64,
    pub transient_stake_lamports: u64,
    pub last_update_epoch: u64,
    pub transient_seed_suffix: u64,
    pub unused: u32,
    pub validator_seed_suffix: u32,
    pub status: StakeStatus,
    pub vote_account_address: Pubkey,
}

impl ValidatorStakeInfo {
    /// Active plus transient lamports.
    pub fn stake_lamports(&self) -> Result<u64, StakePoolError> {
        self.active_stake_lamports
            .checked_add(self.transient_stake_lamports)
            .ok_or(StakePoolError::ArithmeticOverflow)
    }
}

/// The validator list account.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ValidatorList {
    pub header: ValidatorListHeader,
    pub validators: Vec<ValidatorStakeInfo>,
}

impl ValidatorList {
    /// Decode and sanity-check a validator list account.
    pub fn unpack(data: &[u8]) -> Result<Self, StakePoolError> {
        let list = Self::deserialize(&mut &data[..])
            .map_err(|e| StakePoolError::AccountDecodeError(format!("validator list: {e}")))?;

        if list.header.account_type != AccountType::ValidatorList {
            return Err(StakePoolError::AccountDecodeError(format!(
                "expected a validator list account, found {:?}",
                list.header.account_type
            )));
        }
        if list.validators.len() > list.header.max_validators as usize {
            return Err(StakePoolError::AccountDecodeError(format!(
                "validator list holds {} entries, max is {}",
                list.validators.len(),
                list.header.max_validators
            )));
        }

        let mut seen = HashSet::with_capacity(list.validators.len());
        for entry in &list.validators {
            if !seen.insert(entry.vote_account_address) {
                return Err(StakePoolError::AccountDecodeError(format!(
                    "duplicate vote account {} in validator list",
                    bytes_to_address(&entry.vote_account_address)
                )));
            }
        }
        Ok(list)
    }

    /// Entry for `vote_account`, if the pool manages that validator.
    pub fn find(&self, vote_account: &Pubkey) -> Option<&ValidatorStakeInfo> {
        self.validators
            .iter()
            .find(|v| &v.vote_account_address == vote_account)
    }
}
