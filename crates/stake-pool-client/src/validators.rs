//! Choosing which pool stake accounts a withdrawal splits from.
//!
//! Without an explicit validator, candidates are ranked:
//!
//! 1. the pool's preferred withdraw validator,
//! 2. other active validator stake accounts, most stake first,
//! 3. transient stake accounts holding more than the minimum balance,
//! 4. the reserve stake account.
//!
//! Ties within a tier go to the lower vote address bytes, so the same
//! on-chain state always produces the same selection. The request is then
//! filled greedily in that order.

use std::cmp::Reverse;
use std::num::NonZeroU32;

use log::debug;
use sol_primitives::{bytes_to_address, Pubkey};

use crate::config::ClientConfig;
use crate::error::StakePoolError;
use crate::math::{calc_pool_tokens_for_deposit, gross_up_for_fee};
use crate::pda::{find_stake_program_address, find_transient_stake_program_address};
use crate::state::{StakePool, StakeStatus, ValidatorList};

/// One stake account to split and how many pool tokens to burn for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawAccount {
    pub stake_address: Pubkey,
    pub vote_address: Option<Pubkey>,
    pub pool_amount: u64,
}

/// Ranking tier of a candidate account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CandidateKind {
    Preferred,
    Active,
    Transient,
    Reserve,
}

/// A stake account able to supply lamports, with what it can give up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub stake_address: Pubkey,
    pub vote_address: Option<Pubkey>,
    pub lamports: u64,
}

/// Pool state a selection is computed against.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawContext<'a> {
    pub config: &'a ClientConfig,
    pub stake_pool_address: &'a Pubkey,
    pub stake_pool: &'a StakePool,
    pub validator_list: &'a ValidatorList,
    /// Rent-exempt minimum of a stake account.
    pub stake_rent: u64,
    /// Live lamports held by the reserve stake account.
    pub reserve_lamports: u64,
    /// Skip the withdrawal fee gross-up (the manager's own fee account pays none).
    pub skip_fee: bool,
}

impl WithdrawContext<'_> {
    /// Lamports a validator stake account must keep.
    fn min_balance(&self) -> u64 {
        self.stake_rent
            .saturating_add(self.config.minimum_active_stake)
    }

    /// Pool tokens burnable against `lamports` of stake, fee included.
    fn pool_tokens_for(&self, lamports: u64) -> Result<u64, StakePoolError> {
        let tokens = calc_pool_tokens_for_deposit(self.stake_pool, lamports)?;
        if self.skip_fee {
            Ok(tokens)
        } else {
            gross_up_for_fee(tokens, &self.stake_pool.stake_withdrawal_fee)
        }
    }
}

/// All accounts able to fund a withdrawal, in selection order.
pub fn candidate_accounts(ctx: &WithdrawContext<'_>) -> Result<Vec<Candidate>, StakePoolError> {
    let program_id = &ctx.config.program_id;
    let min_balance = ctx.min_balance();
    let preferred = ctx.stake_pool.preferred_withdraw_validator_vote_address;

    let mut candidates = Vec::new();
    for entry in &ctx.validator_list.validators {
        if entry.status != StakeStatus::Active {
            continue;
        }
        let vote = entry.vote_account_address;

        let active = entry.active_stake_lamports.saturating_sub(min_balance);
        if active > 0 {
            let stake = find_stake_program_address(
                program_id,
                &vote,
                ctx.stake_pool_address,
                NonZeroU32::new(entry.validator_seed_suffix),
            )?;
            let kind = if preferred == Some(vote) {
                CandidateKind::Preferred
            } else {
                CandidateKind::Active
            };
            candidates.push(Candidate {
                kind,
                stake_address: stake.address,
                vote_address: Some(vote),
                lamports: active,
            });
        }

        let transient = entry.transient_stake_lamports.saturating_sub(min_balance);
        if transient > 0 {
            let stake = find_transient_stake_program_address(
                program_id,
                &vote,
                ctx.stake_pool_address,
                entry.transient_seed_suffix,
            )?;
            candidates.push(Candidate {
                kind: CandidateKind::Transient,
                stake_address: stake.address,
                vote_address: Some(vote),
                lamports: transient,
            });
        }
    }

    candidates.sort_by_key(|c| (c.kind, Reverse(c.lamports), c.vote_address));

    let reserve = ctx.reserve_lamports.saturating_sub(ctx.stake_rent);
    if reserve > 0 {
        candidates.push(Candidate {
            kind: CandidateKind::Reserve,
            stake_address: ctx.stake_pool.reserve_stake,
            vote_address: None,
            lamports: reserve,
        });
    }

    Ok(candidates)
}

/// Split `pool_tokens` greedily across the ranked candidates.
pub fn select_withdraw_accounts(
    ctx: &WithdrawContext<'_>,
    pool_tokens: u64,
) -> Result<Vec<WithdrawAccount>, StakePoolError> {
    let candidates = candidate_accounts(ctx)?;
    if candidates.is_empty() {
        return Err(StakePoolError::ValidatorNotFound(
            "stake pool has no stake accounts to withdraw from".into(),
        ));
    }

    let mut remaining = pool_tokens;
    let mut selected = Vec::new();
    for candidate in candidates {
        if remaining == 0 {
            break;
        }
        let available = ctx.pool_tokens_for(candidate.lamports)?;
        let pool_amount = available.min(remaining);
        if pool_amount == 0 {
            continue;
        }
        debug!(
            "{:?} stake account {} covers {} pool tokens",
            candidate.kind,
            bytes_to_address(&candidate.stake_address),
            pool_amount
        );
        selected.push(WithdrawAccount {
            stake_address: candidate.stake_address,
            vote_address: candidate.vote_address,
            pool_amount,
        });
        remaining -= pool_amount;
    }

    if remaining > 0 {
        return Err(StakePoolError::ValidatorNotFound(format!(
            "no stake accounts found in this pool enough for {pool_tokens} pool tokens, {remaining} uncovered"
        )));
    }
    if selected.len() > ctx.config.max_withdraw_accounts {
        return Err(StakePoolError::ValidatorNotFound(format!(
            "withdrawal needs {} stake accounts, at most {} fit in one transaction",
            selected.len(),
            ctx.config.max_withdraw_accounts
        )));
    }
    Ok(selected)
}

/// Withdraw everything from the validator behind `vote_account`.
///
/// `stake_account_lamports` is the live balance of that validator's stake
/// account; only what exceeds the minimum balance can be taken.
pub fn select_explicit_validator(
    ctx: &WithdrawContext<'_>,
    vote_account: &Pubkey,
    stake_account_lamports: u64,
    pool_tokens: u64,
) -> Result<WithdrawAccount, StakePoolError> {
    let stake_address = validator_stake_address(ctx, vote_account)?;

    let available_lamports = stake_account_lamports.saturating_sub(ctx.min_balance());
    let available = ctx.pool_tokens_for(available_lamports)?;
    if available < pool_tokens {
        return Err(StakePoolError::ValidatorNotFound(format!(
            "not enough lamports available for withdrawal from {}, {pool_tokens} asked, {available} available",
            bytes_to_address(&stake_address)
        )));
    }

    Ok(WithdrawAccount {
        stake_address,
        vote_address: Some(*vote_account),
        pool_amount: pool_tokens,
    })
}

/// Canonical stake account of an active validator in the pool.
pub fn validator_stake_address(
    ctx: &WithdrawContext<'_>,
    vote_account: &Pubkey,
) -> Result<Pubkey, StakePoolError> {
    let entry = ctx.validator_list.find(vote_account).ok_or_else(|| {
        StakePoolError::ValidatorNotFound(format!(
            "vote account {} is not in the validator list",
            bytes_to_address(vote_account)
        ))
    })?;
    if entry.status != StakeStatus::Active {
        return Err(StakePoolError::ValidatorNotFound(format!(
            "validator {} is {:?}",
            bytes_to_address(vote_account),
            entry.status
        )));
    }
    let stake = find_stake_program_address(
        &ctx.config.program_id,
        vote_account,
        ctx.stake_pool_address,
        NonZeroU32::new(entry.validator_seed_suffix),
    )?;
    Ok(stake.address)
}

/// Take the whole withdrawal from the reserve stake account.
pub fn select_reserve(ctx: &WithdrawContext<'_>, pool_tokens: u64) -> WithdrawAccount {
    WithdrawAccount {
        stake_address: ctx.stake_pool.reserve_stake,
        vote_address: None,
        pool_amount: pool_tokens,
    }
}
