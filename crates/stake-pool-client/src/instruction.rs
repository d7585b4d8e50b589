//! Stake pool instruction builders.
//!
//! Each builder takes the accounts the instruction touches and emits the
//! exact key list (order, signer and writable flags) the program expects,
//! with data packed by [`StakePoolInstruction::pack`].

use sol_primitives::program_ids::{
    STAKE_CONFIG_ID, STAKE_PROGRAM_ID, SYSTEM_PROGRAM_ID, SYSVAR_CLOCK_ID, SYSVAR_STAKE_HISTORY_ID,
};
use sol_primitives::{AccountMeta, Instruction, Pubkey};

use crate::error::StakePoolError;
use crate::layout::StakePoolInstruction;

/// Accounts for `DepositSol`.
#[derive(Debug, Clone)]
pub struct DepositSolAccounts {
    pub stake_pool: Pubkey,
    pub withdraw_authority: Pubkey,
    pub reserve_stake: Pubkey,
    pub funding_account: Pubkey,
    pub destination_pool_account: Pubkey,
    pub manager_fee_account: Pubkey,
    pub referral_pool_account: Pubkey,
    pub pool_mint: Pubkey,
    pub token_program_id: Pubkey,
    /// Appended as a signer only when the pool restricts SOL deposits.
    pub deposit_authority: Option<Pubkey>,
}

/// Accounts for `WithdrawSol`.
#[derive(Debug, Clone)]
pub struct WithdrawSolAccounts {
    pub stake_pool: Pubkey,
    pub withdraw_authority: Pubkey,
    pub user_transfer_authority: Pubkey,
    pub pool_tokens_from: Pubkey,
    pub reserve_stake: Pubkey,
    pub lamports_to: Pubkey,
    pub manager_fee_account: Pubkey,
    pub pool_mint: Pubkey,
    pub token_program_id: Pubkey,
    /// Appended as a signer only when the pool restricts SOL withdrawals.
    pub sol_withdraw_authority: Option<Pubkey>,
}

/// Accounts for `WithdrawStake`.
#[derive(Debug, Clone)]
pub struct WithdrawStakeAccounts {
    pub stake_pool: Pubkey,
    pub validator_list: Pubkey,
    pub withdraw_authority: Pubkey,
    pub stake_to_split: Pubkey,
    pub stake_to_receive: Pubkey,
    pub user_stake_authority: Pubkey,
    pub user_transfer_authority: Pubkey,
    pub user_pool_token_account: Pubkey,
    pub manager_fee_account: Pubkey,
    pub pool_mint: Pubkey,
    pub token_program_id: Pubkey,
}

/// Accounts for `Redelegate`.
#[derive(Debug, Clone)]
pub struct RedelegateAccounts {
    pub stake_pool: Pubkey,
    pub staker: Pubkey,
    pub withdraw_authority: Pubkey,
    pub validator_list: Pubkey,
    pub source_validator_stake: Pubkey,
    pub source_transient_stake: Pubkey,
    pub ephemeral_stake: Pubkey,
    pub destination_transient_stake: Pubkey,
    pub destination_validator_stake: Pubkey,
    pub destination_vote_account: Pubkey,
}

/// Seeds and amount for `Redelegate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedelegateArgs {
    pub lamports: u64,
    pub source_transient_stake_seed: u64,
    pub ephemeral_stake_seed: u64,
    pub destination_transient_stake_seed: u64,
}

/// Accounts for `CreateTokenMetadata` and `UpdateTokenMetadata`.
#[derive(Debug, Clone)]
pub struct TokenMetadataAccounts {
    pub stake_pool: Pubkey,
    pub manager: Pubkey,
    pub withdraw_authority: Pubkey,
    pub pool_mint: Pubkey,
    pub token_metadata: Pubkey,
    pub metadata_program_id: Pubkey,
}

/// Deposit SOL from `funding_account`, minting pool tokens to the
/// destination. With `minimum_pool_tokens_out` the slippage-checked variant
/// is emitted.
pub fn deposit_sol(
    program_id: &Pubkey,
    accounts: &DepositSolAccounts,
    lamports_in: u64,
    minimum_pool_tokens_out: Option<u64>,
) -> Result<Instruction, StakePoolError> {
    let mut metas = vec![
        AccountMeta::new(accounts.stake_pool, false),
        AccountMeta::new_readonly(accounts.withdraw_authority, false),
        AccountMeta::new(accounts.reserve_stake, false),
        AccountMeta::new(accounts.funding_account, true),
        AccountMeta::new(accounts.destination_pool_account, false),
        AccountMeta::new(accounts.manager_fee_account, false),
        AccountMeta::new(accounts.referral_pool_account, false),
        AccountMeta::new(accounts.pool_mint, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(accounts.token_program_id, false),
    ];
    if let Some(authority) = accounts.deposit_authority {
        metas.push(AccountMeta::new_readonly(authority, true));
    }

    let data = match minimum_pool_tokens_out {
        Some(minimum_pool_tokens_out) => StakePoolInstruction::DepositSolWithSlippage {
            lamports_in,
            minimum_pool_tokens_out,
        },
        None => StakePoolInstruction::DepositSol {
            lamports: lamports_in,
        },
    }
    .pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

/// Withdraw SOL from the reserve, burning pool tokens the transfer
/// authority has been approved for.
pub fn withdraw_sol(
    program_id: &Pubkey,
    accounts: &WithdrawSolAccounts,
    pool_tokens_in: u64,
    minimum_lamports_out: Option<u64>,
) -> Result<Instruction, StakePoolError> {
    let mut metas = vec![
        AccountMeta::new(accounts.stake_pool, false),
        AccountMeta::new_readonly(accounts.withdraw_authority, false),
        AccountMeta::new_readonly(accounts.user_transfer_authority, true),
        AccountMeta::new(accounts.pool_tokens_from, false),
        AccountMeta::new(accounts.reserve_stake, false),
        AccountMeta::new(accounts.lamports_to, false),
        AccountMeta::new(accounts.manager_fee_account, false),
        AccountMeta::new(accounts.pool_mint, false),
        AccountMeta::new_readonly(SYSVAR_CLOCK_ID, false),
        AccountMeta::new_readonly(SYSVAR_STAKE_HISTORY_ID, false),
        AccountMeta::new_readonly(STAKE_PROGRAM_ID, false),
        AccountMeta::new_readonly(accounts.token_program_id, false),
    ];
    if let Some(authority) = accounts.sol_withdraw_authority {
        metas.push(AccountMeta::new_readonly(authority, true));
    }

    let data = match minimum_lamports_out {
        Some(minimum_lamports_out) => StakePoolInstruction::WithdrawSolWithSlippage {
            pool_tokens_in,
            minimum_lamports_out,
        },
        None => StakePoolInstruction::WithdrawSol {
            pool_tokens: pool_tokens_in,
        },
    }
    .pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

/// Split stake out of `stake_to_split` into `stake_to_receive`, burning
/// pool tokens.
pub fn withdraw_stake(
    program_id: &Pubkey,
    accounts: &WithdrawStakeAccounts,
    pool_tokens_in: u64,
    minimum_lamports_out: Option<u64>,
) -> Result<Instruction, StakePoolError> {
    let metas = vec![
        AccountMeta::new(accounts.stake_pool, false),
        AccountMeta::new(accounts.validator_list, false),
        AccountMeta::new_readonly(accounts.withdraw_authority, false),
        AccountMeta::new(accounts.stake_to_split, false),
        AccountMeta::new(accounts.stake_to_receive, false),
        AccountMeta::new_readonly(accounts.user_stake_authority, false),
        AccountMeta::new_readonly(accounts.user_transfer_authority, true),
        AccountMeta::new(accounts.user_pool_token_account, false),
        AccountMeta::new(accounts.manager_fee_account, false),
        AccountMeta::new(accounts.pool_mint, false),
        AccountMeta::new_readonly(SYSVAR_CLOCK_ID, false),
        AccountMeta::new_readonly(accounts.token_program_id, false),
        AccountMeta::new_readonly(STAKE_PROGRAM_ID, false),
    ];

    let data = match minimum_lamports_out {
        Some(minimum_lamports_out) => StakePoolInstruction::WithdrawStakeWithSlippage {
            pool_tokens_in,
            minimum_lamports_out,
        },
        None => StakePoolInstruction::WithdrawStake {
            pool_tokens: pool_tokens_in,
        },
    }
    .pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

/// Move active stake from one validator to another through an ephemeral
/// stake account. Only the staker may sign this.
pub fn redelegate(
    program_id: &Pubkey,
    accounts: &RedelegateAccounts,
    args: RedelegateArgs,
) -> Result<Instruction, StakePoolError> {
    let metas = vec![
        AccountMeta::new_readonly(accounts.stake_pool, false),
        AccountMeta::new_readonly(accounts.staker, true),
        AccountMeta::new_readonly(accounts.withdraw_authority, false),
        AccountMeta::new(accounts.validator_list, false),
        AccountMeta::new(accounts.source_validator_stake, false),
        AccountMeta::new(accounts.source_transient_stake, false),
        AccountMeta::new(accounts.ephemeral_stake, false),
        AccountMeta::new(accounts.destination_transient_stake, false),
        AccountMeta::new_readonly(accounts.destination_validator_stake, false),
        AccountMeta::new_readonly(accounts.destination_vote_account, false),
        AccountMeta::new_readonly(SYSVAR_CLOCK_ID, false),
        AccountMeta::new_readonly(SYSVAR_STAKE_HISTORY_ID, false),
        AccountMeta::new_readonly(STAKE_CONFIG_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(STAKE_PROGRAM_ID, false),
    ];

    let data = StakePoolInstruction::Redelegate {
        lamports: args.lamports,
        source_transient_stake_seed: args.source_transient_stake_seed,
        ephemeral_stake_seed: args.ephemeral_stake_seed,
        destination_transient_stake_seed: args.destination_transient_stake_seed,
    }
    .pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

/// Create the pool token's metadata account, paid for by `payer`.
pub fn create_token_metadata(
    program_id: &Pubkey,
    accounts: &TokenMetadataAccounts,
    payer: &Pubkey,
    name: String,
    symbol: String,
    uri: String,
) -> Result<Instruction, StakePoolError> {
    let metas = vec![
        AccountMeta::new_readonly(accounts.stake_pool, false),
        AccountMeta::new_readonly(accounts.manager, true),
        AccountMeta::new_readonly(accounts.withdraw_authority, false),
        AccountMeta::new_readonly(accounts.pool_mint, false),
        AccountMeta::new(*payer, true),
        AccountMeta::new(accounts.token_metadata, false),
        AccountMeta::new_readonly(accounts.metadata_program_id, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];

    let data = StakePoolInstruction::CreateTokenMetadata { name, symbol, uri }.pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

/// Update the pool token's existing metadata account.
pub fn update_token_metadata(
    program_id: &Pubkey,
    accounts: &TokenMetadataAccounts,
    name: String,
    symbol: String,
    uri: String,
) -> Result<Instruction, StakePoolError> {
    let metas = vec![
        AccountMeta::new_readonly(accounts.stake_pool, false),
        AccountMeta::new_readonly(accounts.manager, true),
        AccountMeta::new_readonly(accounts.withdraw_authority, false),
        AccountMeta::new(accounts.token_metadata, false),
        AccountMeta::new_readonly(accounts.metadata_program_id, false),
    ];

    let data = StakePoolInstruction::UpdateTokenMetadata { name, symbol, uri }.pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}
