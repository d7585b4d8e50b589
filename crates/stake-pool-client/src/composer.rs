//! Turns a user intent into an [`InstructionPlan`].
//!
//! Every operation validates the pool first, then fetches whatever else it
//! needs (independent reads concurrently), derives addresses, checks bounds
//! and only then assembles instructions. Nothing is returned on failure.

use futures::try_join;
use log::{debug, info};
use sol_primitives::program_ids::STAKE_PROGRAM_ID;
use sol_primitives::spl_token::{
    approve, create_associated_token_account_idempotent,
    derive_associated_token_address_with_programs,
};
use sol_primitives::{
    bytes_to_address, stake_program, system_program, Instruction, Keypair, Pubkey, TokenAccount,
    STAKE_ACCOUNT_LEN,
};

use crate::accounts::{
    get_balance, get_minimum_balance_for_rent_exemption, get_stake_account,
    get_pool_token_account, get_stake_pool_account, get_validator_list_account,
};
use crate::config::{ClientConfig, PayerReserve};
use crate::error::StakePoolError;
use crate::instruction::{
    self, DepositSolAccounts, RedelegateAccounts, RedelegateArgs, TokenMetadataAccounts,
    WithdrawSolAccounts, WithdrawStakeAccounts,
};
use crate::layout::check_metadata_lengths;
use crate::math::{
    calc_lamports_withdraw_amount, check_deposit_bound, check_withdraw_bound, format_lamports,
};
use crate::pda::{
    find_ephemeral_stake_program_address, find_metadata_account, find_stake_program_address,
    find_transient_stake_program_address, find_withdraw_authority_program_address,
};
use crate::plan::InstructionPlan;
use crate::rpc::{ProgramClient, StakeAccount, StakeAccountState};
use crate::state::{StakePool, ValidatorStakeInfo};
use crate::validators::{
    select_explicit_validator, select_reserve, select_withdraw_accounts, validator_stake_address,
    WithdrawAccount, WithdrawContext,
};

/// Deposit native SOL in exchange for pool tokens.
#[derive(Debug, Clone, Default)]
pub struct DepositSolRequest {
    pub stake_pool: Pubkey,
    /// Pays the deposit and the transaction fee.
    pub payer: Pubkey,
    pub lamports: u64,
    /// Defaults to the payer's associated token account, created if missing.
    pub destination_token_account: Option<Pubkey>,
    /// Defaults to the destination token account.
    pub referrer_token_account: Option<Pubkey>,
    pub deposit_authority: Option<Pubkey>,
    pub minimum_pool_tokens_out: Option<u64>,
}

/// Burn pool tokens for native SOL out of the reserve.
#[derive(Debug, Clone, Default)]
pub struct WithdrawSolRequest {
    pub stake_pool: Pubkey,
    /// Owner of the pool tokens; pays the transaction fee.
    pub token_owner: Pubkey,
    /// Defaults to the token owner.
    pub sol_receiver: Option<Pubkey>,
    pub pool_tokens: u64,
    /// Defaults to the token owner's associated token account.
    pub pool_token_account: Option<Pubkey>,
    pub sol_withdraw_authority: Option<Pubkey>,
    pub minimum_lamports_out: Option<u64>,
}

/// Burn pool tokens for stake split out of the pool's stake accounts.
#[derive(Debug, Clone, Default)]
pub struct WithdrawStakeRequest {
    pub stake_pool: Pubkey,
    /// Owner of the pool tokens; pays the fee and becomes stake authority.
    pub token_owner: Pubkey,
    pub pool_tokens: u64,
    /// Withdraw only from this validator.
    pub vote_account: Option<Pubkey>,
    /// Existing stake account to receive into (undelegated) or to match
    /// (delegated).
    pub stake_receiver: Option<Pubkey>,
    pub pool_token_account: Option<Pubkey>,
    /// Take everything from the reserve stake account.
    pub use_reserve: bool,
    /// Spread over the withdrawals in proportion to their pool token amount.
    pub minimum_lamports_out: Option<u64>,
}

/// Move stake between two validators of the pool. Omitted seeds are
/// resolved from the validator list.
#[derive(Debug, Clone, Default)]
pub struct RedelegateRequest {
    pub stake_pool: Pubkey,
    pub source_vote_account: Pubkey,
    pub destination_vote_account: Pubkey,
    pub lamports: u64,
    pub source_transient_stake_seed: Option<u64>,
    pub ephemeral_stake_seed: Option<u64>,
    pub destination_transient_stake_seed: Option<u64>,
}

/// Name, symbol and URI for the pool token.
#[derive(Debug, Clone, Default)]
pub struct TokenMetadataRequest {
    pub stake_pool: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

// ---------------------------------------------------------------------------
// Native deposit / withdrawal
// ---------------------------------------------------------------------------

/// Transfer to a fresh funding account, create the destination token account
/// if needed, then `DepositSol` from the funding account.
pub async fn deposit_sol<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    request: &DepositSolRequest,
) -> Result<InstructionPlan, StakePoolError> {
    check_nonzero(request.lamports, "deposit amount")?;

    let (pool, balance, reserve) = try_join!(
        get_stake_pool_account(client, config, &request.stake_pool),
        get_balance(client, &request.payer),
        payer_reserve(client, config),
    )?;

    check_deposit_bound(balance, reserve, request.lamports)?;
    if let Some(authority) = &request.deposit_authority {
        check_authority("SOL deposit", authority, pool.sol_deposit_authority.as_ref())?;
    }

    let withdraw_authority =
        find_withdraw_authority_program_address(&config.program_id, &request.stake_pool)?;

    let mut plan = InstructionPlan::new(request.payer);
    let funding_account = plan.add_signer(Keypair::new());
    plan.push(system_program::transfer(
        &request.payer,
        &funding_account,
        request.lamports,
    ));

    let destination = match request.destination_token_account {
        Some(destination) => destination,
        None => {
            let ata = associated_token_address(config, &pool, &request.payer)?;
            plan.push(create_associated_token_account_idempotent(
                &config.associated_token_program_id,
                &request.payer,
                &ata,
                &request.payer,
                &pool.pool_mint,
                &pool.token_program_id,
            ));
            ata
        }
    };

    let accounts = DepositSolAccounts {
        stake_pool: request.stake_pool,
        withdraw_authority: withdraw_authority.address,
        reserve_stake: pool.reserve_stake,
        funding_account,
        destination_pool_account: destination,
        manager_fee_account: pool.manager_fee_account,
        referral_pool_account: request.referrer_token_account.unwrap_or(destination),
        pool_mint: pool.pool_mint,
        token_program_id: pool.token_program_id,
        deposit_authority: request.deposit_authority,
    };
    plan.push(instruction::deposit_sol(
        &config.program_id,
        &accounts,
        request.lamports,
        request.minimum_pool_tokens_out,
    )?);

    debug!(
        "depositing ◎{} into {}, pool tokens to {}",
        format_lamports(request.lamports as i128),
        bytes_to_address(&request.stake_pool),
        bytes_to_address(&destination)
    );
    Ok(plan)
}

/// Approve a fresh transfer authority for the pool tokens, then `WithdrawSol`.
pub async fn withdraw_sol<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    request: &WithdrawSolRequest,
) -> Result<InstructionPlan, StakePoolError> {
    check_nonzero(request.pool_tokens, "withdrawal amount")?;

    let pool = get_stake_pool_account(client, config, &request.stake_pool).await?;
    let token_account_address =
        pool_token_account_address(config, &pool, &request.token_owner, request.pool_token_account)?;
    let token_account = get_pool_token_account(client, &pool, &token_account_address).await?;

    check_pool_mint(&token_account, &pool)?;
    check_withdraw_bound(token_account.amount, request.pool_tokens)?;
    if let Some(authority) = &request.sol_withdraw_authority {
        check_authority("SOL withdraw", authority, pool.sol_withdraw_authority.as_ref())?;
    }

    let withdraw_authority =
        find_withdraw_authority_program_address(&config.program_id, &request.stake_pool)?;
    let sol_receiver = request.sol_receiver.unwrap_or(request.token_owner);

    let mut plan = InstructionPlan::new(request.token_owner);
    let transfer_authority = plan.add_signer(Keypair::new());
    plan.push(approve(
        &pool.token_program_id,
        &token_account_address,
        &transfer_authority,
        &request.token_owner,
        request.pool_tokens,
    ));

    let accounts = WithdrawSolAccounts {
        stake_pool: request.stake_pool,
        withdraw_authority: withdraw_authority.address,
        user_transfer_authority: transfer_authority,
        pool_tokens_from: token_account_address,
        reserve_stake: pool.reserve_stake,
        lamports_to: sol_receiver,
        manager_fee_account: pool.manager_fee_account,
        pool_mint: pool.pool_mint,
        token_program_id: pool.token_program_id,
        sol_withdraw_authority: request.sol_withdraw_authority,
    };
    plan.push(instruction::withdraw_sol(
        &config.program_id,
        &accounts,
        request.pool_tokens,
        request.minimum_lamports_out,
    )?);

    let lamports = calc_lamports_withdraw_amount(&pool, request.pool_tokens)?;
    info!(
        "Withdrawing ◎{}, or {} pool tokens, from the reserve to {}",
        format_lamports(lamports as i128),
        format_lamports(request.pool_tokens as i128),
        bytes_to_address(&sol_receiver)
    );
    Ok(plan)
}

// ---------------------------------------------------------------------------
// Withdraw as stake
// ---------------------------------------------------------------------------

/// Approve a fresh transfer authority, then split stake out of one or more
/// pool stake accounts, each into a newly created stake account (or straight
/// into an undelegated stake receiver).
pub async fn withdraw_stake<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    request: &WithdrawStakeRequest,
) -> Result<InstructionPlan, StakePoolError> {
    check_nonzero(request.pool_tokens, "withdrawal amount")?;

    let pool = get_stake_pool_account(client, config, &request.stake_pool).await?;
    let token_account_address =
        pool_token_account_address(config, &pool, &request.token_owner, request.pool_token_account)?;

    let receiver_fetch = async {
        match &request.stake_receiver {
            Some(receiver) => get_stake_account(client, receiver).await.map(Some),
            None => Ok(None),
        }
    };
    let (token_account, validator_list, reserve_lamports, stake_rent, receiver) = try_join!(
        get_pool_token_account(client, &pool, &token_account_address),
        get_validator_list_account(client, config, &pool.validator_list),
        get_balance(client, &pool.reserve_stake),
        get_minimum_balance_for_rent_exemption(client, STAKE_ACCOUNT_LEN as usize),
        receiver_fetch,
    )?;

    check_pool_mint(&token_account, &pool)?;
    check_withdraw_bound(token_account.amount, request.pool_tokens)?;

    let vote_account = resolve_vote_account(request.vote_account, receiver.as_ref())?;
    let direct_receiver = match (&request.stake_receiver, &receiver) {
        (Some(address), Some(stake)) if stake.voter().is_none() => Some(*address),
        _ => None,
    };

    let ctx = WithdrawContext {
        config,
        stake_pool_address: &request.stake_pool,
        stake_pool: &pool,
        validator_list: &validator_list,
        stake_rent,
        reserve_lamports,
        skip_fee: token_account_address == pool.manager_fee_account,
    };

    let withdraw_accounts = if request.use_reserve {
        vec![select_reserve(&ctx, request.pool_tokens)]
    } else if let Some(vote_account) = vote_account {
        let stake_address = validator_stake_address(&ctx, &vote_account)?;
        let stake_lamports = get_balance(client, &stake_address).await?;
        vec![select_explicit_validator(
            &ctx,
            &vote_account,
            stake_lamports,
            request.pool_tokens,
        )?]
    } else {
        select_withdraw_accounts(&ctx, request.pool_tokens)?
    };

    if direct_receiver.is_some() && withdraw_accounts.len() > 1 {
        return Err(StakePoolError::InvalidArgument(format!(
            "withdrawal spans {} stake accounts but a single undelegated receiver was given",
            withdraw_accounts.len()
        )));
    }

    let withdraw_authority =
        find_withdraw_authority_program_address(&config.program_id, &request.stake_pool)?;

    let mut plan = InstructionPlan::new(request.token_owner);
    plan.set_stake_receiver(request.stake_receiver);
    let transfer_authority = plan.add_signer(Keypair::new());
    plan.push(approve(
        &pool.token_program_id,
        &token_account_address,
        &transfer_authority,
        &request.token_owner,
        request.pool_tokens,
    ));

    for account in &withdraw_accounts {
        let stake_to_receive = match direct_receiver {
            Some(receiver) => receiver,
            None => {
                let stake_account = plan.add_signer(Keypair::new());
                plan.push(system_program::create_account(
                    &request.token_owner,
                    &stake_account,
                    stake_rent,
                    STAKE_ACCOUNT_LEN,
                    &STAKE_PROGRAM_ID,
                ));
                plan.add_new_stake_account(stake_account, stake_rent)?;
                stake_account
            }
        };

        log_withdraw(&pool, account)?;

        let accounts = WithdrawStakeAccounts {
            stake_pool: request.stake_pool,
            validator_list: pool.validator_list,
            withdraw_authority: withdraw_authority.address,
            stake_to_split: account.stake_address,
            stake_to_receive,
            user_stake_authority: request.token_owner,
            user_transfer_authority: transfer_authority,
            user_pool_token_account: token_account_address,
            manager_fee_account: pool.manager_fee_account,
            pool_mint: pool.pool_mint,
            token_program_id: pool.token_program_id,
        };
        let minimum_lamports_out = request
            .minimum_lamports_out
            .map(|minimum| split_minimum(minimum, account.pool_amount, request.pool_tokens));
        plan.push(instruction::withdraw_stake(
            &config.program_id,
            &accounts,
            account.pool_amount,
            minimum_lamports_out,
        )?);
    }

    Ok(plan)
}

/// Merge the stake accounts a withdrawal created into its delegated receiver.
///
/// Returns nothing to do when the plan withdrew straight into the receiver.
pub fn merge_into_receiver(
    plan: &InstructionPlan,
    stake_authority: &Pubkey,
) -> Result<Vec<Instruction>, StakePoolError> {
    let receiver = plan.stake_receiver().ok_or_else(|| {
        StakePoolError::InvalidArgument("plan has no stake receiver to merge into".into())
    })?;
    Ok(plan
        .new_stake_accounts()
        .iter()
        .map(|source| stake_program::merge(receiver, source, stake_authority))
        .collect())
}

/// A delegated receiver pins the validator; an explicit vote account must agree.
fn resolve_vote_account(
    requested: Option<Pubkey>,
    receiver: Option<&StakeAccount>,
) -> Result<Option<Pubkey>, StakePoolError> {
    if let Some(StakeAccount {
        state: StakeAccountState::RewardsPool,
        ..
    }) = receiver
    {
        return Err(StakePoolError::InvalidArgument(
            "stake receiver is a rewards pool account".into(),
        ));
    }

    let receiver_voter = receiver.and_then(StakeAccount::voter).copied();
    match (requested, receiver_voter) {
        (Some(requested), Some(voter)) if requested != voter => {
            Err(StakePoolError::InvalidArgument(format!(
                "stake receiver is delegated to {}, not {}",
                bytes_to_address(&voter),
                bytes_to_address(&requested)
            )))
        }
        (requested, voter) => Ok(requested.or(voter)),
    }
}

fn log_withdraw(pool: &StakePool, account: &WithdrawAccount) -> Result<(), StakePoolError> {
    let lamports = calc_lamports_withdraw_amount(pool, account.pool_amount)?;
    let delegated_to = match &account.vote_address {
        Some(vote) => bytes_to_address(vote),
        None => "the reserve".to_string(),
    };
    info!(
        "Withdrawing ◎{}, or {} pool tokens, from stake account {}, delegated to {}",
        format_lamports(lamports as i128),
        format_lamports(account.pool_amount as i128),
        bytes_to_address(&account.stake_address),
        delegated_to
    );
    Ok(())
}

/// Share of `minimum` owed by a withdrawal of `part` out of `total`, rounded down.
fn split_minimum(minimum: u64, part: u64, total: u64) -> u64 {
    if total == 0 {
        return minimum;
    }
    (minimum as u128 * part as u128 / total as u128) as u64
}

// ---------------------------------------------------------------------------
// Redelegation
// ---------------------------------------------------------------------------

/// Build a `Redelegate` signed by the pool's staker.
pub async fn redelegate<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    request: &RedelegateRequest,
) -> Result<InstructionPlan, StakePoolError> {
    if request.source_vote_account == request.destination_vote_account {
        return Err(StakePoolError::InvalidArgument(
            "source and destination validators are the same".into(),
        ));
    }
    if request.lamports == 0 {
        return Err(StakePoolError::InvalidArgument(
            "redelegation amount must be greater than zero".into(),
        ));
    }

    let pool = get_stake_pool_account(client, config, &request.stake_pool).await?;

    // Entries are only needed to fill in omitted transient seeds.
    let needs_list = request.source_transient_stake_seed.is_none()
        || request.destination_transient_stake_seed.is_none();
    let list = if needs_list {
        Some(get_validator_list_account(client, config, &pool.validator_list).await?)
    } else {
        None
    };
    let entries = match &list {
        Some(list) => Some((
            find_entry(&list.validators, &request.source_vote_account)?,
            find_entry(&list.validators, &request.destination_vote_account)?,
        )),
        None => None,
    };

    let args = RedelegateArgs {
        lamports: request.lamports,
        source_transient_stake_seed: match (request.source_transient_stake_seed, &entries) {
            (Some(seed), _) => seed,
            (None, Some((source, _))) => next_transient_seed(source)?,
            (None, None) => 0,
        },
        ephemeral_stake_seed: request.ephemeral_stake_seed.unwrap_or(0),
        destination_transient_stake_seed: match (request.destination_transient_stake_seed, &entries)
        {
            (Some(seed), _) => seed,
            (None, Some((_, destination))) if destination.transient_stake_lamports > 0 => {
                destination.transient_seed_suffix
            }
            (None, Some((_, destination))) => next_transient_seed(destination)?,
            (None, None) => 0,
        },
    };

    let program_id = &config.program_id;
    let pool_address = &request.stake_pool;
    let validator_seed = |entry: Option<&ValidatorStakeInfo>| {
        entry.and_then(|e| std::num::NonZeroU32::new(e.validator_seed_suffix))
    };
    let (source_entry, destination_entry) = match &entries {
        Some((source, destination)) => (Some(*source), Some(*destination)),
        None => (None, None),
    };

    let accounts = RedelegateAccounts {
        stake_pool: *pool_address,
        staker: pool.staker,
        withdraw_authority: find_withdraw_authority_program_address(program_id, pool_address)?
            .address,
        validator_list: pool.validator_list,
        source_validator_stake: find_stake_program_address(
            program_id,
            &request.source_vote_account,
            pool_address,
            validator_seed(source_entry),
        )?
        .address,
        source_transient_stake: find_transient_stake_program_address(
            program_id,
            &request.source_vote_account,
            pool_address,
            args.source_transient_stake_seed,
        )?
        .address,
        ephemeral_stake: find_ephemeral_stake_program_address(
            program_id,
            pool_address,
            args.ephemeral_stake_seed,
        )?
        .address,
        destination_transient_stake: find_transient_stake_program_address(
            program_id,
            &request.destination_vote_account,
            pool_address,
            args.destination_transient_stake_seed,
        )?
        .address,
        destination_validator_stake: find_stake_program_address(
            program_id,
            &request.destination_vote_account,
            pool_address,
            validator_seed(destination_entry),
        )?
        .address,
        destination_vote_account: request.destination_vote_account,
    };

    let mut plan = InstructionPlan::new(pool.staker);
    plan.push(instruction::redelegate(program_id, &accounts, args)?);

    debug!(
        "redelegating ◎{} from {} to {} (seeds {}/{}/{})",
        format_lamports(request.lamports as i128),
        bytes_to_address(&request.source_vote_account),
        bytes_to_address(&request.destination_vote_account),
        args.source_transient_stake_seed,
        args.ephemeral_stake_seed,
        args.destination_transient_stake_seed
    );
    Ok(plan)
}

fn find_entry<'a>(
    validators: &'a [ValidatorStakeInfo],
    vote_account: &Pubkey,
) -> Result<&'a ValidatorStakeInfo, StakePoolError> {
    validators
        .iter()
        .find(|v| &v.vote_account_address == vote_account)
        .ok_or_else(|| {
            StakePoolError::ValidatorNotFound(format!(
                "vote account {} is not in the validator list",
                bytes_to_address(vote_account)
            ))
        })
}

fn next_transient_seed(entry: &ValidatorStakeInfo) -> Result<u64, StakePoolError> {
    entry
        .transient_seed_suffix
        .checked_add(1)
        .ok_or(StakePoolError::ArithmeticOverflow)
}

// ---------------------------------------------------------------------------
// Token metadata
// ---------------------------------------------------------------------------

/// Create the pool token's metadata account. `payer` funds the account and
/// pays the fee; the pool manager must sign.
pub async fn create_pool_token_metadata<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    request: &TokenMetadataRequest,
    payer: &Pubkey,
) -> Result<InstructionPlan, StakePoolError> {
    check_metadata_lengths(&request.name, &request.symbol, &request.uri)?;
    let pool = get_stake_pool_account(client, config, &request.stake_pool).await?;
    let accounts = metadata_accounts(config, &request.stake_pool, &pool)?;

    let mut plan = InstructionPlan::new(*payer);
    plan.push(instruction::create_token_metadata(
        &config.program_id,
        &accounts,
        payer,
        request.name.clone(),
        request.symbol.clone(),
        request.uri.clone(),
    )?);
    Ok(plan)
}

/// Update the pool token's metadata. The pool manager signs and pays.
pub async fn update_pool_token_metadata<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    request: &TokenMetadataRequest,
) -> Result<InstructionPlan, StakePoolError> {
    check_metadata_lengths(&request.name, &request.symbol, &request.uri)?;
    let pool = get_stake_pool_account(client, config, &request.stake_pool).await?;
    let accounts = metadata_accounts(config, &request.stake_pool, &pool)?;

    let mut plan = InstructionPlan::new(pool.manager);
    plan.push(instruction::update_token_metadata(
        &config.program_id,
        &accounts,
        request.name.clone(),
        request.symbol.clone(),
        request.uri.clone(),
    )?);
    Ok(plan)
}

fn metadata_accounts(
    config: &ClientConfig,
    stake_pool: &Pubkey,
    pool: &StakePool,
) -> Result<TokenMetadataAccounts, StakePoolError> {
    Ok(TokenMetadataAccounts {
        stake_pool: *stake_pool,
        manager: pool.manager,
        withdraw_authority: find_withdraw_authority_program_address(&config.program_id, stake_pool)?
            .address,
        pool_mint: pool.pool_mint,
        token_metadata: find_metadata_account(&config.token_metadata_program_id, &pool.pool_mint)?
            .address,
        metadata_program_id: config.token_metadata_program_id,
    })
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

async fn payer_reserve<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
) -> Result<u64, StakePoolError> {
    match config.payer_reserve {
        PayerReserve::None => Ok(0),
        PayerReserve::RentExempt => get_minimum_balance_for_rent_exemption(client, 0).await,
    }
}

/// The wallet's associated account for the pool mint, under the mint's own
/// token program.
fn associated_token_address(
    config: &ClientConfig,
    pool: &StakePool,
    wallet: &Pubkey,
) -> Result<Pubkey, StakePoolError> {
    Ok(derive_associated_token_address_with_programs(
        wallet,
        &pool.pool_mint,
        &pool.token_program_id,
        &config.associated_token_program_id,
    )?)
}

fn pool_token_account_address(
    config: &ClientConfig,
    pool: &StakePool,
    owner: &Pubkey,
    explicit: Option<Pubkey>,
) -> Result<Pubkey, StakePoolError> {
    match explicit {
        Some(address) => Ok(address),
        None => associated_token_address(config, pool, owner),
    }
}

fn check_nonzero(amount: u64, what: &str) -> Result<(), StakePoolError> {
    if amount == 0 {
        return Err(StakePoolError::InvalidArgument(format!(
            "{what} must be greater than zero"
        )));
    }
    Ok(())
}

fn check_pool_mint(token_account: &TokenAccount, pool: &StakePool) -> Result<(), StakePoolError> {
    if token_account.mint != pool.pool_mint {
        return Err(StakePoolError::InvalidArgument(format!(
            "token account holds mint {}, pool mint is {}",
            bytes_to_address(&token_account.mint),
            bytes_to_address(&pool.pool_mint)
        )));
    }
    Ok(())
}

fn check_authority(
    kind: &str,
    supplied: &Pubkey,
    expected: Option<&Pubkey>,
) -> Result<(), StakePoolError> {
    match expected {
        None => Err(StakePoolError::InvalidArgument(format!(
            "{kind} authority given but the pool has none"
        ))),
        Some(expected) if expected != supplied => Err(StakePoolError::InvalidArgument(format!(
            "invalid {kind} authority: expected {}, got {}",
            bytes_to_address(expected),
            bytes_to_address(supplied)
        ))),
        Some(_) => Ok(()),
    }
}
