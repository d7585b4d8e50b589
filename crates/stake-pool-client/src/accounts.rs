//! Fetch-and-decode helpers over a [`ProgramClient`].
//!
//! Collaborator failures are wrapped with the operation and address and
//! returned as-is; missing accounts and wrong owners are mapped into
//! [`StakePoolError`].

use log::debug;
use sol_primitives::{bytes_to_address, Pubkey, TokenAccount};

use crate::config::ClientConfig;
use crate::error::StakePoolError;
use crate::rpc::{Account, ParsedAccount, ProgramClient, StakeAccount};
use crate::state::{StakePool, ValidatorList};

/// Fetch raw account data, `None` when the account does not exist.
pub async fn get_account_info<C: ProgramClient + ?Sized>(
    client: &C,
    address: &Pubkey,
) -> Result<Option<Account>, StakePoolError> {
    client
        .get_account_info(address)
        .await
        .map_err(|source| StakePoolError::Collaborator {
            operation: "get_account_info",
            address: bytes_to_address(address),
            source,
        })
}

async fn fetch_existing<C: ProgramClient + ?Sized>(
    client: &C,
    address: &Pubkey,
    what: &'static str,
) -> Result<Account, StakePoolError> {
    get_account_info(client, address)
        .await?
        .ok_or_else(|| StakePoolError::AccountNotFound {
            what,
            address: bytes_to_address(address),
        })
}

fn check_owner(account: &Account, expected: &Pubkey, what: &str) -> Result<(), StakePoolError> {
    if account.owner != *expected {
        return Err(StakePoolError::AccountDecodeError(format!(
            "{what} is owned by {}, expected {}",
            bytes_to_address(&account.owner),
            bytes_to_address(expected)
        )));
    }
    Ok(())
}

/// Fetch and decode the stake pool at `address`.
pub async fn get_stake_pool_account<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    address: &Pubkey,
) -> Result<StakePool, StakePoolError> {
    let account = fetch_existing(client, address, "stake pool").await?;
    check_owner(&account, &config.program_id, "stake pool")?;
    let pool = StakePool::unpack(&account.data)?;
    debug!(
        "stake pool {}: {} lamports, {} pool tokens",
        bytes_to_address(address),
        pool.total_lamports,
        pool.pool_token_supply
    );
    Ok(pool)
}

/// Fetch and decode the validator list at `address`.
pub async fn get_validator_list_account<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    address: &Pubkey,
) -> Result<ValidatorList, StakePoolError> {
    let account = fetch_existing(client, address, "validator list").await?;
    check_owner(&account, &config.program_id, "validator list")?;
    let list = ValidatorList::unpack(&account.data)?;
    debug!(
        "validator list {}: {} validators",
        bytes_to_address(address),
        list.validators.len()
    );
    Ok(list)
}

/// Fetch and decode a token account owned by the configured token program.
pub async fn get_token_account<C: ProgramClient + ?Sized>(
    client: &C,
    config: &ClientConfig,
    address: &Pubkey,
) -> Result<TokenAccount, StakePoolError> {
    fetch_token_account(client, &config.token_program_id, address).await
}

/// Fetch and decode a token account for `pool`'s mint. The account must be
/// owned by the token program the pool records for its mint.
pub async fn get_pool_token_account<C: ProgramClient + ?Sized>(
    client: &C,
    pool: &StakePool,
    address: &Pubkey,
) -> Result<TokenAccount, StakePoolError> {
    fetch_token_account(client, &pool.token_program_id, address).await
}

async fn fetch_token_account<C: ProgramClient + ?Sized>(
    client: &C,
    token_program_id: &Pubkey,
    address: &Pubkey,
) -> Result<TokenAccount, StakePoolError> {
    let account = fetch_existing(client, address, "token").await?;
    check_owner(&account, token_program_id, "token account")?;
    TokenAccount::unpack(&account.data)
        .map_err(|e| StakePoolError::AccountDecodeError(format!("token account: {e}")))
}

/// Fetch a stake account through the parsed-account endpoint.
pub async fn get_stake_account<C: ProgramClient + ?Sized>(
    client: &C,
    address: &Pubkey,
) -> Result<StakeAccount, StakePoolError> {
    let parsed = client
        .get_parsed_account_info(address)
        .await
        .map_err(|source| StakePoolError::Collaborator {
            operation: "get_parsed_account_info",
            address: bytes_to_address(address),
            source,
        })?
        .ok_or_else(|| StakePoolError::AccountNotFound {
            what: "stake",
            address: bytes_to_address(address),
        })?;

    match parsed {
        ParsedAccount::Stake(stake) => Ok(stake),
        ParsedAccount::Other { program } => Err(StakePoolError::AccountDecodeError(format!(
            "{} is a {program} account, not a stake account",
            bytes_to_address(address)
        ))),
    }
}

/// Lamport balance of `address`.
pub async fn get_balance<C: ProgramClient + ?Sized>(
    client: &C,
    address: &Pubkey,
) -> Result<u64, StakePoolError> {
    client
        .get_balance(address)
        .await
        .map_err(|source| StakePoolError::Collaborator {
            operation: "get_balance",
            address: bytes_to_address(address),
            source,
        })
}

/// Rent-exempt minimum for an account of `data_len` bytes.
pub async fn get_minimum_balance_for_rent_exemption<C: ProgramClient + ?Sized>(
    client: &C,
    data_len: usize,
) -> Result<u64, StakePoolError> {
    client
        .get_minimum_balance_for_rent_exemption(data_len)
        .await
        .map_err(|source| StakePoolError::Collaborator {
            operation: "get_minimum_balance_for_rent_exemption",
            address: format!("<{data_len} bytes>"),
            source,
        })
}
