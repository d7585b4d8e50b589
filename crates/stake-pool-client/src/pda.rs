//! Addresses derived from the stake pool program.
//!
//! Every function here is a pure function of its inputs: the same pool,
//! validator and seed always give the same address.

use std::num::NonZeroU32;

use sol_primitives::{find_program_address, Pubkey};

use crate::error::StakePoolError;

const AUTHORITY_WITHDRAW: &[u8] = b"withdraw";
const AUTHORITY_DEPOSIT: &[u8] = b"deposit";
const TRANSIENT_STAKE_SEED_PREFIX: &[u8] = b"transient";
const EPHEMERAL_STAKE_SEED_PREFIX: &[u8] = b"ephemeral";
const METADATA_SEED_PREFIX: &[u8] = b"metadata";

/// A program-derived address together with what produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub seeds: Vec<Vec<u8>>,
    pub program_id: Pubkey,
    pub address: Pubkey,
    pub bump: u8,
}

impl DerivedAddress {
    /// Search for the canonical address of `seeds` under `program_id`.
    pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Self, StakePoolError> {
        let (address, bump) = find_program_address(seeds, program_id)?;
        Ok(Self {
            seeds: seeds.iter().map(|s| s.to_vec()).collect(),
            program_id: *program_id,
            address,
            bump,
        })
    }
}

/// Authority allowed to move stake and mint pool tokens: `[pool, "withdraw"]`.
pub fn find_withdraw_authority_program_address(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
) -> Result<DerivedAddress, StakePoolError> {
    DerivedAddress::derive(&[stake_pool, AUTHORITY_WITHDRAW], program_id)
}

/// Default stake deposit authority: `[pool, "deposit"]`.
pub fn find_deposit_authority_program_address(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
) -> Result<DerivedAddress, StakePoolError> {
    DerivedAddress::derive(&[stake_pool, AUTHORITY_DEPOSIT], program_id)
}

/// Canonical stake account the pool holds for a validator:
/// `[vote, pool, seed?]`, the seed omitted when absent.
pub fn find_stake_program_address(
    program_id: &Pubkey,
    vote_account: &Pubkey,
    stake_pool: &Pubkey,
    seed: Option<NonZeroU32>,
) -> Result<DerivedAddress, StakePoolError> {
    let seed = seed.map(|s| s.get().to_le_bytes());
    let mut seeds: Vec<&[u8]> = vec![vote_account.as_slice(), stake_pool.as_slice()];
    if let Some(seed) = &seed {
        seeds.push(seed);
    }
    DerivedAddress::derive(&seeds, program_id)
}

/// Transient stake account for a validator:
/// `["transient", vote, pool, seed as u64 LE]`.
pub fn find_transient_stake_program_address(
    program_id: &Pubkey,
    vote_account: &Pubkey,
    stake_pool: &Pubkey,
    seed: u64,
) -> Result<DerivedAddress, StakePoolError> {
    DerivedAddress::derive(
        &[
            TRANSIENT_STAKE_SEED_PREFIX,
            vote_account,
            stake_pool,
            &seed.to_le_bytes(),
        ],
        program_id,
    )
}

/// Ephemeral stake account used inside a single redelegation:
/// `["ephemeral", pool, seed as u64 LE]`.
pub fn find_ephemeral_stake_program_address(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    seed: u64,
) -> Result<DerivedAddress, StakePoolError> {
    DerivedAddress::derive(
        &[EPHEMERAL_STAKE_SEED_PREFIX, stake_pool, &seed.to_le_bytes()],
        program_id,
    )
}

/// Token metadata account of a mint:
/// `["metadata", metadata_program, mint]` under the metadata program.
pub fn find_metadata_account(
    metadata_program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<DerivedAddress, StakePoolError> {
    DerivedAddress::derive(
        &[METADATA_SEED_PREFIX, metadata_program_id, mint],
        metadata_program_id,
    )
}
