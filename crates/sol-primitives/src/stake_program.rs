//! Native Stake Program helpers.

use crate::address::Pubkey;
use crate::program_ids::{STAKE_PROGRAM_ID, SYSVAR_CLOCK_ID, SYSVAR_STAKE_HISTORY_ID};
use crate::transaction::{AccountMeta, Instruction};

/// Size of a stake account (`StakeStateV2`).
pub const STAKE_ACCOUNT_LEN: u64 = 200;

const MERGE_IX_INDEX: u32 = 7;

/// Build a `Merge` folding `source` into `destination`.
///
/// Both accounts must share the same stake authority and be in a mergeable
/// activation state; the source is drained and closed on success.
pub fn merge(destination: &Pubkey, source: &Pubkey, authorized: &Pubkey) -> Instruction {
    Instruction {
        program_id: STAKE_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*destination, false),
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(SYSVAR_CLOCK_ID, false),
            AccountMeta::new_readonly(SYSVAR_STAKE_HISTORY_ID, false),
            AccountMeta::new_readonly(*authorized, true),
        ],
        data: MERGE_IX_INDEX.to_le_bytes().to_vec(),
    }
}
