//! System Program instruction builders.
//!
//! System instructions are tagged with a little-endian `u32` index.

use crate::address::Pubkey;
use crate::program_ids::SYSTEM_PROGRAM_ID;
use crate::transaction::{AccountMeta, Instruction};

const CREATE_ACCOUNT_IX_INDEX: u32 = 0;
const TRANSFER_IX_INDEX: u32 = 2;

/// Build a `Transfer` moving `lamports` from `from` to `to`.
///
/// Data: u32 LE index (2) + u64 LE lamports = 12 bytes.
pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

/// Build a `CreateAccount` funding `new_account` with `lamports`, allocating
/// `space` bytes and assigning it to `owner`.
///
/// Data: u32 LE index (0) + u64 lamports + u64 space + owner = 52 bytes.
/// Both the funder and the new account must sign.
pub fn create_account(
    from: &Pubkey,
    new_account: &Pubkey,
    lamports: u64,
    space: u64,
    owner: &Pubkey,
) -> Instruction {
    let mut data = Vec::with_capacity(52);
    data.extend_from_slice(&CREATE_ACCOUNT_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner);

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*from, true),
            AccountMeta::new(*new_account, true),
        ],
        data,
    }
}
