//! SPL Token and Associated Token Account support.
//!
//! Instruction builders, associated token account (ATA) derivation, and a
//! decoder for the fixed 165-byte token account layout, without pulling in
//! the `spl-token` crates.

use crate::address::Pubkey;
use crate::error::SolError;
use crate::pda::find_program_address;
use crate::program_ids::{ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::transaction::{AccountMeta, Instruction};

/// Size of a token account.
pub const TOKEN_ACCOUNT_LEN: usize = 165;

/// SPL Token `Approve` instruction index.
const APPROVE_IX_INDEX: u8 = 4;

/// Associated Token Account `CreateIdempotent` instruction index.
const ATA_CREATE_IDEMPOTENT_IX_INDEX: u8 = 1;

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// Build an SPL Token `Approve` instruction letting `delegate` move up to
/// `amount` base units out of `source`.
///
/// Data: [4] + u64 LE amount = 9 bytes.
pub fn approve(
    token_program_id: &Pubkey,
    source: &Pubkey,
    delegate: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Instruction {
    let mut data = Vec::with_capacity(9);
    data.push(APPROVE_IX_INDEX);
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: *token_program_id,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*delegate, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data,
    }
}

/// Build an ATA `CreateIdempotent` instruction. Succeeds on-chain whether or
/// not the account already exists.
pub fn create_associated_token_account_idempotent(
    associated_token_program_id: &Pubkey,
    payer: &Pubkey,
    associated_account: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program_id: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *associated_token_program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*associated_account, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(*token_program_id, false),
        ],
        data: vec![ATA_CREATE_IDEMPOTENT_IX_INDEX],
    }
}

// ---------------------------------------------------------------------------
// Associated Token Account (PDA) derivation
// ---------------------------------------------------------------------------

/// Derive the associated token account address for a wallet + mint pair.
///
/// Seeds: `[wallet, token_program_id, mint]` under the ATA program.
pub fn derive_associated_token_address(
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Result<Pubkey, SolError> {
    derive_associated_token_address_with_programs(
        wallet,
        mint,
        &TOKEN_PROGRAM_ID,
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
}

/// Same as [`derive_associated_token_address`] for non-default token and
/// associated token programs.
pub fn derive_associated_token_address_with_programs(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program_id: &Pubkey,
    associated_token_program_id: &Pubkey,
) -> Result<Pubkey, SolError> {
    find_program_address(
        &[wallet.as_ref(), token_program_id.as_ref(), mint.as_ref()],
        associated_token_program_id,
    )
    .map(|(address, _bump)| address)
}

// ---------------------------------------------------------------------------
// Account state
// ---------------------------------------------------------------------------

/// The fields of a token account the stake pool client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

impl TokenAccount {
    /// Decode the fixed token account layout:
    /// mint (0..32), owner (32..64), amount (64..72), ..., state (108).
    pub fn unpack(data: &[u8]) -> Result<Self, SolError> {
        if data.len() < TOKEN_ACCOUNT_LEN {
            return Err(SolError::SerializationError(format!(
                "token account data is {} bytes, expected at least {TOKEN_ACCOUNT_LEN}",
                data.len()
            )));
        }
        if data[108] == 0 {
            return Err(SolError::SerializationError(
                "token account is not initialized".into(),
            ));
        }

        let mut mint = [0u8; 32];
        mint.copy_from_slice(&data[0..32]);
        let mut owner = [0u8; 32];
        owner.copy_from_slice(&data[32..64]);
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&data[64..72]);

        Ok(Self {
            mint,
            owner,
            amount: u64::from_le_bytes(amount),
        })
    }

    /// Encode into a zero-padded, initialized token account buffer.
    pub fn pack(&self) -> Vec<u8> {
        let mut data = vec![0u8; TOKEN_ACCOUNT_LEN];
        data[0..32].copy_from_slice(&self.mint);
        data[32..64].copy_from_slice(&self.owner);
        data[64..72].copy_from_slice(&self.amount.to_le_bytes());
        data[108] = 1;
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;
    use crate::pda::is_on_curve;

    #[test]
    fn approve_encoding_and_roles() {
        let ix = approve(&TOKEN_PROGRAM_ID, &[1u8; 32], &[2u8; 32], &[3u8; 32], 500_000);

        assert_eq!(ix.program_id, TOKEN_PROGRAM_ID);
        assert_eq!(ix.data[0], 4);
        assert_eq!(&ix.data[1..], &500_000u64.to_le_bytes());

        assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);
        assert!(!ix.accounts[1].is_writable && !ix.accounts[1].is_signer);
        assert!(!ix.accounts[2].is_writable && ix.accounts[2].is_signer);
    }

    #[test]
    fn create_ata_idempotent_layout() {
        let payer = [1u8; 32];
        let ata = [2u8; 32];
        let ix = create_associated_token_account_idempotent(
            &ASSOCIATED_TOKEN_PROGRAM_ID,
            &payer,
            &ata,
            &[3u8; 32],
            &[4u8; 32],
            &TOKEN_PROGRAM_ID,
        );
        assert_eq!(ix.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
        assert_eq!(ix.data, vec![1]);
        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(ix.accounts[0], AccountMeta::new(payer, true));
        assert_eq!(ix.accounts[1], AccountMeta::new(ata, false));
    }

    #[test]
    fn ata_is_off_curve_and_deterministic() {
        let wallet = [0xAAu8; 32];
        let mint = [0xBBu8; 32];

        let a = derive_associated_token_address(&wallet, &mint).unwrap();
        let b = derive_associated_token_address(&wallet, &mint).unwrap();
        assert_eq!(a, b);
        assert!(!is_on_curve(&a));
    }

    #[test]
    fn ata_differs_per_wallet_and_mint() {
        let mint = [0xFFu8; 32];
        let a = derive_associated_token_address(&[1u8; 32], &mint).unwrap();
        let b = derive_associated_token_address(&[2u8; 32], &mint).unwrap();
        let c = derive_associated_token_address(&[1u8; 32], &[0xFEu8; 32]).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn derive_ata_for_usdc_mint() {
        let usdc_mint =
            address::address_to_bytes("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        let ata = derive_associated_token_address(&[0x42u8; 32], &usdc_mint).unwrap();
        assert!(address::validate_address(&address::bytes_to_address(&ata)).is_ok());
    }

    #[test]
    fn token_account_pack_unpack() {
        let account = TokenAccount {
            mint: [1u8; 32],
            owner: [2u8; 32],
            amount: 2_000_000_000,
        };
        assert_eq!(TokenAccount::unpack(&account.pack()).unwrap(), account);
    }

    #[test]
    fn token_account_short_data_fails() {
        assert!(TokenAccount::unpack(&[0u8; 100]).is_err());
    }

    #[test]
    fn token_account_uninitialized_fails() {
        let err = TokenAccount::unpack(&[0u8; TOKEN_ACCOUNT_LEN]).unwrap_err();
        assert!(err.to_string().contains("not initialized"));
    }
}
