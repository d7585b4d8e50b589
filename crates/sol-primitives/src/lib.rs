//! Solana ledger primitives for the stake pool client.
//!
//! This crate handles Base58 addresses, program-derived-address search,
//! Ed25519 keypairs, the compact transaction wire format, and builders for
//! the native programs stake pool transactions compose with (system, SPL
//! token, associated token account, stake). It does all of this without
//! pulling in `solana-sdk`.
//!
//! The wire format is implemented by hand, using `ed25519-dalek` for signing,
//! `curve25519-dalek` for the off-curve check and `bs58` for Base58.

pub mod address;
pub mod error;
pub mod keypair;
pub mod pda;
pub mod program_ids;
pub mod spl_token;
pub mod stake_program;
pub mod system_program;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{address_to_bytes, bytes_to_address, const_address, validate_address, Pubkey};
pub use error::SolError;
pub use keypair::{Keypair, Signer};
pub use pda::{create_program_address, find_program_address, is_on_curve};
pub use spl_token::{derive_associated_token_address, TokenAccount, TOKEN_ACCOUNT_LEN};
pub use stake_program::STAKE_ACCOUNT_LEN;
pub use transaction::{
    compile_transaction, decode_compact_u16, encode_compact_u16, serialize_message,
    sign_transaction, AccountMeta, CompiledInstruction, Instruction, Transaction,
};
