//! Well-known native program and sysvar ids.

use crate::address::{const_address, Pubkey};

/// System Program: `11111111111111111111111111111111` (32 zero bytes).
pub const SYSTEM_PROGRAM_ID: Pubkey = [0u8; 32];

/// SPL Token Program.
pub const TOKEN_PROGRAM_ID: Pubkey = const_address("Token4Q2B47VCdUy8u3rSTMMk2bGA1k7eN8qfKSzdiM");

/// SPL Token 2022 Program. Pool mints may live under either token program.
pub const TOKEN_2022_PROGRAM_ID: Pubkey =
    const_address("Token8N5ecJeFxL83iFa2h7AgJ8AtufM7bbg63LrW89");

/// Associated Token Account Program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    const_address("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Native Stake Program.
pub const STAKE_PROGRAM_ID: Pubkey = const_address("Stake11111111111111111111111111111111111111");

/// Stake config account read by delegation instructions.
pub const STAKE_CONFIG_ID: Pubkey = const_address("StakeConfig11111111111111111111111111111111");

/// Clock sysvar.
pub const SYSVAR_CLOCK_ID: Pubkey = const_address("SysvarC1ock11111111111111111111111111111111");

/// Stake history sysvar.
pub const SYSVAR_STAKE_HISTORY_ID: Pubkey =
    const_address("SysvarStakeHistory1111111111111111111111111");

/// Token metadata program (pool token name/symbol/uri records).
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    const_address("Meta88XpDHcSJZDFiHop6c9sXaufkZX5depkZyrYBWv");
