//! Program Derived Address (PDA) search.
//!
//! A PDA is `SHA-256(seed_0 || ... || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")` for the highest bump in `255..=0` whose hash is
//! NOT a valid Ed25519 point, so no private key can exist for it.

use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::SolError;

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Find the canonical PDA for `seeds` under `program_id`.
///
/// Returns the address and the bump seed that produced it.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    check_seeds(seeds, 1)?;

    for bump in (0u8..=255).rev() {
        if let Some(address) = try_create_program_address(seeds, &[bump], program_id) {
            return Ok((address, bump));
        }
    }

    Err(SolError::InvalidSeeds(
        "could not find valid PDA bump seed".into(),
    ))
}

/// Create a PDA from seeds that already include the bump.
///
/// Fails if the resulting hash lands on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, SolError> {
    check_seeds(seeds, 0)?;
    try_create_program_address(seeds, &[], program_id)
        .ok_or_else(|| SolError::InvalidSeeds("derived address lies on the ed25519 curve".into()))
}

fn check_seeds(seeds: &[&[u8]], extra: usize) -> Result<(), SolError> {
    if seeds.len() + extra > MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "at most {MAX_SEEDS} seeds allowed, got {}",
            seeds.len() + extra
        )));
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(SolError::InvalidSeeds(format!(
            "seed of {} bytes exceeds {MAX_SEED_LEN}",
            seed.len()
        )));
    }
    Ok(())
}

fn try_create_program_address(
    seeds: &[&[u8]],
    bump_seed: &[u8],
    program_id: &Pubkey,
) -> Option<Pubkey> {
    let mut hasher = Sha256::new();

    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(bump_seed);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: Pubkey = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }

    Some(hash)
}

/// Check if 32 bytes decompress to a valid Ed25519 curve point.
pub fn is_on_curve(bytes: &Pubkey) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
