//! Signing identities.
//!
//! Callers plug their own key custody in through [`Signer`]; the composer only
//! ever asks a signer for its public key. [`Keypair`] is the in-memory
//! implementation used for the throwaway accounts a transaction creates.

use std::fmt;

use ed25519_dalek::Signer as _;
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::address::{bytes_to_address, Pubkey};
use crate::error::SolError;

/// Something able to authorize a transaction message.
pub trait Signer {
    /// Public identity of this signer.
    fn pubkey(&self) -> Pubkey;

    /// Produce an Ed25519 signature over `message`.
    fn try_sign_message(&self, message: &[u8]) -> Result<[u8; 64], SolError>;
}

/// Ed25519 keypair held in memory. The secret is wiped on drop.
pub struct Keypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair from the OS RNG.
    pub fn new() -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut OsRng),
        }
    }

    /// Rebuild a keypair from its 32-byte secret seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut copy = *seed;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&copy);
        copy.zeroize();
        Self { signing_key }
    }
}

impl Default for Keypair {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer for Keypair {
    fn pubkey(&self) -> Pubkey {
        self.signing_key.verifying_key().to_bytes()
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<[u8; 64], SolError> {
        Ok(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &bytes_to_address(&self.pubkey()))
            .finish_non_exhaustive()
    }
}
