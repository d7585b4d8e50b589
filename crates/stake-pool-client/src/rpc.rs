//! Network collaborator interface.
//!
//! The engine never talks to a node directly: callers hand in something
//! implementing [`ProgramClient`] (an RPC client, a test bank, an in-memory
//! mock). Errors are boxed and passed through untouched.

use async_trait::async_trait;
use sol_primitives::Pubkey;

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;
pub type ClientResult<T> = Result<T, ClientError>;

/// Raw account as returned by `getAccountInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub lamports: u64,
    pub data: Vec<u8>,
    pub owner: Pubkey,
    pub executable: bool,
}

/// Account as returned by `getParsedAccountInfo`. Only stake accounts are
/// understood; anything else is reported by owning program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAccount {
    Stake(StakeAccount),
    Other { program: String },
}

/// A parsed stake account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeAccount {
    pub lamports: u64,
    pub state: StakeAccountState,
}

impl StakeAccount {
    /// Vote account the stake is delegated to, if any.
    pub fn voter(&self) -> Option<&Pubkey> {
        match &self.state {
            StakeAccountState::Delegated { delegation, .. } => Some(&delegation.voter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeAccountState {
    Uninitialized,
    Initialized(StakeMeta),
    Delegated {
        meta: StakeMeta,
        delegation: Delegation,
    },
    RewardsPool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakeMeta {
    pub rent_exempt_reserve: u64,
    pub staker: Pubkey,
    pub withdrawer: Pubkey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delegation {
    pub voter: Pubkey,
    pub stake: u64,
    pub activation_epoch: u64,
    pub deactivation_epoch: u64,
}

/// Point-in-time reads the engine needs from the ledger.
#[async_trait]
pub trait ProgramClient: Send + Sync {
    async fn get_account_info(&self, address: &Pubkey) -> ClientResult<Option<Account>>;

    async fn get_parsed_account_info(&self, address: &Pubkey)
        -> ClientResult<Option<ParsedAccount>>;

    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64>;

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voter_only_for_delegated_stake() {
        let meta = StakeMeta::default();
        let delegated = StakeAccount {
            lamports: 10,
            state: StakeAccountState::Delegated {
                meta,
                delegation: Delegation {
                    voter: [7; 32],
                    ..Delegation::default()
                },
            },
        };
        assert_eq!(delegated.voter(), Some(&[7; 32]));

        let initialized = StakeAccount {
            lamports: 10,
            state: StakeAccountState::Initialized(meta),
        };
        assert_eq!(initialized.voter(), None);
    }
}
