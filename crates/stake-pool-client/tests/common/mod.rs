//! In-memory ledger standing in for an RPC node.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use sol_primitives::program_ids::{STAKE_PROGRAM_ID, TOKEN_PROGRAM_ID};
use sol_primitives::{derive_associated_token_address, Pubkey, TokenAccount};
use stake_pool_client::rpc::{ClientResult, Delegation, StakeMeta};
use stake_pool_client::state::{AccountType, ValidatorListHeader};
use stake_pool_client::{
    Account, ParsedAccount, ProgramClient, StakeAccount, StakeAccountState, StakePool,
    ValidatorList, ValidatorStakeInfo, LAMPORTS_PER_SOL, STAKE_POOL_PROGRAM_ID,
};

pub const SOL: u64 = LAMPORTS_PER_SOL;
/// Rent-exempt minimum the mock reports for every size.
pub const RENT: u64 = 10_000;

pub const POOL: Pubkey = [0x50; 32];
pub const VALIDATOR_LIST: Pubkey = [0x51; 32];
pub const RESERVE: Pubkey = [0x52; 32];
pub const MINT: Pubkey = [0x53; 32];
pub const MANAGER_FEE: Pubkey = [0x54; 32];
pub const MANAGER: Pubkey = [0x55; 32];
pub const STAKER: Pubkey = [0x56; 32];
pub const OWNER: Pubkey = [0x57; 32];

pub const VOTE_A: Pubkey = [0x71; 32];
pub const VOTE_B: Pubkey = [0x72; 32];
pub const VOTE_C: Pubkey = [0x73; 32];

/// 100 SOL pool at a 1:1 exchange rate, no fees.
pub fn stake_pool() -> StakePool {
    StakePool {
        account_type: AccountType::StakePool,
        manager: MANAGER,
        staker: STAKER,
        validator_list: VALIDATOR_LIST,
        reserve_stake: RESERVE,
        pool_mint: MINT,
        manager_fee_account: MANAGER_FEE,
        token_program_id: TOKEN_PROGRAM_ID,
        total_lamports: 100 * SOL,
        pool_token_supply: 100 * SOL,
        ..StakePool::default()
    }
}

pub fn validator(vote: Pubkey, active: u64, transient: u64) -> ValidatorStakeInfo {
    ValidatorStakeInfo {
        active_stake_lamports: active,
        transient_stake_lamports: transient,
        vote_account_address: vote,
        ..ValidatorStakeInfo::default()
    }
}

pub fn validator_list(validators: Vec<ValidatorStakeInfo>) -> ValidatorList {
    ValidatorList {
        header: ValidatorListHeader {
            account_type: AccountType::ValidatorList,
            max_validators: 10,
        },
        validators,
    }
}

pub fn owner_token_account() -> Pubkey {
    derive_associated_token_address(&OWNER, &MINT).unwrap()
}

pub fn delegated_stake(voter: Pubkey, lamports: u64) -> StakeAccount {
    StakeAccount {
        lamports,
        state: StakeAccountState::Delegated {
            meta: StakeMeta {
                rent_exempt_reserve: RENT,
                staker: OWNER,
                withdrawer: OWNER,
            },
            delegation: Delegation {
                voter,
                stake: lamports - RENT,
                activation_epoch: 1,
                deactivation_epoch: u64::MAX,
            },
        },
    }
}

pub fn initialized_stake(lamports: u64) -> StakeAccount {
    StakeAccount {
        lamports,
        state: StakeAccountState::Initialized(StakeMeta {
            rent_exempt_reserve: RENT,
            staker: OWNER,
            withdrawer: OWNER,
        }),
    }
}

#[derive(Default)]
pub struct MockClient {
    accounts: HashMap<Pubkey, Account>,
    parsed: HashMap<Pubkey, ParsedAccount>,
    balances: HashMap<Pubkey, u64>,
    failing: HashSet<Pubkey>,
    calls: Mutex<Vec<(&'static str, Pubkey)>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool, list and reserve for the standard fixture.
    pub fn with_pool(self, pool: &StakePool, list: &ValidatorList) -> Self {
        self.with_account(
            POOL,
            Account {
                lamports: RENT,
                data: borsh::to_vec(pool).unwrap(),
                owner: STAKE_POOL_PROGRAM_ID,
                executable: false,
            },
        )
        .with_account(
            VALIDATOR_LIST,
            Account {
                lamports: RENT,
                data: borsh::to_vec(list).unwrap(),
                owner: STAKE_POOL_PROGRAM_ID,
                executable: false,
            },
        )
    }

    pub fn with_account(mut self, address: Pubkey, account: Account) -> Self {
        self.accounts.insert(address, account);
        self
    }

    pub fn with_token_account(self, address: Pubkey, owner: Pubkey, amount: u64) -> Self {
        self.with_token_account_under(TOKEN_PROGRAM_ID, address, owner, amount)
    }

    pub fn with_token_account_under(
        self,
        token_program_id: Pubkey,
        address: Pubkey,
        owner: Pubkey,
        amount: u64,
    ) -> Self {
        let data = TokenAccount {
            mint: MINT,
            owner,
            amount,
        }
        .pack();
        self.with_account(
            address,
            Account {
                lamports: RENT,
                data,
                owner: token_program_id,
                executable: false,
            },
        )
    }

    pub fn with_stake_account(mut self, address: Pubkey, stake: StakeAccount) -> Self {
        self.balances.insert(address, stake.lamports);
        self.accounts.insert(
            address,
            Account {
                lamports: stake.lamports,
                data: vec![0; 200],
                owner: STAKE_PROGRAM_ID,
                executable: false,
            },
        );
        self.parsed.insert(address, ParsedAccount::Stake(stake));
        self
    }

    pub fn with_balance(mut self, address: Pubkey, lamports: u64) -> Self {
        self.balances.insert(address, lamports);
        self
    }

    /// Make every read of `address` fail at the transport level.
    pub fn failing_on(mut self, address: Pubkey) -> Self {
        self.failing.insert(address);
        self
    }

    /// Number of reads (of any kind) that touched `address`.
    pub fn calls_for(&self, address: &Pubkey) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, a)| a == address)
            .count()
    }

    fn record(&self, method: &'static str, address: &Pubkey) -> ClientResult<()> {
        self.calls.lock().unwrap().push((method, *address));
        if self.failing.contains(address) {
            return Err("connection refused".into());
        }
        Ok(())
    }
}

#[async_trait]
impl ProgramClient for MockClient {
    async fn get_account_info(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        self.record("get_account_info", address)?;
        Ok(self.accounts.get(address).cloned())
    }

    async fn get_parsed_account_info(
        &self,
        address: &Pubkey,
    ) -> ClientResult<Option<ParsedAccount>> {
        self.record("get_parsed_account_info", address)?;
        if let Some(parsed) = self.parsed.get(address) {
            return Ok(Some(parsed.clone()));
        }
        Ok(self.accounts.get(address).map(|_| ParsedAccount::Other {
            program: "unknown".into(),
        }))
    }

    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64> {
        self.record("get_balance", address)?;
        Ok(self
            .balances
            .get(address)
            .copied()
            .or_else(|| self.accounts.get(address).map(|a| a.lamports))
            .unwrap_or(0))
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> ClientResult<u64> {
        Ok(RENT)
    }
}
