//! Client-side transaction composition for the SPL stake pool program.
//!
//! Given a high-level intent (deposit SOL, withdraw SOL, withdraw stake,
//! redelegate, manage token metadata) this crate reads the pool's on-chain
//! state through a caller-supplied [`ProgramClient`], checks the request
//! against it and returns an [`InstructionPlan`]: the ordered instructions
//! plus the keypairs it generated. Plans compile and sign into wire-format
//! transactions; submitting them is left to the caller.
//!
//! Nothing is cached between calls. Program ids and policy knobs come from
//! [`ClientConfig`].

pub mod accounts;
pub mod composer;
pub mod config;
pub mod error;
pub mod instruction;
pub mod layout;
pub mod math;
pub mod pda;
pub mod plan;
pub mod rpc;
pub mod state;
pub mod validators;

pub use accounts::{
    get_pool_token_account, get_stake_account, get_stake_pool_account, get_token_account,
    get_validator_list_account,
};
pub use composer::{
    create_pool_token_metadata, deposit_sol, merge_into_receiver, redelegate, update_pool_token_metadata,
    withdraw_sol, withdraw_stake, DepositSolRequest, RedelegateRequest, TokenMetadataRequest,
    WithdrawSolRequest, WithdrawStakeRequest,
};
pub use config::{ClientConfig, PayerReserve, STAKE_POOL_PROGRAM_ID};
pub use error::{Asset, StakePoolError};
pub use layout::{InstructionKind, StakePoolInstruction};
pub use math::{lamports_to_sol, sol_to_lamports, LAMPORTS_PER_SOL};
pub use plan::InstructionPlan;
pub use rpc::{Account, ClientError, ParsedAccount, ProgramClient, StakeAccount, StakeAccountState};
pub use state::{StakePool, ValidatorList, ValidatorStakeInfo};
pub use validators::WithdrawAccount;
