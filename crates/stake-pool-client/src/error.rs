use sol_primitives::SolError;
use thiserror::Error;

use crate::math::format_lamports;
use crate::rpc::ClientError;

/// Unit a rejected quantity is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    /// Native currency, rendered in SOL.
    Sol,
    /// Pool tokens, rendered with the pool mint's 9 decimals.
    PoolTokens,
}

impl Asset {
    fn render(&self, amount: u64) -> String {
        match self {
            Asset::Sol => format!("{} SOL", format_lamports(amount as i128)),
            Asset::PoolTokens => format!("{} pool tokens", format_lamports(amount as i128)),
        }
    }
}

fn render_amount(asset: &Asset, amount: &u64) -> String {
    asset.render(*amount)
}

/// Stake pool composition errors.
#[derive(Debug, Error)]
pub enum StakePoolError {
    #[error("{what} account {address} not found")]
    AccountNotFound { what: &'static str, address: String },

    #[error("account decode error: {0}")]
    AccountDecodeError(String),

    #[error("instruction layout mismatch: expected index {expected}, got {actual}")]
    InstructionLayoutMismatch { expected: u8, actual: u8 },

    #[error("invalid instruction data: {0}")]
    InvalidInstructionData(String),

    #[error(
        "insufficient balance: requested {}, maximum is {}",
        render_amount(.asset, .requested),
        render_amount(.asset, .max)
    )]
    InsufficientBalance { asset: Asset, requested: u64, max: u64 },

    #[error("validator not found: {0}")]
    ValidatorNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("{operation} failed for {address}: {source}")]
    Collaborator {
        operation: &'static str,
        address: String,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Primitive(#[from] SolError),
}
