//! Pool accounting: unit conversion, exchange-rate math and bound checks.
//!
//! Every base-unit amount is a `u64`; products go through `u128` so the
//! exchange-rate math never overflows before the final narrowing.

use crate::error::{Asset, StakePoolError};
use crate::state::{Fee, StakePool};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const SOL_DECIMALS: usize = 9;

// ---------------------------------------------------------------------------
// Display units
// ---------------------------------------------------------------------------

/// Render a lamport amount as an exact SOL decimal string, trailing zeros
/// trimmed (`10_000` -> `"0.00001"`, `-1_500_000_000` -> `"-1.5"`).
pub fn format_lamports(lamports: i128) -> String {
    let sign = if lamports < 0 { "-" } else { "" };
    let abs = lamports.unsigned_abs();
    let whole = abs / LAMPORTS_PER_SOL as u128;
    let frac = abs % LAMPORTS_PER_SOL as u128;

    if frac == 0 {
        return format!("{sign}{whole}");
    }
    let frac = format!("{frac:0width$}", width = SOL_DECIMALS);
    format!("{sign}{whole}.{}", frac.trim_end_matches('0'))
}

/// Convert lamports to SOL, sign preserved.
///
/// Goes through the exact decimal string so the result is the nearest `f64`
/// to the true value.
pub fn lamports_to_sol(lamports: i128) -> f64 {
    format_lamports(lamports).parse().unwrap_or_default()
}

/// Convert SOL to lamports, rounding to 9 decimals.
///
/// NaN maps to 0. Infinite or out-of-range values are rejected.
pub fn sol_to_lamports(sol: f64) -> Result<i64, StakePoolError> {
    if sol.is_nan() {
        return Ok(0);
    }
    if !sol.is_finite() {
        return Err(StakePoolError::InvalidArgument(format!(
            "{sol} SOL is not a finite amount"
        )));
    }

    let out_of_range = || StakePoolError::InvalidArgument(format!("{sol} SOL is out of range"));

    let rendered = format!("{:.prec$}", sol.abs(), prec = SOL_DECIMALS);
    let (whole, frac) = rendered.split_once('.').ok_or_else(out_of_range)?;
    let whole: i64 = whole.parse().map_err(|_| out_of_range())?;
    let frac: i64 = frac.parse().map_err(|_| out_of_range())?;

    let lamports = whole
        .checked_mul(LAMPORTS_PER_SOL as i64)
        .and_then(|l| l.checked_add(frac))
        .ok_or_else(out_of_range)?;

    Ok(if sol.is_sign_negative() { -lamports } else { lamports })
}

// ---------------------------------------------------------------------------
// Exchange rate
// ---------------------------------------------------------------------------

/// Pool tokens minted for a deposit of `lamports` (before fees).
///
/// An empty pool mints 1:1.
pub fn calc_pool_tokens_for_deposit(pool: &StakePool, lamports: u64) -> Result<u64, StakePoolError> {
    if pool.pool_token_supply == 0 || pool.total_lamports == 0 {
        return Ok(lamports);
    }
    let tokens = lamports as u128 * pool.pool_token_supply as u128 / pool.total_lamports as u128;
    u64::try_from(tokens).map_err(|_| StakePoolError::ArithmeticOverflow)
}

/// Lamports paid out for burning `pool_tokens` (before fees).
pub fn calc_lamports_withdraw_amount(
    pool: &StakePool,
    pool_tokens: u64,
) -> Result<u64, StakePoolError> {
    let numerator = pool_tokens as u128 * pool.total_lamports as u128;
    let denominator = pool.pool_token_supply as u128;
    if denominator == 0 || numerator < denominator {
        return Ok(0);
    }
    u64::try_from(numerator / denominator).map_err(|_| StakePoolError::ArithmeticOverflow)
}

/// The fraction of an amount left after `fee` is taken.
pub fn inverse_fee(fee: &Fee) -> Fee {
    Fee {
        denominator: fee.denominator,
        numerator: fee.denominator.saturating_sub(fee.numerator),
    }
}

/// Gross `pool_tokens` up so that, after the withdrawal fee is taken, the
/// stake actually split still equals the original amount.
///
/// A zero-fee (or malformed, all-fee) schedule leaves the amount unchanged.
pub fn gross_up_for_fee(pool_tokens: u64, fee: &Fee) -> Result<u64, StakePoolError> {
    let inverse = inverse_fee(fee);
    if inverse.numerator == 0 || fee.numerator == 0 {
        return Ok(pool_tokens);
    }
    let grossed = pool_tokens as u128 * inverse.denominator as u128 / inverse.numerator as u128;
    u64::try_from(grossed).map_err(|_| StakePoolError::ArithmeticOverflow)
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Largest native deposit the payer can make while keeping `reserve`.
pub fn max_deposit(balance: u64, reserve: u64) -> u64 {
    balance.saturating_sub(reserve)
}

/// Reject a native deposit exceeding `balance - reserve`.
pub fn check_deposit_bound(balance: u64, reserve: u64, requested: u64) -> Result<(), StakePoolError> {
    let max = max_deposit(balance, reserve);
    if requested > max {
        return Err(StakePoolError::InsufficientBalance {
            asset: Asset::Sol,
            requested,
            max,
        });
    }
    Ok(())
}

/// Reject a withdrawal burning more pool tokens than the live balance.
pub fn check_withdraw_bound(pool_token_balance: u64, requested: u64) -> Result<(), StakePoolError> {
    if requested > pool_token_balance {
        return Err(StakePoolError::InsufficientBalance {
            asset: Asset::PoolTokens,
            requested,
            max: pool_token_balance,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(total_lamports: u64, pool_token_supply: u64) -> StakePool {
        StakePool {
            total_lamports,
            pool_token_supply,
            ..StakePool::default()
        }
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_lamports(0), "0");
        assert_eq!(format_lamports(10_000), "0.00001");
        assert_eq!(format_lamports(1_000_000_000), "1");
        assert_eq!(format_lamports(1_500_000_000), "1.5");
        assert_eq!(format_lamports(-1), "-0.000000001");
    }

    #[test]
    fn lamports_to_sol_preserves_sign() {
        assert_eq!(lamports_to_sol(0), 0.0);
        assert_eq!(lamports_to_sol(2_500_000_000), 2.5);
        assert_eq!(lamports_to_sol(-2_500_000_000), -2.5);
        assert_eq!(lamports_to_sol(1), 0.000000001);
    }

    #[test]
    fn lamports_to_sol_handles_large_values() {
        let sol = lamports_to_sol(u64::MAX as i128);
        assert!((sol - 18_446_744_073.709_55).abs() < 1e-5);
    }

    #[test]
    fn sol_to_lamports_rounds_to_nine_decimals() {
        assert_eq!(sol_to_lamports(1.0).unwrap(), 1_000_000_000);
        assert_eq!(sol_to_lamports(0.1).unwrap(), 100_000_000);
        assert_eq!(sol_to_lamports(0.000_000_001_4).unwrap(), 1);
        assert_eq!(sol_to_lamports(-3.25).unwrap(), -3_250_000_000);
    }

    #[test]
    fn sol_to_lamports_nan_is_zero() {
        assert_eq!(sol_to_lamports(f64::NAN).unwrap(), 0);
    }

    #[test]
    fn sol_to_lamports_rejects_infinite_and_huge() {
        assert!(sol_to_lamports(f64::INFINITY).is_err());
        assert!(sol_to_lamports(1e12).is_err());
    }

    #[test]
    fn unit_roundtrip_positive_negative_zero() {
        for v in [0.0, 1.0, 0.123_456_789, -42.5, -0.000_000_001, 12_345.678_9] {
            let back = lamports_to_sol(sol_to_lamports(v).unwrap() as i128);
            assert!((back - v).abs() < 1e-9, "{v} -> {back}");
        }
    }

    #[test]
    fn empty_pool_mints_one_to_one() {
        assert_eq!(calc_pool_tokens_for_deposit(&pool(0, 0), 500).unwrap(), 500);
        assert_eq!(calc_pool_tokens_for_deposit(&pool(100, 0), 500).unwrap(), 500);
    }

    #[test]
    fn deposit_uses_exchange_rate() {
        // 1 pool token is worth 2 lamports.
        assert_eq!(calc_pool_tokens_for_deposit(&pool(2_000, 1_000), 500).unwrap(), 250);
        assert_eq!(calc_pool_tokens_for_deposit(&pool(3, 1), 1).unwrap(), 0);
    }

    #[test]
    fn deposit_overflow_is_reported() {
        let err = calc_pool_tokens_for_deposit(&pool(1, u64::MAX), u64::MAX).unwrap_err();
        assert!(matches!(err, StakePoolError::ArithmeticOverflow));
    }

    #[test]
    fn withdraw_amount_uses_exchange_rate() {
        assert_eq!(calc_lamports_withdraw_amount(&pool(2_000, 1_000), 250).unwrap(), 500);
        assert_eq!(calc_lamports_withdraw_amount(&pool(u64::MAX, u64::MAX), u64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn withdraw_amount_zero_cases() {
        assert_eq!(calc_lamports_withdraw_amount(&pool(100, 0), 50).unwrap(), 0);
        // numerator (1 * 1) below denominator (10)
        assert_eq!(calc_lamports_withdraw_amount(&pool(1, 10), 1).unwrap(), 0);
    }

    #[test]
    fn gross_up_inverts_fee() {
        let fee = Fee { denominator: 100, numerator: 10 };
        assert_eq!(inverse_fee(&fee), Fee { denominator: 100, numerator: 90 });
        assert_eq!(gross_up_for_fee(900, &fee).unwrap(), 1_000);
        assert_eq!(gross_up_for_fee(900, &Fee::default()).unwrap(), 900);
    }

    #[test]
    fn deposit_bound_is_exact() {
        assert!(check_deposit_bound(10_000, 0, 10_000).is_ok());
        let err = check_deposit_bound(10_000, 890_880, 1).unwrap_err();
        assert!(matches!(
            err,
            StakePoolError::InsufficientBalance { asset: Asset::Sol, requested: 1, max: 0 }
        ));
        let err = check_deposit_bound(10_000, 1_000, 9_001).unwrap_err();
        assert!(matches!(
            err,
            StakePoolError::InsufficientBalance { requested: 9_001, max: 9_000, .. }
        ));
        assert!(check_deposit_bound(10_000, 1_000, 9_000).is_ok());
    }

    #[test]
    fn withdraw_bound_with_empty_balance() {
        let err = check_withdraw_bound(0, 1).unwrap_err();
        assert!(matches!(
            err,
            StakePoolError::InsufficientBalance { asset: Asset::PoolTokens, requested: 1, max: 0 }
        ));
        assert!(check_withdraw_bound(5, 5).is_ok());
    }
}
