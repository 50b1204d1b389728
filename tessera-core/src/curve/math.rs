use anchor_lang::prelude::*;
use primitive_types::U256;

use super::{RoundDirection, TradingTokens};
use crate::error::CoreError::{InsufficientLiquidity, MathOverflow};

/// Narrows a 256-bit intermediate back to a token amount.
pub(crate) fn to_u128(value: U256) -> Result<u128> {
  if value > U256::from(u128::MAX) {
    Err(MathOverflow.into())
  } else {
    Ok(value.low_u128())
  }
}

/// `ceil(dividend / divisor)` over 256 bits.
pub(crate) fn ceil_div_u256(dividend: U256, divisor: U256) -> Result<U256> {
  if divisor.is_zero() {
    return Err(MathOverflow.into());
  }
  let quotient = dividend / divisor;
  if (dividend % divisor).is_zero() {
    Ok(quotient)
  } else {
    quotient.checked_add(U256::one()).ok_or(MathOverflow.into())
  }
}

/// `amount * numerator / denominator` with a 256-bit product.
pub(crate) fn mul_div(
  amount: u128,
  numerator: u128,
  denominator: u128,
  round: RoundDirection,
) -> Result<u128> {
  let product = U256::from(amount)
    .checked_mul(U256::from(numerator))
    .ok_or(MathOverflow)?;
  let quotient = match round {
    RoundDirection::Floor => product
      .checked_div(U256::from(denominator))
      .ok_or(MathOverflow)?,
    RoundDirection::Ceiling => {
      ceil_div_u256(product, U256::from(denominator))?
    }
  };
  to_u128(quotient)
}

fn reserve_share(
  pool_tokens: u128,
  pool_token_supply: u128,
  reserve: u128,
  round: RoundDirection,
) -> Result<u128> {
  let floor = mul_div(
    pool_tokens,
    reserve,
    pool_token_supply,
    RoundDirection::Floor,
  )?;
  match round {
    RoundDirection::Floor => Ok(floor),
    // A zero share stays zero so dust pool tokens never cost a whole token
    RoundDirection::Ceiling if floor == 0 => Ok(0),
    RoundDirection::Ceiling => {
      mul_div(pool_tokens, reserve, pool_token_supply, round)
    }
  }
}

/// Proportional claim of `pool_tokens` on both reserves.
///
/// # Errors
/// * Zero pool token supply
/// * Arithmetic overflow
pub fn pool_tokens_to_trading_tokens(
  pool_tokens: u128,
  pool_token_supply: u128,
  reserve_a: u128,
  reserve_b: u128,
  round: RoundDirection,
) -> Result<TradingTokens> {
  if pool_token_supply == 0 {
    return Err(InsufficientLiquidity.into());
  }
  Ok(TradingTokens {
    token_a_amount: reserve_share(
      pool_tokens,
      pool_token_supply,
      reserve_a,
      round,
    )?,
    token_b_amount: reserve_share(
      pool_tokens,
      pool_token_supply,
      reserve_b,
      round,
    )?,
  })
}
