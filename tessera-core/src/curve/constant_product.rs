//! Constant product curve, `reserve_a * reserve_b = k`.

use anchor_lang::prelude::*;
use primitive_types::U256;

use super::math::{ceil_div_u256, to_u128};
use super::{SwapCurve, SwapWithoutFees, TradeDirection};
use crate::error::CoreError::{InsufficientLiquidity, MathOverflow};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstantProductCurve;

/// Solves `(x + dx) * (y - dy) >= x * y` for the largest integer `dy`.
///
/// # Errors
/// * Either reserve is zero
pub fn swap(
  source_amount: u128,
  pool_source_amount: u128,
  pool_destination_amount: u128,
) -> Result<SwapWithoutFees> {
  if pool_source_amount == 0 || pool_destination_amount == 0 {
    return Err(InsufficientLiquidity.into());
  }
  if source_amount == 0 {
    return Ok(SwapWithoutFees::zero());
  }
  let invariant = U256::from(pool_source_amount)
    .checked_mul(U256::from(pool_destination_amount))
    .ok_or(MathOverflow)?;
  let new_source = pool_source_amount
    .checked_add(source_amount)
    .ok_or(MathOverflow)?;
  let new_destination =
    to_u128(ceil_div_u256(invariant, U256::from(new_source))?)?;
  let destination_amount_swapped = pool_destination_amount
    .checked_sub(new_destination)
    .ok_or(MathOverflow)?;
  Ok(SwapWithoutFees {
    source_amount_swapped: source_amount,
    destination_amount_swapped,
  })
}

/// `floor(supply * (sqrt(1 + amount / reserve) - 1))`
///
/// Evaluated as `isqrt(supply^2 * (reserve + amount) / reserve) - supply`,
/// which floors exactly.
///
/// # Errors
/// * Zero reserve or supply
/// * `supply^2 * reserve` exceeds 256 bits
pub fn deposit_single_token_type(
  source_amount: u128,
  swap_reserve: u128,
  pool_token_supply: u128,
) -> Result<u128> {
  if swap_reserve == 0 || pool_token_supply == 0 {
    return Err(InsufficientLiquidity.into());
  }
  if source_amount == 0 {
    return Ok(0);
  }
  let supply = U256::from(pool_token_supply);
  let new_reserve = swap_reserve
    .checked_add(source_amount)
    .ok_or(MathOverflow)?;
  let radicand = supply
    .checked_mul(supply)
    .and_then(|s| s.checked_mul(U256::from(new_reserve)))
    .and_then(|s| s.checked_div(U256::from(swap_reserve)))
    .ok_or(MathOverflow)?;
  let minted = radicand
    .integer_sqrt()
    .checked_sub(supply)
    .ok_or(MathOverflow)?;
  to_u128(minted)
}

/// `ceil(supply * (1 - sqrt(1 - amount / reserve)))`
///
/// # Errors
/// * Withdrawal of the whole reserve or more
/// * Zero reserve or supply
pub fn withdraw_single_token_type_exact_out(
  destination_amount: u128,
  swap_reserve: u128,
  pool_token_supply: u128,
) -> Result<u128> {
  if swap_reserve == 0 || pool_token_supply == 0 {
    return Err(InsufficientLiquidity.into());
  }
  if destination_amount == 0 {
    return Ok(0);
  }
  if destination_amount >= swap_reserve {
    return Err(InsufficientLiquidity.into());
  }
  let supply = U256::from(pool_token_supply);
  let remaining = U256::from(swap_reserve - destination_amount);
  let radicand = supply
    .checked_mul(supply)
    .and_then(|s| s.checked_mul(remaining))
    .and_then(|s| s.checked_div(U256::from(swap_reserve)))
    .ok_or(MathOverflow)?;
  // isqrt(floor(v)) == floor(sqrt(v)), so subtracting from supply is a ceil
  let burned = supply
    .checked_sub(radicand.integer_sqrt())
    .ok_or(MathOverflow)?;
  to_u128(burned)
}

impl SwapCurve for ConstantProductCurve {
  fn swap_without_fees(
    &self,
    source_amount: u128,
    pool_source_amount: u128,
    pool_destination_amount: u128,
    _trade_direction: TradeDirection,
  ) -> Result<SwapWithoutFees> {
    swap(source_amount, pool_source_amount, pool_destination_amount)
  }

  fn deposit_single_token_type(
    &self,
    source_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    let (reserve, _) =
      trade_direction.source_first(pool_token_a_amount, pool_token_b_amount);
    deposit_single_token_type(source_amount, reserve, pool_token_supply)
  }

  fn withdraw_single_token_type_exact_out(
    &self,
    destination_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    let (reserve, _) =
      trade_direction.source_first(pool_token_a_amount, pool_token_b_amount);
    withdraw_single_token_type_exact_out(
      destination_amount,
      reserve,
      pool_token_supply,
    )
  }

  fn validate(&self) -> Result<()> {
    Ok(())
  }
}
