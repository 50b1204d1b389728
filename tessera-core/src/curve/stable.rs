//! Stable swap invariant for two tokens.
//!
//! Solves
//!
//! ```md
//! A * n^n * sum(x_i) + D = A * D * n^n + D^(n+1) / (n^n * prod(x_i))
//! ```
//!
//! for `D` by Newton's method, then solves the same relation for the unknown
//! reserve `y` after a swap. Reserves are upscaled to 18 decimals so tokens
//! with different precision price near 1:1, and every intermediate is a
//! checked 512-bit unsigned integer.

use anchor_lang::prelude::*;
use primitive_types::U512;

use super::{SwapCurve, SwapWithoutFees, TradeDirection};
use crate::error::CoreError::{
  ConvergenceFailure, InsufficientLiquidity, InvalidCurveType, MathOverflow,
};

/// Exclusive lower bound of the amplification coefficient.
pub const MIN_AMP: u64 = 1;

/// Exclusive upper bound of the amplification coefficient.
pub const MAX_AMP: u64 = 1_000_000;

/// Newton iterations allowed for either `D` or `y`.
pub const MAX_ITERATIONS: u16 = 256;

const N_COINS: u64 = 2;
const TARGET_DECIMALS: u8 = 18;

/// Stable swap curve for tokens that should trade near parity.
#[derive(
  Copy,
  Clone,
  Debug,
  Default,
  PartialEq,
  Eq,
  InitSpace,
  AnchorSerialize,
  AnchorDeserialize,
)]
pub struct StableCurve {
  pub amp: u64,
  pub token_a_decimals: u8,
  pub token_b_decimals: u8,
}

fn checked_add(a: U512, b: U512) -> Result<U512> {
  a.checked_add(b).ok_or(MathOverflow.into())
}

fn checked_sub(a: U512, b: U512) -> Result<U512> {
  a.checked_sub(b).ok_or(MathOverflow.into())
}

fn checked_mul(a: U512, b: U512) -> Result<U512> {
  a.checked_mul(b).ok_or(MathOverflow.into())
}

fn checked_div(a: U512, b: U512) -> Result<U512> {
  a.checked_div(b).ok_or(MathOverflow.into())
}

fn within_one(a: U512, b: U512) -> bool {
  if a > b {
    a - b <= U512::one()
  } else {
    b - a <= U512::one()
  }
}

fn to_u128(value: U512) -> Result<u128> {
  if value > U512::from(u128::MAX) {
    Err(MathOverflow.into())
  } else {
    Ok(value.low_u128())
  }
}

/// `10^(18 - decimals)`
fn scale_factor(decimals: u8) -> Result<U512> {
  let exponent = TARGET_DECIMALS
    .checked_sub(decimals)
    .ok_or(InvalidCurveType)?;
  Ok(U512::exp10(usize::from(exponent)))
}

/// Invariant `D` for upscaled reserves.
///
/// `ann` is `A * n^(n-1)`, the convention of the deployed stable swap
/// programs.
///
/// # Errors
/// * No convergence within `max_iterations`
/// * Arithmetic overflow
pub fn compute_d(
  ann: U512,
  amount_a: U512,
  amount_b: U512,
  max_iterations: u16,
) -> Result<U512> {
  let sum = checked_add(amount_a, amount_b)?;
  if sum.is_zero() {
    return Ok(U512::zero());
  }
  let n = U512::from(N_COINS);
  // the extra unit keeps an empty side from dividing by zero
  let a_times_coins = checked_add(checked_mul(amount_a, n)?, U512::one())?;
  let b_times_coins = checked_add(checked_mul(amount_b, n)?, U512::one())?;
  let ann_sum = checked_mul(ann, sum)?;
  let ann_less_one = checked_sub(ann, U512::one())?;

  let mut d = sum;
  for _ in 0..max_iterations {
    let d_product = checked_div(checked_mul(d, d)?, a_times_coins)?;
    let d_product = checked_div(checked_mul(d_product, d)?, b_times_coins)?;
    let numerator = checked_mul(
      checked_add(ann_sum, checked_mul(d_product, n)?)?,
      d,
    )?;
    let denominator = checked_add(
      checked_mul(ann_less_one, d)?,
      checked_mul(d_product, checked_add(n, U512::one())?)?,
    )?;
    let next = checked_div(numerator, denominator)?;
    if within_one(next, d) {
      return Ok(next);
    }
    d = next;
  }
  Err(ConvergenceFailure.into())
}

/// Reserve `y` on the other side once one side holds `x`, rounded up.
///
/// Iterates `y = (y^2 + c) / (2y + b - D)` with
/// `b = x + D / ann` and `c = D^3 / (n^2 * x * ann)`.
///
/// # Errors
/// * No convergence within `max_iterations`
/// * Arithmetic overflow
pub fn compute_y(
  ann: U512,
  x: U512,
  d: U512,
  max_iterations: u16,
) -> Result<U512> {
  let n = U512::from(N_COINS);
  let c_denominator = checked_mul(checked_mul(x, checked_mul(n, n)?)?, ann)?;
  let c = checked_div(checked_mul(checked_mul(d, d)?, d)?, c_denominator)?;
  let b = checked_add(x, checked_div(d, ann)?)?;

  let mut y = d;
  for _ in 0..max_iterations {
    let numerator = checked_add(checked_mul(y, y)?, c)?;
    let denominator =
      checked_sub(checked_add(checked_mul(y, n)?, b)?, d)?;
    let next = if denominator.is_zero() {
      // only reachable for dust reserves; one unit keeps the pool whole
      if numerator.is_zero() {
        U512::zero()
      } else {
        U512::one()
      }
    } else {
      let quotient = numerator / denominator;
      if (numerator % denominator).is_zero() {
        quotient
      } else {
        checked_add(quotient, U512::one())?
      }
    };
    if within_one(next, y) {
      return Ok(next);
    }
    y = next;
  }
  Err(ConvergenceFailure.into())
}

impl StableCurve {
  fn ann(&self) -> Result<U512> {
    checked_mul(U512::from(self.amp), U512::from(N_COINS))
  }

  /// Scale factors as `(source, destination)` for a trade direction.
  fn scale_factors(
    &self,
    trade_direction: TradeDirection,
  ) -> Result<(U512, U512)> {
    let a = scale_factor(self.token_a_decimals)?;
    let b = scale_factor(self.token_b_decimals)?;
    Ok(trade_direction.source_first(a, b))
  }

  fn upscale(amount: u128, factor: U512) -> Result<U512> {
    checked_mul(U512::from(amount), factor)
  }

  /// Invariant of the raw reserves.
  ///
  /// # Errors
  /// * Invalid decimals or non-convergence
  pub fn invariant(
    &self,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
  ) -> Result<U512> {
    let (scale_a, scale_b) = self.scale_factors(TradeDirection::AtoB)?;
    compute_d(
      self.ann()?,
      Self::upscale(pool_token_a_amount, scale_a)?,
      Self::upscale(pool_token_b_amount, scale_b)?,
      MAX_ITERATIONS,
    )
  }

  /// `D` before and after moving `amount` on the `trade_direction` side.
  fn invariants(
    &self,
    amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    trade_direction: TradeDirection,
    deposit: bool,
  ) -> Result<(U512, U512)> {
    let d0 = self.invariant(pool_token_a_amount, pool_token_b_amount)?;
    let (moved, other) =
      trade_direction.source_first(pool_token_a_amount, pool_token_b_amount);
    let moved = if deposit {
      moved.checked_add(amount).ok_or(MathOverflow)?
    } else if amount < moved {
      moved - amount
    } else {
      return Err(InsufficientLiquidity.into());
    };
    let (new_a, new_b) = match trade_direction {
      TradeDirection::AtoB => (moved, other),
      TradeDirection::BtoA => (other, moved),
    };
    let d1 = self.invariant(new_a, new_b)?;
    Ok((d0, d1))
  }
}

impl SwapCurve for StableCurve {
  fn swap_without_fees(
    &self,
    source_amount: u128,
    pool_source_amount: u128,
    pool_destination_amount: u128,
    trade_direction: TradeDirection,
  ) -> Result<SwapWithoutFees> {
    if pool_source_amount == 0 || pool_destination_amount == 0 {
      return Err(InsufficientLiquidity.into());
    }
    if source_amount == 0 {
      return Ok(SwapWithoutFees::zero());
    }
    let ann = self.ann()?;
    let (scale_source, scale_destination) =
      self.scale_factors(trade_direction)?;
    let x = Self::upscale(pool_source_amount, scale_source)?;
    let y = Self::upscale(pool_destination_amount, scale_destination)?;
    let d = compute_d(ann, x, y, MAX_ITERATIONS)?;
    let new_x = checked_add(x, Self::upscale(source_amount, scale_source)?)?;
    let new_y = compute_y(ann, new_x, d, MAX_ITERATIONS)?;
    // rounding can leave new_y a unit above y for dust trades
    let out = y.saturating_sub(new_y);
    let destination_amount_swapped =
      to_u128(checked_div(out, scale_destination)?)?;
    Ok(SwapWithoutFees {
      source_amount_swapped: source_amount,
      destination_amount_swapped,
    })
  }

  fn deposit_single_token_type(
    &self,
    source_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    if pool_token_supply == 0 {
      return Err(InsufficientLiquidity.into());
    }
    if source_amount == 0 {
      return Ok(0);
    }
    let (d0, d1) = self.invariants(
      source_amount,
      pool_token_a_amount,
      pool_token_b_amount,
      trade_direction,
      true,
    )?;
    if d0.is_zero() {
      return Err(InsufficientLiquidity.into());
    }
    let minted = checked_div(
      checked_mul(U512::from(pool_token_supply), checked_sub(d1, d0)?)?,
      d0,
    )?;
    to_u128(minted)
  }

  fn withdraw_single_token_type_exact_out(
    &self,
    destination_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    if pool_token_supply == 0 {
      return Err(InsufficientLiquidity.into());
    }
    if destination_amount == 0 {
      return Ok(0);
    }
    let (d0, d1) = self.invariants(
      destination_amount,
      pool_token_a_amount,
      pool_token_b_amount,
      trade_direction,
      false,
    )?;
    if d0.is_zero() {
      return Err(InsufficientLiquidity.into());
    }
    let scaled =
      checked_mul(U512::from(pool_token_supply), checked_sub(d0, d1)?)?;
    let quotient = scaled / d0;
    let burned = if (scaled % d0).is_zero() {
      quotient
    } else {
      checked_add(quotient, U512::one())?
    };
    to_u128(burned)
  }

  fn validate(&self) -> Result<()> {
    if self.amp <= MIN_AMP || self.amp >= MAX_AMP {
      msg!("amp={} outside ({}, {})", self.amp, MIN_AMP, MAX_AMP);
      return Err(InvalidCurveType.into());
    }
    if self.token_a_decimals > TARGET_DECIMALS
      || self.token_b_decimals > TARGET_DECIMALS
    {
      msg!(
        "decimals={}/{} above {}",
        self.token_a_decimals,
        self.token_b_decimals,
        TARGET_DECIMALS
      );
      return Err(InvalidCurveType.into());
    }
    Ok(())
  }
}
