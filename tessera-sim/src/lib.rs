//! Arbitrary precision reference models of the tessera curves.
//!
//! Unlike the production engine these models:
//!
//! - use unbounded integers, so nothing overflows
//! - iterate Newton's method up to [`MAX_ITERATIONS`] times
//! - let `b` go negative while solving for `y`
//!
//! They exist to cross-check the fixed precision math and are not meant to
//! run on-chain. Every method returns `None` rather than panicking when a
//! result does not fit a token amount.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Newton iterations before a model gives up.
pub const MAX_ITERATIONS: u64 = 10_000;

const TARGET_DECIMALS: u32 = 18;
const N_COINS: u32 = 2;

fn big(amount: u128) -> BigInt {
  BigInt::from(amount)
}

fn ceil_div(numerator: &BigInt, denominator: &BigInt) -> BigInt {
  let quotient: BigInt = numerator / denominator;
  let remainder: BigInt = numerator % denominator;
  if remainder.is_zero() {
    quotient
  } else {
    quotient + 1
  }
}

/// `x * y = k`, solved exactly.
#[derive(Clone, Debug, Default)]
pub struct ConstantProductModel;

impl ConstantProductModel {
  pub fn swap(
    &self,
    source_amount: u128,
    pool_source_amount: u128,
    pool_destination_amount: u128,
  ) -> Option<u128> {
    if pool_source_amount == 0 || pool_destination_amount == 0 {
      return None;
    }
    let x = big(pool_source_amount);
    let y = big(pool_destination_amount);
    let new_y = ceil_div(&(&x * &y), &(&x + big(source_amount)));
    let out: BigInt = y - new_y;
    out.to_u128()
  }

  pub fn deposit_single(
    &self,
    source_amount: u128,
    reserve: u128,
    supply: u128,
  ) -> Option<u128> {
    if reserve == 0 || supply == 0 {
      return None;
    }
    let s = big(supply);
    let radicand: BigInt =
      &s * &s * (big(reserve) + big(source_amount)) / big(reserve);
    let minted: BigInt = radicand.sqrt() - s;
    minted.to_u128()
  }

  pub fn withdraw_single_exact_out(
    &self,
    destination_amount: u128,
    reserve: u128,
    supply: u128,
  ) -> Option<u128> {
    if destination_amount >= reserve || supply == 0 {
      return None;
    }
    let s = big(supply);
    let radicand: BigInt =
      &s * &s * (big(reserve) - big(destination_amount)) / big(reserve);
    let burned: BigInt = s - radicand.sqrt();
    burned.to_u128()
  }
}

/// Fixed rate: one B is worth `token_b_price` A.
#[derive(Clone, Debug)]
pub struct ConstantPriceModel {
  pub token_b_price: u64,
}

impl ConstantPriceModel {
  /// `(source consumed, destination out)`
  pub fn swap(
    &self,
    source_amount: u128,
    a_to_b: bool,
  ) -> Option<(u128, u128)> {
    let price = big(u128::from(self.token_b_price));
    if price.is_zero() {
      return None;
    }
    let source = big(source_amount);
    if a_to_b {
      let out: BigInt = &source / &price;
      let consumed: BigInt = &out * &price;
      Some((consumed.to_u128()?, out.to_u128()?))
    } else {
      let out: BigInt = source * price;
      Some((source_amount, out.to_u128()?))
    }
  }

  pub fn deposit_single(
    &self,
    source_amount: u128,
    reserve_a: u128,
    reserve_b: u128,
    supply: u128,
    a_to_b: bool,
  ) -> Option<u128> {
    let price = big(u128::from(self.token_b_price));
    let total: BigInt = big(reserve_a) + big(reserve_b) * &price;
    if total.is_zero() {
      return None;
    }
    let value = if a_to_b {
      big(source_amount)
    } else {
      big(source_amount) * price
    };
    let minted: BigInt = big(supply) * value / total;
    minted.to_u128()
  }
}

/// Constant product with `token_b_offset` virtual B tokens.
#[derive(Clone, Debug)]
pub struct OffsetModel {
  pub token_b_offset: u64,
}

impl OffsetModel {
  pub fn swap(
    &self,
    source_amount: u128,
    reserve_a: u128,
    reserve_b: u128,
    a_to_b: bool,
  ) -> Option<u128> {
    let virtual_b = reserve_b.checked_add(u128::from(self.token_b_offset))?;
    let out = if a_to_b {
      ConstantProductModel.swap(source_amount, reserve_a, virtual_b)?
    } else {
      ConstantProductModel.swap(source_amount, virtual_b, reserve_a)?
    };
    let real_destination = if a_to_b { reserve_b } else { reserve_a };
    (out <= real_destination).then_some(out)
  }
}

/// Two-token stable swap with reserves upscaled to 18 decimals.
#[derive(Clone, Debug)]
pub struct StableSwapModel {
  pub amp_factor: BigInt,
  pub balances: [BigInt; 2],
  pub rates: [BigInt; 2],
  pub pool_tokens: BigInt,
}

impl StableSwapModel {
  /// Decimals above 18 yield `None`.
  pub fn new(
    amp_factor: u64,
    balances: [u128; 2],
    decimals: [u8; 2],
  ) -> Option<StableSwapModel> {
    Self::new_with_pool_tokens(amp_factor, balances, decimals, 0)
  }

  pub fn new_with_pool_tokens(
    amp_factor: u64,
    balances: [u128; 2],
    decimals: [u8; 2],
    pool_tokens: u128,
  ) -> Option<StableSwapModel> {
    let rate = |decimals: u8| -> Option<BigInt> {
      let exponent = TARGET_DECIMALS.checked_sub(u32::from(decimals))?;
      Some(BigInt::from(10).pow(exponent))
    };
    Some(StableSwapModel {
      amp_factor: BigInt::from(amp_factor),
      balances: [big(balances[0]), big(balances[1])],
      rates: [rate(decimals[0])?, rate(decimals[1])?],
      pool_tokens: big(pool_tokens),
    })
  }

  fn n_coins() -> BigInt {
    BigInt::from(N_COINS)
  }

  fn ann(&self) -> BigInt {
    &self.amp_factor * Self::n_coins()
  }

  /// Balances at 18 decimals.
  pub fn sim_xp(&self) -> [BigInt; 2] {
    [
      &self.balances[0] * &self.rates[0],
      &self.balances[1] * &self.rates[1],
    ]
  }

  fn d_of(&self, xp: &[BigInt; 2]) -> Option<BigInt> {
    let n = Self::n_coins();
    let s: BigInt = &xp[0] + &xp[1];
    if s.is_zero() {
      return Some(BigInt::zero());
    }
    if xp.iter().any(Zero::is_zero) {
      return None;
    }
    let ann = self.ann();
    let mut d = s.clone();
    for _ in 0..MAX_ITERATIONS {
      let mut d_p = d.clone();
      for x in xp {
        d_p = d_p * &d / (&n * x);
      }
      let numerator = (&ann * &s + &d_p * &n) * &d;
      let denominator = (&ann - 1) * &d + (&n + 1) * &d_p;
      let next: BigInt = numerator / denominator;
      let step: BigInt = &next - &d;
      if step.abs() <= BigInt::one() {
        return Some(next);
      }
      d = next;
    }
    None
  }

  /// Invariant at 18 decimals.
  pub fn sim_d(&self) -> Option<BigInt> {
    self.d_of(&self.sim_xp())
  }

  /// Upscaled reserve `j` once reserve `i` holds the upscaled `x`.
  ///
  /// `b = S + D / Ann - D` is allowed to be negative, which the fixed
  /// precision solver avoids by subtracting `D` in every step instead.
  pub fn sim_y(&self, i: usize, j: usize, x: &BigInt) -> Option<BigInt> {
    let n = Self::n_coins();
    let d = self.sim_d()?;
    let ann = self.ann();
    let xp = self.sim_xp();
    let mut others = xp.clone();
    others[i] = x.clone();
    let remaining: Vec<&BigInt> = others
      .iter()
      .enumerate()
      .filter(|(k, _)| *k != j)
      .map(|(_, v)| v)
      .collect();

    let mut c = d.clone();
    let mut s = BigInt::zero();
    for y in remaining {
      if y.is_zero() {
        return None;
      }
      c = c * &d / (y * &n);
      s += y;
    }
    c = c * &d / (&n * &ann);
    let b: BigInt = s + &d / &ann - &d;

    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
      let next: BigInt = (&y * &y + &c) / (&y * 2 + &b);
      let step: BigInt = &next - &y;
      if step.abs() <= BigInt::one() {
        return Some(next);
      }
      y = next;
    }
    None
  }

  /// Destination tokens out for `dx` source tokens, in raw units.
  pub fn sim_dy(&self, i: usize, j: usize, dx: u128) -> Option<u128> {
    let xp = self.sim_xp();
    let x: BigInt = &xp[i] + big(dx) * &self.rates[i];
    let y = self.sim_y(i, j, &x)?;
    let dy: BigInt = &xp[j] - y;
    if dy.is_negative() {
      return Some(0);
    }
    let out: BigInt = dy / &self.rates[j];
    out.to_u128()
  }

  /// Pool tokens minted for a single-sided deposit, rounded down.
  pub fn sim_deposit_single(&self, i: usize, amount: u128) -> Option<u128> {
    let d0 = self.sim_d()?;
    let mut xp = self.sim_xp();
    xp[i] += big(amount) * &self.rates[i];
    let d1 = self.d_of(&xp)?;
    if d0.is_zero() {
      return None;
    }
    let minted: BigInt = &self.pool_tokens * (d1 - &d0) / d0;
    minted.to_u128()
  }

  /// Pool tokens burned to withdraw exactly `amount` of token `i`, rounded
  /// up.
  pub fn sim_withdraw_single(&self, i: usize, amount: u128) -> Option<u128> {
    if big(amount) >= self.balances[i] {
      return None;
    }
    let d0 = self.sim_d()?;
    let mut xp = self.sim_xp();
    xp[i] -= big(amount) * &self.rates[i];
    let d1 = self.d_of(&xp)?;
    if d0.is_zero() {
      return None;
    }
    let burned = ceil_div(&(&self.pool_tokens * (&d0 - d1)), &d0);
    burned.to_u128()
  }

  /// Applies a swap to the model balances and returns the output.
  pub fn sim_exchange(&mut self, i: usize, j: usize, dx: u128) -> Option<u128> {
    let dy = self.sim_dy(i, j, dx)?;
    self.balances[i] += big(dx);
    self.balances[j] -= big(dy);
    Some(dy)
  }
}
