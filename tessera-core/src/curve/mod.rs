//! Pricing curves and pool token conversion.
//!
//! [`CurveParameters`] is the closed set of curves a pool can be created
//! with. Every variant implements [`SwapCurve`]; the enum dispatches with an
//! exhaustive match, so adding a curve is a compile error at every call site
//! until it is handled.

mod constant_price;
mod constant_product;
pub(crate) mod math;
mod offset;
mod stable;

use std::fmt::Display;

use anchor_lang::prelude::*;

pub use self::constant_price::ConstantPriceCurve;
pub use self::constant_product::ConstantProductCurve;
pub use self::math::pool_tokens_to_trading_tokens;
pub use self::offset::OffsetCurve;
pub use self::stable::{StableCurve, MAX_AMP, MAX_ITERATIONS, MIN_AMP};
use crate::error::CoreError::EmptySupply;

/// Pool tokens minted to the creator when a pool is initialised.
pub const INITIAL_POOL_TOKEN_SUPPLY: u128 = 1_000_000_000;

/// Which reserve receives the source tokens.
///
/// For single-sided deposits and withdrawals the direction names the side
/// being deposited or withdrawn: `AtoB` is token A.
#[derive(
  Copy, Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize,
)]
pub enum TradeDirection {
  AtoB,
  BtoA,
}

impl TradeDirection {
  #[must_use]
  pub fn reverse(self) -> TradeDirection {
    match self {
      TradeDirection::AtoB => TradeDirection::BtoA,
      TradeDirection::BtoA => TradeDirection::AtoB,
    }
  }

  /// Orders `(token_a, token_b)` as `(source, destination)`.
  #[must_use]
  pub fn source_first<T>(self, token_a: T, token_b: T) -> (T, T) {
    match self {
      TradeDirection::AtoB => (token_a, token_b),
      TradeDirection::BtoA => (token_b, token_a),
    }
  }
}

impl Display for TradeDirection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TradeDirection::AtoB => f.write_str("AtoB"),
      TradeDirection::BtoA => f.write_str("BtoA"),
    }
  }
}

/// Rounding applied when converting between pool tokens and reserves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundDirection {
  Floor,
  Ceiling,
}

/// Curve output before any fee is applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapWithoutFees {
  /// Source tokens the curve actually consumed.
  pub source_amount_swapped: u128,
  pub destination_amount_swapped: u128,
}

impl SwapWithoutFees {
  #[must_use]
  pub fn zero() -> SwapWithoutFees {
    SwapWithoutFees::default()
  }
}

/// Amounts of both trading tokens backing some number of pool tokens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TradingTokens {
  pub token_a_amount: u128,
  pub token_b_amount: u128,
}

/// Contract every pricing curve satisfies.
///
/// Reserves are passed in on every call; curves hold only their immutable
/// parameters.
pub trait SwapCurve {
  /// Output for `source_amount` entering the pool, fees already removed.
  ///
  /// # Errors
  /// * Zero reserve on an invariant curve
  /// * Arithmetic overflow or non-convergence
  fn swap_without_fees(
    &self,
    source_amount: u128,
    pool_source_amount: u128,
    pool_destination_amount: u128,
    trade_direction: TradeDirection,
  ) -> Result<SwapWithoutFees>;

  /// Pool tokens minted for a single-sided deposit, rounded down.
  ///
  /// # Errors
  /// * Zero reserve or supply
  /// * Curve does not take deposits
  fn deposit_single_token_type(
    &self,
    source_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128>;

  /// Pool tokens burned to withdraw exactly `destination_amount` from one
  /// side, rounded up.
  ///
  /// # Errors
  /// * Withdrawal would drain the reserve
  fn withdraw_single_token_type_exact_out(
    &self,
    destination_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128>;

  /// Proportional conversion used by deposit-all and withdraw-all.
  ///
  /// # Errors
  /// * Zero supply
  fn pool_tokens_to_trading_tokens(
    &self,
    pool_tokens: u128,
    pool_token_supply: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    round: RoundDirection,
  ) -> Result<TradingTokens> {
    pool_tokens_to_trading_tokens(
      pool_tokens,
      pool_token_supply,
      pool_token_a_amount,
      pool_token_b_amount,
      round,
    )
  }

  /// Curve parameter bounds.
  ///
  /// # Errors
  /// * Parameters out of range
  fn validate(&self) -> Result<()>;

  /// Initial reserves a new pool needs.
  ///
  /// # Errors
  /// * Either reserve empty
  fn validate_supply(
    &self,
    token_a_amount: u128,
    token_b_amount: u128,
  ) -> Result<()> {
    if token_a_amount == 0 || token_b_amount == 0 {
      Err(EmptySupply.into())
    } else {
      Ok(())
    }
  }

  fn allows_deposits(&self) -> bool {
    true
  }
}

/// Curve a pool prices with, fixed at creation.
#[derive(
  Copy,
  Clone,
  Debug,
  PartialEq,
  Eq,
  InitSpace,
  AnchorSerialize,
  AnchorDeserialize,
)]
pub enum CurveParameters {
  ConstantProduct,
  ConstantPrice(ConstantPriceCurve),
  Offset(OffsetCurve),
  StableSwap(StableCurve),
}

impl CurveParameters {
  #[must_use]
  pub fn constant_price(token_b_price: u64) -> CurveParameters {
    CurveParameters::ConstantPrice(ConstantPriceCurve { token_b_price })
  }

  #[must_use]
  pub fn offset(token_b_offset: u64) -> CurveParameters {
    CurveParameters::Offset(OffsetCurve { token_b_offset })
  }

  #[must_use]
  pub fn stable_swap(
    amp: u64,
    token_a_decimals: u8,
    token_b_decimals: u8,
  ) -> CurveParameters {
    CurveParameters::StableSwap(StableCurve {
      amp,
      token_a_decimals,
      token_b_decimals,
    })
  }
}

impl Display for CurveParameters {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CurveParameters::ConstantProduct => f.write_str("ConstantProduct"),
      CurveParameters::ConstantPrice(c) => {
        write!(f, "ConstantPrice({})", c.token_b_price)
      }
      CurveParameters::Offset(c) => write!(f, "Offset({})", c.token_b_offset),
      CurveParameters::StableSwap(c) => write!(
        f,
        "StableSwap({}, {}/{})",
        c.amp, c.token_a_decimals, c.token_b_decimals
      ),
    }
  }
}

impl SwapCurve for CurveParameters {
  fn swap_without_fees(
    &self,
    source_amount: u128,
    pool_source_amount: u128,
    pool_destination_amount: u128,
    trade_direction: TradeDirection,
  ) -> Result<SwapWithoutFees> {
    match self {
      CurveParameters::ConstantProduct => ConstantProductCurve.swap_without_fees(
        source_amount,
        pool_source_amount,
        pool_destination_amount,
        trade_direction,
      ),
      CurveParameters::ConstantPrice(curve) => curve.swap_without_fees(
        source_amount,
        pool_source_amount,
        pool_destination_amount,
        trade_direction,
      ),
      CurveParameters::Offset(curve) => curve.swap_without_fees(
        source_amount,
        pool_source_amount,
        pool_destination_amount,
        trade_direction,
      ),
      CurveParameters::StableSwap(curve) => curve.swap_without_fees(
        source_amount,
        pool_source_amount,
        pool_destination_amount,
        trade_direction,
      ),
    }
  }

  fn deposit_single_token_type(
    &self,
    source_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    match self {
      CurveParameters::ConstantProduct => ConstantProductCurve
        .deposit_single_token_type(
          source_amount,
          pool_token_a_amount,
          pool_token_b_amount,
          pool_token_supply,
          trade_direction,
        ),
      CurveParameters::ConstantPrice(curve) => curve.deposit_single_token_type(
        source_amount,
        pool_token_a_amount,
        pool_token_b_amount,
        pool_token_supply,
        trade_direction,
      ),
      CurveParameters::Offset(curve) => curve.deposit_single_token_type(
        source_amount,
        pool_token_a_amount,
        pool_token_b_amount,
        pool_token_supply,
        trade_direction,
      ),
      CurveParameters::StableSwap(curve) => curve.deposit_single_token_type(
        source_amount,
        pool_token_a_amount,
        pool_token_b_amount,
        pool_token_supply,
        trade_direction,
      ),
    }
  }

  fn withdraw_single_token_type_exact_out(
    &self,
    destination_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    match self {
      CurveParameters::ConstantProduct => ConstantProductCurve
        .withdraw_single_token_type_exact_out(
          destination_amount,
          pool_token_a_amount,
          pool_token_b_amount,
          pool_token_supply,
          trade_direction,
        ),
      CurveParameters::ConstantPrice(curve) => curve
        .withdraw_single_token_type_exact_out(
          destination_amount,
          pool_token_a_amount,
          pool_token_b_amount,
          pool_token_supply,
          trade_direction,
        ),
      CurveParameters::Offset(curve) => curve
        .withdraw_single_token_type_exact_out(
          destination_amount,
          pool_token_a_amount,
          pool_token_b_amount,
          pool_token_supply,
          trade_direction,
        ),
      CurveParameters::StableSwap(curve) => curve
        .withdraw_single_token_type_exact_out(
          destination_amount,
          pool_token_a_amount,
          pool_token_b_amount,
          pool_token_supply,
          trade_direction,
        ),
    }
  }

  fn validate(&self) -> Result<()> {
    match self {
      CurveParameters::ConstantProduct => ConstantProductCurve.validate(),
      CurveParameters::ConstantPrice(curve) => curve.validate(),
      CurveParameters::Offset(curve) => curve.validate(),
      CurveParameters::StableSwap(curve) => curve.validate(),
    }
  }

  fn validate_supply(
    &self,
    token_a_amount: u128,
    token_b_amount: u128,
  ) -> Result<()> {
    match self {
      CurveParameters::ConstantProduct => {
        ConstantProductCurve.validate_supply(token_a_amount, token_b_amount)
      }
      CurveParameters::ConstantPrice(curve) => {
        curve.validate_supply(token_a_amount, token_b_amount)
      }
      CurveParameters::Offset(curve) => {
        curve.validate_supply(token_a_amount, token_b_amount)
      }
      CurveParameters::StableSwap(curve) => {
        curve.validate_supply(token_a_amount, token_b_amount)
      }
    }
  }

  fn allows_deposits(&self) -> bool {
    match self {
      CurveParameters::ConstantProduct => ConstantProductCurve.allows_deposits(),
      CurveParameters::ConstantPrice(curve) => curve.allows_deposits(),
      CurveParameters::Offset(curve) => curve.allows_deposits(),
      CurveParameters::StableSwap(curve) => curve.allows_deposits(),
    }
  }
}

/// Validation run once at pool creation; curves are never updated.
///
/// # Errors
/// * `InvalidCurveType` when parameters are out of range
pub fn validate_curve_config(curve: &CurveParameters) -> Result<()> {
  curve.validate()
}
