use anchor_lang::prelude::*;
use fix::prelude::*;

use crate::curve::math::mul_div;
use crate::curve::RoundDirection;
use crate::error::CoreError::{InvalidFeeConfiguration, MathOverflow};

/// Denominator used when a ratio is expressed in basis points.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fraction `numerator / denominator` applied to token amounts.
///
/// A zero denominator disables the ratio: [`FixedRatio::fee`] yields zero
/// and never divides.
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
pub struct FixedRatio {
  pub numerator: u64,
  pub denominator: u64,
}

impl FixedRatio {
  #[must_use]
  pub const fn new(numerator: u64, denominator: u64) -> FixedRatio {
    FixedRatio {
      numerator,
      denominator,
    }
  }

  /// Ratio that always yields zero.
  #[must_use]
  pub const fn disabled() -> FixedRatio {
    FixedRatio::new(0, 0)
  }

  /// Builds a ratio from a basis point value, e.g. `UFix64::<N4>::new(25)`
  /// for 0.25%.
  #[must_use]
  pub fn from_bps(bps: UFix64<N4>) -> FixedRatio {
    FixedRatio::new(bps.bits, BPS_DENOMINATOR)
  }

  #[must_use]
  pub fn is_disabled(&self) -> bool {
    self.denominator == 0 || self.numerator == 0
  }

  /// `floor(amount * numerator / denominator)`, or zero when disabled.
  pub fn fee(&self, amount: u128) -> Result<u128> {
    if self.is_disabled() || amount == 0 {
      Ok(0)
    } else {
      mul_div(
        amount,
        u128::from(self.numerator),
        u128::from(self.denominator),
        RoundDirection::Floor,
      )
    }
  }

  /// Gross amount `ceil(post * denominator / (denominator - numerator))`,
  /// which always leaves at least `post_fee_amount` after [`Self::fee`].
  ///
  /// # Errors
  /// * `MathOverflow` for a ratio of 100% or more, which has no finite
  ///   gross amount for a non-zero `post_fee_amount`
  pub fn pre_fee_amount(&self, post_fee_amount: u128) -> Result<u128> {
    pre_fee_amount(
      post_fee_amount,
      u128::from(self.numerator),
      u128::from(self.denominator),
    )
  }

  /// Numerator may not exceed the denominator, which also rejects a
  /// non-zero numerator over a zero denominator.
  pub fn validate(&self) -> Result<()> {
    if self.numerator > self.denominator {
      Err(InvalidFeeConfiguration.into())
    } else {
      Ok(())
    }
  }
}

pub(crate) fn pre_fee_amount(
  post_fee_amount: u128,
  numerator: u128,
  denominator: u128,
) -> Result<u128> {
  if numerator == 0 || denominator == 0 || post_fee_amount == 0 {
    Ok(post_fee_amount)
  } else {
    let remainder = denominator
      .checked_sub(numerator)
      .filter(|remainder| *remainder > 0)
      .ok_or(MathOverflow)?;
    mul_div(post_fee_amount, denominator, remainder, RoundDirection::Ceiling)
  }
}
