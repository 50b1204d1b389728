use crate::error::CoreError::{SlippageArithmetic, SlippageExceeded};

use anchor_lang::prelude::*;
use fix::prelude::*;
use fix::typenum::Integer;

/// Client quote paired with a tolerance, turned into the raw bounds the
/// pool operations take.
#[derive(Debug, AnchorSerialize, AnchorDeserialize)]
pub struct SlippageConfig {
  expected_amount: UFixValue64,
  slippage_tolerance: UFixValue64,
}

impl SlippageConfig {
  #[must_use]
  pub fn new<Exp: Integer>(
    expected_amount: UFix64<Exp>,
    slippage_tolerance: UFix64<N4>,
  ) -> SlippageConfig {
    SlippageConfig {
      expected_amount: expected_amount.into(),
      slippage_tolerance: slippage_tolerance.into(),
    }
  }

  pub fn expected_amount<Exp: Integer>(&self) -> Result<UFix64<Exp>> {
    self.expected_amount.try_into()
  }

  pub fn slippage_tolerance(&self) -> Result<UFix64<N4>> {
    self.slippage_tolerance.try_into()
  }

  /// `expected * (1 - tolerance)` in base units, for `minimum_amount_out`
  /// style bounds.
  pub fn minimum_amount_out<Exp: Integer>(&self) -> Result<u128> {
    let expected = self.expected_amount::<Exp>()?;
    let tolerance = self.slippage_tolerance()?;
    let minimum = UFix64::<N4>::one()
      .checked_sub(&tolerance)
      .and_then(|factor| expected.mul_div_floor(factor, UFix64::one()))
      .ok_or(SlippageArithmetic)?;
    Ok(u128::from(minimum.bits))
  }

  /// `expected * (1 + tolerance)` in base units, for `maximum_amount_in`
  /// style bounds.
  pub fn maximum_amount_in<Exp: Integer>(&self) -> Result<u128> {
    let expected = self.expected_amount::<Exp>()?;
    let tolerance = self.slippage_tolerance()?;
    let maximum = UFix64::<N4>::one()
      .checked_add(&tolerance)
      .and_then(|factor| expected.mul_div_ceil(factor, UFix64::one()))
      .ok_or(SlippageArithmetic)?;
    Ok(u128::from(maximum.bits))
  }

  /// Checks an output against the lowest tolerable amount.
  pub fn validate_amount_out<Exp: Integer>(&self, amount: u128) -> Result<()> {
    if amount >= self.minimum_amount_out::<Exp>()? {
      Ok(())
    } else {
      Err(SlippageExceeded.into())
    }
  }

  /// Checks a cost against the highest tolerable amount.
  pub fn validate_amount_in<Exp: Integer>(&self, amount: u128) -> Result<()> {
    if amount <= self.maximum_amount_in::<Exp>()? {
      Ok(())
    } else {
      Err(SlippageExceeded.into())
    }
  }
}
