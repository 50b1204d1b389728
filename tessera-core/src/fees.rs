use anchor_lang::prelude::*;

use crate::error::CoreError::MathOverflow;
use crate::fixed_ratio::{pre_fee_amount, FixedRatio};

/// Fee schedule attached to a pool at creation.
///
/// Trade fees stay in the pool for liquidity providers, owner fees go to the
/// pool owner's fee vault, and the host fee is a slice of the owner fee paid
/// to the front end that routed the trade.
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
pub struct Fees {
  pub trade_fee: FixedRatio,
  pub owner_trade_fee: FixedRatio,
  pub owner_withdraw_fee: FixedRatio,
  pub host_fee: FixedRatio,
}

/// Fee tiers charged on a single trading amount.
///
/// `owner_fee` is already net of `host_fee`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FeeSplit {
  pub trade_fee: u128,
  pub owner_fee: u128,
  pub host_fee: u128,
}

impl FeeSplit {
  pub fn total(&self) -> Result<u128> {
    self
      .trade_fee
      .checked_add(self.owner_fee)
      .and_then(|t| t.checked_add(self.host_fee))
      .ok_or(MathOverflow.into())
  }
}

impl Fees {
  #[must_use]
  pub fn new(
    trade_fee: FixedRatio,
    owner_trade_fee: FixedRatio,
    owner_withdraw_fee: FixedRatio,
    host_fee: FixedRatio,
  ) -> Fees {
    Fees {
      trade_fee,
      owner_trade_fee,
      owner_withdraw_fee,
      host_fee,
    }
  }

  pub fn trading_fee(&self, trading_tokens: u128) -> Result<u128> {
    self.trade_fee.fee(trading_tokens)
  }

  pub fn owner_trading_fee(&self, trading_tokens: u128) -> Result<u128> {
    self.owner_trade_fee.fee(trading_tokens)
  }

  /// Owner fee on withdrawals, denominated in pool tokens.
  pub fn owner_withdraw_fee(&self, pool_tokens: u128) -> Result<u128> {
    self.owner_withdraw_fee.fee(pool_tokens)
  }

  /// Host share of an owner fee.
  pub fn host_fee(&self, owner_fee: u128) -> Result<u128> {
    self.host_fee.fee(owner_fee)
  }

  /// Trade and owner fees are both taken from the same gross amount, then
  /// the host fee is sliced out of the owner fee.
  pub fn trading_fees(
    &self,
    amount: u128,
    host_fee_enabled: bool,
  ) -> Result<FeeSplit> {
    let trade_fee = self.trading_fee(amount)?;
    let owner_fee = self.owner_trading_fee(amount)?;
    self.split_owner_fee(trade_fee, owner_fee, host_fee_enabled)
  }

  /// Splits a gross owner fee (trade or withdraw) into owner and host parts.
  pub fn split_owner_fee(
    &self,
    trade_fee: u128,
    owner_fee: u128,
    host_fee_enabled: bool,
  ) -> Result<FeeSplit> {
    let host_fee = if host_fee_enabled {
      self.host_fee(owner_fee)?
    } else {
      0
    };
    Ok(FeeSplit {
      trade_fee,
      owner_fee: owner_fee.checked_sub(host_fee).ok_or(MathOverflow)?,
      host_fee,
    })
  }

  /// Fees charged on a single-sided deposit, modelled as swapping half of
  /// the deposit for the other side. Host fees never apply.
  pub fn single_sided_deposit_fees(
    &self,
    source_amount: u128,
  ) -> Result<FeeSplit> {
    let half = (source_amount / 2).max(1);
    self.trading_fees(half, false)
  }

  /// Gross amount needed so that trade plus owner fees leave
  /// `post_fee_amount`, rounded up.
  pub fn pre_trading_fee_amount(
    &self,
    post_fee_amount: u128,
  ) -> Result<u128> {
    let trade = self.trade_fee;
    let owner = self.owner_trade_fee;
    if trade.is_disabled() {
      owner.pre_fee_amount(post_fee_amount)
    } else if owner.is_disabled() {
      trade.pre_fee_amount(post_fee_amount)
    } else {
      // n_t / d_t + n_o / d_o over a common denominator
      let tn = u128::from(trade.numerator);
      let td = u128::from(trade.denominator);
      let on = u128::from(owner.numerator);
      let od = u128::from(owner.denominator);
      let numerator = tn
        .checked_mul(od)
        .zip(on.checked_mul(td))
        .and_then(|(a, b)| a.checked_add(b))
        .ok_or(MathOverflow)?;
      let denominator = td.checked_mul(od).ok_or(MathOverflow)?;
      pre_fee_amount(post_fee_amount, numerator, denominator)
    }
  }

  /// Loads an exact single-sided withdrawal with the inverse half fee.
  ///
  /// # Errors
  /// * `MathOverflow` when trade plus owner trade fee reach 100%
  pub fn single_sided_withdraw_amount(
    &self,
    destination_amount: u128,
  ) -> Result<u128> {
    let half = destination_amount
      .checked_add(1)
      .map(|a| a / 2)
      .ok_or(MathOverflow)?;
    let pre_fee_half = self.pre_trading_fee_amount(half)?;
    (destination_amount - half)
      .checked_add(pre_fee_half)
      .ok_or(MathOverflow.into())
  }

  /// Every ratio must be at most 100%.
  pub fn validate(&self) -> Result<()> {
    self.trade_fee.validate()?;
    self.owner_trade_fee.validate()?;
    self.owner_withdraw_fee.validate()?;
    self.host_fee.validate()
  }
}

/// Validation run at pool creation and on every fee update.
pub fn validate_fee_config(fees: &Fees) -> Result<()> {
  fees.validate()
}
