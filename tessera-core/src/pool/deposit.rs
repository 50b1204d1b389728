use anchor_lang::prelude::*;

use super::{
  checked_add, checked_sub, OperationResult, PoolConfig, ReserveSnapshot,
  TokenAmounts,
};
use crate::curve::{RoundDirection, SwapCurve, TradeDirection};
use crate::error::CoreError::{SlippageExceeded, ZeroTradingTokens};
use crate::fees::FeeSplit;

impl PoolConfig {
  /// Deposits both tokens in proportion to the reserves for exactly
  /// `pool_token_amount` new pool tokens. Required amounts round up.
  ///
  /// # Errors
  /// * `OperationDisabled` while withdrawals-only
  /// * `UnsupportedCurveOperation` on curves without deposits
  /// * `SlippageExceeded` when either side costs more than its maximum
  /// * `ZeroTradingTokens` when either side rounds to zero
  pub fn deposit_all_token_types(
    &self,
    pool: &ReserveSnapshot,
    pool_token_amount: u128,
    maximum_token_a_amount: u128,
    maximum_token_b_amount: u128,
  ) -> Result<OperationResult> {
    msg!(
      "Deposit inputs: pool_token_amount={}, maximum_token_a_amount={}, maximum_token_b_amount={}",
      pool_token_amount,
      maximum_token_a_amount,
      maximum_token_b_amount
    );
    self.ensure_deposits("deposit_all_token_types")?;
    msg!("Deposit pool: curve={}, {}", self.curve, pool);

    let tokens = self.curve.pool_tokens_to_trading_tokens(
      pool_token_amount,
      pool.pool_token_supply,
      pool.reserve_a,
      pool.reserve_b,
      RoundDirection::Ceiling,
    )?;
    if tokens.token_a_amount > maximum_token_a_amount {
      msg!(
        "SlippageExceeded: token_a_amount={} > maximum_token_a_amount={}",
        tokens.token_a_amount,
        maximum_token_a_amount
      );
      return Err(SlippageExceeded.into());
    }
    if tokens.token_b_amount > maximum_token_b_amount {
      msg!(
        "SlippageExceeded: token_b_amount={} > maximum_token_b_amount={}",
        tokens.token_b_amount,
        maximum_token_b_amount
      );
      return Err(SlippageExceeded.into());
    }
    if tokens.token_a_amount == 0 || tokens.token_b_amount == 0 {
      return Err(ZeroTradingTokens.into());
    }

    let new_reserves = ReserveSnapshot::new(
      checked_add(pool.reserve_a, tokens.token_a_amount)?,
      checked_add(pool.reserve_b, tokens.token_b_amount)?,
      checked_add(pool.pool_token_supply, pool_token_amount)?,
    );
    msg!(
      "Deposit outputs: token_a_amount={}, token_b_amount={}, pool_token_amount={}",
      tokens.token_a_amount,
      tokens.token_b_amount,
      pool_token_amount
    );
    Ok(OperationResult {
      trade_direction: None,
      amount_in: TokenAmounts::trading_tokens(
        tokens.token_a_amount,
        tokens.token_b_amount,
      ),
      amount_out: TokenAmounts::pool_tokens(pool_token_amount),
      source_amount_less_fees: pool_token_amount,
      fees: FeeSplit::default(),
      new_reserves,
    })
  }

  /// Deposits one token, charged as if half of it were swapped for the
  /// other side. The whole deposit, fees included, stays in the reserve.
  ///
  /// # Errors
  /// * `OperationDisabled` while withdrawals-only
  /// * `UnsupportedCurveOperation` on curves without deposits
  /// * `SlippageExceeded` when fewer than `minimum_pool_token_amount` mint
  /// * `ZeroTradingTokens` when nothing mints
  pub fn deposit_single_token_type(
    &self,
    pool: &ReserveSnapshot,
    trade_direction: TradeDirection,
    source_amount: u128,
    minimum_pool_token_amount: u128,
  ) -> Result<OperationResult> {
    msg!(
      "Deposit inputs: trade_direction={}, source_amount={}, minimum_pool_token_amount={}",
      trade_direction,
      source_amount,
      minimum_pool_token_amount
    );
    self.ensure_deposits("deposit_single_token_type")?;
    msg!("Deposit pool: curve={}, {}", self.curve, pool);

    let fees = self.fees.single_sided_deposit_fees(source_amount)?;
    let source_amount_less_fees = checked_sub(source_amount, fees.total()?)?;
    let pool_token_amount = self.curve.deposit_single_token_type(
      source_amount_less_fees,
      pool.reserve_a,
      pool.reserve_b,
      pool.pool_token_supply,
      trade_direction,
    )?;
    if pool_token_amount < minimum_pool_token_amount {
      msg!(
        "SlippageExceeded: pool_token_amount={} < minimum_pool_token_amount={}",
        pool_token_amount,
        minimum_pool_token_amount
      );
      return Err(SlippageExceeded.into());
    }
    if pool_token_amount == 0 {
      return Err(ZeroTradingTokens.into());
    }

    let (reserve_in, reserve_out) = pool.reserves(trade_direction);
    let new_reserves = pool
      .with_reserves(
        trade_direction,
        checked_add(reserve_in, source_amount)?,
        reserve_out,
      )
      .with_supply(checked_add(pool.pool_token_supply, pool_token_amount)?);
    msg!(
      "Deposit outputs: pool_token_amount={}, trade_fee={}, owner_fee={}",
      pool_token_amount,
      fees.trade_fee,
      fees.owner_fee
    );
    Ok(OperationResult {
      trade_direction: Some(trade_direction),
      amount_in: TokenAmounts::source_side(trade_direction, source_amount),
      amount_out: TokenAmounts::pool_tokens(pool_token_amount),
      source_amount_less_fees,
      fees,
      new_reserves,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::curve::{CurveParameters, INITIAL_POOL_TOKEN_SUPPLY};
  use crate::error::CoreError::{
    InsufficientLiquidity, OperationDisabled, UnsupportedCurveOperation,
  };
  use crate::fees::Fees;
  use crate::fixed_ratio::FixedRatio;
  use crate::pool::UpdatePoolConfig;

  fn pool() -> ReserveSnapshot {
    ReserveSnapshot::new(1_000_000, 4_000_000, INITIAL_POOL_TOKEN_SUPPLY)
  }

  fn fees() -> Fees {
    Fees {
      trade_fee: FixedRatio::new(25, 10_000),
      owner_trade_fee: FixedRatio::new(5, 10_000),
      ..Fees::default()
    }
  }

  #[test]
  fn deposit_all_rounds_up() -> Result<()> {
    let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
    let pool = ReserveSnapshot::new(1_000, 3_001, 1_000_000);
    let out = config.deposit_all_token_types(&pool, 1_000, u128::MAX, u128::MAX)?;
    // 1_000 * 3_001 / 1_000_000 = 3.001
    assert_eq!(out.amount_in.token_a, 1);
    assert_eq!(out.amount_in.token_b, 4);
    assert_eq!(out.new_reserves, ReserveSnapshot::new(1_001, 3_005, 1_001_000));
    Ok(())
  }

  #[test]
  fn deposit_all_respects_maximums() -> Result<()> {
    let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
    let supply = INITIAL_POOL_TOKEN_SUPPLY;
    let out = config.deposit_all_token_types(&pool(), supply / 10, 100_000, 399_999);
    assert_eq!(out.err(), Some(SlippageExceeded.into()));
    let out = config.deposit_all_token_types(&pool(), supply / 10, 100_000, 400_000)?;
    assert_eq!(out.amount_in, TokenAmounts::trading_tokens(100_000, 400_000));
    Ok(())
  }

  #[test]
  fn deposit_all_dust_rejected() -> Result<()> {
    let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
    let out = config.deposit_all_token_types(&pool(), 1, u128::MAX, u128::MAX);
    assert_eq!(out.err(), Some(ZeroTradingTokens.into()));
    Ok(())
  }

  #[test]
  fn deposit_single_charges_half_fee() -> Result<()> {
    let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
    let out = config.deposit_single_token_type(
      &pool(),
      TradeDirection::AtoB,
      1_000_000,
      0,
    )?;
    // fees on 500_000: 1_250 trade + 250 owner
    assert_eq!(out.fees.trade_fee, 1_250);
    assert_eq!(out.fees.owner_fee, 250);
    assert_eq!(out.fees.total()?, 1_500);
    assert_eq!(out.source_amount_less_fees, 998_500);
    assert_eq!(out.new_reserves.reserve_a, 2_000_000);
    assert_eq!(out.new_reserves.reserve_b, 4_000_000);
    let no_fee = PoolConfig::new(Fees::default(), CurveParameters::ConstantProduct)?
      .deposit_single_token_type(&pool(), TradeDirection::AtoB, 1_000_000, 0)?;
    assert!(out.amount_out.pool_token < no_fee.amount_out.pool_token);
    assert_eq!(no_fee.amount_out.pool_token, 414_213_562);
    Ok(())
  }

  #[test]
  fn deposit_single_minimum() -> Result<()> {
    let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
    let out = config.deposit_single_token_type(
      &pool(),
      TradeDirection::BtoA,
      10_000,
      u128::MAX,
    );
    assert_eq!(out.err(), Some(SlippageExceeded.into()));
    Ok(())
  }

  #[test]
  fn deposits_blocked() -> Result<()> {
    let mut config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
    config.update(UpdatePoolConfig::WithdrawalsOnly(true))?;
    let all = config.deposit_all_token_types(&pool(), 1_000, u128::MAX, u128::MAX);
    assert_eq!(all.err(), Some(OperationDisabled.into()));
    let single =
      config.deposit_single_token_type(&pool(), TradeDirection::AtoB, 1_000, 0);
    assert_eq!(single.err(), Some(OperationDisabled.into()));

    let offset = PoolConfig::new(fees(), CurveParameters::offset(1_000))?;
    let all = offset.deposit_all_token_types(&pool(), 1_000, u128::MAX, u128::MAX);
    assert_eq!(all.err(), Some(UnsupportedCurveOperation.into()));
    Ok(())
  }

  #[test]
  fn deposit_into_empty_pool() -> Result<()> {
    let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
    let empty = ReserveSnapshot::default();
    let out =
      config.deposit_single_token_type(&empty, TradeDirection::AtoB, 1_000, 0);
    assert_eq!(out.err(), Some(InsufficientLiquidity.into()));
    let out = config.deposit_all_token_types(&empty, 1_000, u128::MAX, u128::MAX);
    assert_eq!(out.err(), Some(InsufficientLiquidity.into()));
    Ok(())
  }
}
