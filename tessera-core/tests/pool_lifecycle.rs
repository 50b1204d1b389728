//! A pool driven through every operation, threading the reserve snapshot.

use anchor_lang::Result;
use fix::prelude::*;
use tessera_core::curve::{CurveParameters, TradeDirection};
use tessera_core::error::CoreError;
use tessera_core::fees::Fees;
use tessera_core::fixed_ratio::FixedRatio;
use tessera_core::pool::{PoolConfig, ReserveSnapshot, UpdatePoolConfig};
use tessera_core::slippage_config::SlippageConfig;

fn fees() -> Fees {
  Fees {
    trade_fee: FixedRatio::new(25, 10_000),
    owner_trade_fee: FixedRatio::new(5, 10_000),
    owner_withdraw_fee: FixedRatio::new(1, 100),
    host_fee: FixedRatio::new(20, 100),
  }
}

#[test]
fn constant_product_lifecycle() -> Result<()> {
  let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;

  let init = config.initialize_pool(1_000_000, 4_000_000)?;
  let pool = init.new_reserves;
  assert_eq!(pool, ReserveSnapshot::new(1_000_000, 4_000_000, 1_000_000_000));

  let deposit =
    config.deposit_all_token_types(&pool, 100_000_000, 100_000, 400_000)?;
  let pool = deposit.new_reserves;
  assert_eq!(pool, ReserveSnapshot::new(1_100_000, 4_400_000, 1_100_000_000));

  let quote = config.swap(&pool, TradeDirection::AtoB, 100_000, 0, true)?;
  let slippage = SlippageConfig::new(
    UFix64::<N6>::new(u64::try_from(quote.amount_out.token_b).expect("quote")),
    UFix64::new(25),
  );
  let minimum_amount_out = slippage.minimum_amount_out::<N6>()?;
  assert_eq!(minimum_amount_out, 364_743);
  let swap = config.swap(
    &pool,
    TradeDirection::AtoB,
    100_000,
    minimum_amount_out,
    true,
  )?;
  assert_eq!(swap.fees.trade_fee, 250);
  assert_eq!(swap.fees.owner_fee, 40);
  assert_eq!(swap.fees.host_fee, 10);
  assert_eq!(swap.amount_out.token_b, 365_658);
  let pool = swap.new_reserves;
  assert_eq!(pool, ReserveSnapshot::new(1_200_000, 4_034_342, 1_100_000_000));

  let withdraw =
    config.withdraw_all_token_types(&pool, 100_000_000, 0, 0, true)?;
  assert_eq!(withdraw.fees.owner_fee, 800_000);
  assert_eq!(withdraw.fees.host_fee, 200_000);
  assert_eq!(withdraw.amount_out.token_a, 108_000);
  assert_eq!(withdraw.amount_out.token_b, 363_090);
  let pool = withdraw.new_reserves;
  assert_eq!(pool, ReserveSnapshot::new(1_092_000, 3_671_252, 1_001_000_000));

  let sweep = config.withdraw_fees(withdraw.fees.total()?, u128::MAX)?;
  assert_eq!(sweep.pool_token_amount, 1_000_000);
  assert_eq!(sweep.remaining_fee_balance, 0);
  Ok(())
}

#[test]
fn quoted_bounds_catch_a_moved_pool() -> Result<()> {
  let config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
  let pool = config.initialize_pool(1_000_000, 1_000_000)?.new_reserves;
  let tolerance = UFix64::<N4>::new(10);

  let quote = config.swap(&pool, TradeDirection::AtoB, 10_000, 0, true)?;
  let minimum_amount_out = SlippageConfig::new(
    UFix64::<N6>::new(u64::try_from(quote.amount_out.token_b).expect("quote")),
    tolerance,
  )
  .minimum_amount_out::<N6>()?;

  let cost = config.withdraw_single_token_type(
    &pool,
    TradeDirection::BtoA,
    10_000,
    u128::MAX,
    true,
  )?;
  let maximum_pool_token_amount = SlippageConfig::new(
    UFix64::<N6>::new(u64::try_from(cost.amount_in.pool_token).expect("cost")),
    tolerance,
  )
  .maximum_amount_in::<N6>()?;

  // an earlier trade in the same direction moves both prices
  let moved = config
    .swap(&pool, TradeDirection::AtoB, 50_000, 0, true)?
    .new_reserves;
  let swap = config.swap(
    &moved,
    TradeDirection::AtoB,
    10_000,
    minimum_amount_out,
    true,
  );
  assert_eq!(swap.err(), Some(CoreError::SlippageExceeded.into()));
  let withdraw = config.withdraw_single_token_type(
    &moved,
    TradeDirection::BtoA,
    10_000,
    maximum_pool_token_amount,
    true,
  );
  assert_eq!(withdraw.err(), Some(CoreError::SlippageExceeded.into()));

  let swap = config.swap(
    &pool,
    TradeDirection::AtoB,
    10_000,
    minimum_amount_out,
    true,
  )?;
  assert_eq!(swap.amount_out.token_b, quote.amount_out.token_b);
  let withdraw = config.withdraw_single_token_type(
    &pool,
    TradeDirection::BtoA,
    10_000,
    maximum_pool_token_amount,
    true,
  )?;
  assert_eq!(withdraw.amount_in.pool_token, cost.amount_in.pool_token);
  Ok(())
}

#[test]
fn withdrawals_only_round_trip() -> Result<()> {
  let mut config = PoolConfig::new(fees(), CurveParameters::ConstantProduct)?;
  let pool = config.initialize_pool(1_000_000, 1_000_000)?.new_reserves;

  config.update(UpdatePoolConfig::WithdrawalsOnly(true))?;
  let swap = config.swap(&pool, TradeDirection::BtoA, 1_000, 0, false);
  assert_eq!(swap.err(), Some(CoreError::OperationDisabled.into()));
  let deposit = config.deposit_single_token_type(
    &pool,
    TradeDirection::AtoB,
    1_000,
    0,
  );
  assert_eq!(deposit.err(), Some(CoreError::OperationDisabled.into()));

  let withdraw = config.withdraw_single_token_type(
    &pool,
    TradeDirection::AtoB,
    10_000,
    u128::MAX,
    false,
  )?;
  assert_eq!(withdraw.amount_out.token_a, 10_000);
  let pool = withdraw.new_reserves;
  assert_eq!(pool.reserve_a, 990_000);

  config.update(UpdatePoolConfig::WithdrawalsOnly(false))?;
  let swap = config.swap(&pool, TradeDirection::BtoA, 1_000, 0, false)?;
  assert!(swap.amount_out.token_a > 0);
  Ok(())
}

#[test]
fn stable_pool_lifecycle() -> Result<()> {
  let config =
    PoolConfig::new(fees(), CurveParameters::stable_swap(100, 6, 6))?;
  let pool = config
    .initialize_pool(1_000_000_000, 1_000_000_000)?
    .new_reserves;

  let deposit = config.deposit_single_token_type(
    &pool,
    TradeDirection::AtoB,
    10_000_000,
    0,
  )?;
  let pool = deposit.new_reserves;
  assert_eq!(pool.reserve_a, 1_010_000_000);
  // D is about twice the supply, so each token mints about half a pool token
  assert!(deposit.amount_out.pool_token > 4_950_000);
  assert!(deposit.amount_out.pool_token < 5_000_000);

  let swap = config.swap(&pool, TradeDirection::AtoB, 5_000_000, 0, false)?;
  assert!(swap.amount_out.token_b < 5_000_000);
  assert!(swap.amount_out.token_b > 4_900_000);
  let pool = swap.new_reserves;

  let supply = pool.pool_token_supply;
  let withdraw = config.withdraw_all_token_types(&pool, supply, 0, 0, false)?;
  let pool = withdraw.new_reserves;
  // the withdraw fee stays behind as pool tokens in the fee vault
  assert_eq!(pool.pool_token_supply, withdraw.fees.total()?);
  assert!(pool.reserve_a > 0 && pool.reserve_b > 0);
  Ok(())
}

#[test]
fn offset_pool_trades_without_deposits() -> Result<()> {
  let config =
    PoolConfig::new(Fees::default(), CurveParameters::offset(1_000_000))?;
  let pool = config.initialize_pool(1_000_000, 0)?.new_reserves;

  let buy_b = config.swap(&pool, TradeDirection::AtoB, 100_000, 0, false);
  assert_eq!(buy_b.err(), Some(CoreError::InsufficientLiquidity.into()));

  let sell_b = config.swap(&pool, TradeDirection::BtoA, 100_000, 0, false)?;
  let pool = sell_b.new_reserves;
  assert_eq!(pool.reserve_b, 100_000);
  assert_eq!(pool.reserve_a, 1_000_000 - sell_b.amount_out.token_a);

  let deposit =
    config.deposit_all_token_types(&pool, 1_000, u128::MAX, u128::MAX);
  assert_eq!(
    deposit.err(),
    Some(CoreError::UnsupportedCurveOperation.into())
  );
  Ok(())
}
