use anchor_lang::prelude::*;

use super::{
  checked_add, checked_sub, OperationResult, PoolConfig, ReserveSnapshot,
  TokenAmounts,
};
use crate::curve::{RoundDirection, SwapCurve, TradeDirection};
use crate::error::CoreError::{
  InsufficientLiquidity, SlippageExceeded, ZeroTradingTokens,
};

/// Pool tokens swept out of the owner fee vault.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FeeWithdrawal {
  pub pool_token_amount: u128,
  pub remaining_fee_balance: u128,
}

impl PoolConfig {
  /// Redeems pool tokens for both reserves, rounded down.
  ///
  /// The owner withdraw fee is taken in pool tokens first and moves to the
  /// fee vault; only the remainder is burned and redeemed. Allowed in every
  /// mode.
  ///
  /// # Errors
  /// * `ZeroTradingTokens` for zero pool tokens or when nothing is redeemed
  /// * `InsufficientLiquidity` for more pool tokens than the supply
  /// * `SlippageExceeded` when either side is below its minimum
  pub fn withdraw_all_token_types(
    &self,
    pool: &ReserveSnapshot,
    pool_token_amount: u128,
    minimum_token_a_amount: u128,
    minimum_token_b_amount: u128,
    host_fee_enabled: bool,
  ) -> Result<OperationResult> {
    msg!(
      "Withdraw inputs: pool_token_amount={}, minimum_token_a_amount={}, minimum_token_b_amount={}",
      pool_token_amount,
      minimum_token_a_amount,
      minimum_token_b_amount
    );
    msg!("Withdraw pool: curve={}, {}", self.curve, pool);
    if pool_token_amount == 0 {
      return Err(ZeroTradingTokens.into());
    }
    if pool_token_amount > pool.pool_token_supply {
      return Err(InsufficientLiquidity.into());
    }

    let withdraw_fee = self.fees.owner_withdraw_fee(pool_token_amount)?;
    let fees = self
      .fees
      .split_owner_fee(0, withdraw_fee, host_fee_enabled)?;
    let burned = checked_sub(pool_token_amount, withdraw_fee)?;
    let tokens = self.curve.pool_tokens_to_trading_tokens(
      burned,
      pool.pool_token_supply,
      pool.reserve_a,
      pool.reserve_b,
      RoundDirection::Floor,
    )?;
    if tokens.token_a_amount < minimum_token_a_amount {
      msg!(
        "SlippageExceeded: token_a_amount={} < minimum_token_a_amount={}",
        tokens.token_a_amount,
        minimum_token_a_amount
      );
      return Err(SlippageExceeded.into());
    }
    if tokens.token_b_amount < minimum_token_b_amount {
      msg!(
        "SlippageExceeded: token_b_amount={} < minimum_token_b_amount={}",
        tokens.token_b_amount,
        minimum_token_b_amount
      );
      return Err(SlippageExceeded.into());
    }
    if tokens.token_a_amount == 0 && tokens.token_b_amount == 0 {
      return Err(ZeroTradingTokens.into());
    }

    let new_reserves = ReserveSnapshot::new(
      checked_sub(pool.reserve_a, tokens.token_a_amount)?,
      checked_sub(pool.reserve_b, tokens.token_b_amount)?,
      checked_sub(pool.pool_token_supply, burned)?,
    );
    msg!(
      "Withdraw outputs: token_a_amount={}, token_b_amount={}, pool_tokens_burned={}, withdraw_fee={}",
      tokens.token_a_amount,
      tokens.token_b_amount,
      burned,
      withdraw_fee
    );
    Ok(OperationResult {
      trade_direction: None,
      amount_in: TokenAmounts::pool_tokens(pool_token_amount),
      amount_out: TokenAmounts::trading_tokens(
        tokens.token_a_amount,
        tokens.token_b_amount,
      ),
      source_amount_less_fees: burned,
      fees,
      new_reserves,
    })
  }

  /// Withdraws exactly `destination_amount` of one token.
  ///
  /// The amount is loaded with the inverse of the half-swap fee before the
  /// curve prices it, and the owner withdraw fee is added on top of the
  /// pool tokens burned.
  ///
  /// # Errors
  /// * `ZeroTradingTokens` for a zero amount or a zero cost
  /// * `InsufficientLiquidity` when the reserve cannot cover the amount
  /// * `SlippageExceeded` when the cost exceeds `maximum_pool_token_amount`
  pub fn withdraw_single_token_type(
    &self,
    pool: &ReserveSnapshot,
    trade_direction: TradeDirection,
    destination_amount: u128,
    maximum_pool_token_amount: u128,
    host_fee_enabled: bool,
  ) -> Result<OperationResult> {
    msg!(
      "Withdraw inputs: trade_direction={}, destination_amount={}, maximum_pool_token_amount={}",
      trade_direction,
      destination_amount,
      maximum_pool_token_amount
    );
    msg!("Withdraw pool: curve={}, {}", self.curve, pool);
    if destination_amount == 0 {
      return Err(ZeroTradingTokens.into());
    }

    let loaded_amount = self.fees.single_sided_withdraw_amount(destination_amount)?;
    let burned = self.curve.withdraw_single_token_type_exact_out(
      loaded_amount,
      pool.reserve_a,
      pool.reserve_b,
      pool.pool_token_supply,
      trade_direction,
    )?;
    let withdraw_fee = self.fees.owner_withdraw_fee(burned)?;
    let pool_token_amount = checked_add(burned, withdraw_fee)?;
    msg!(
      "Withdraw fee: fee={}, pool_token_amount={}",
      withdraw_fee,
      pool_token_amount
    );
    if pool_token_amount > maximum_pool_token_amount {
      msg!(
        "SlippageExceeded: pool_token_amount={} > maximum_pool_token_amount={}",
        pool_token_amount,
        maximum_pool_token_amount
      );
      return Err(SlippageExceeded.into());
    }
    if burned == 0 {
      return Err(ZeroTradingTokens.into());
    }

    let fees = self
      .fees
      .split_owner_fee(0, withdraw_fee, host_fee_enabled)?;
    let (reserve_out, other) = pool.reserves(trade_direction);
    let new_reserves = pool
      .with_reserves(
        trade_direction,
        checked_sub(reserve_out, destination_amount)?,
        other,
      )
      .with_supply(checked_sub(pool.pool_token_supply, burned)?);
    msg!(
      "Withdraw outputs: destination_amount={}, pool_tokens_burned={}",
      destination_amount,
      burned
    );
    Ok(OperationResult {
      trade_direction: Some(trade_direction),
      amount_in: TokenAmounts::pool_tokens(pool_token_amount),
      amount_out: TokenAmounts::source_side(trade_direction, destination_amount),
      source_amount_less_fees: burned,
      fees,
      new_reserves,
    })
  }

  /// Sweeps up to `requested` pool tokens out of the fee vault.
  ///
  /// Over-asking is clamped to the balance. Allowed in every mode;
  /// authorisation is the caller's concern.
  ///
  /// # Errors
  /// * `ZeroTradingTokens` for a zero request or an empty vault
  pub fn withdraw_fees(
    &self,
    fee_vault_balance: u128,
    requested: u128,
  ) -> Result<FeeWithdrawal> {
    msg!(
      "Withdraw fees inputs: requested={}, fee_vault_balance={}",
      requested,
      fee_vault_balance
    );
    if requested == 0 || fee_vault_balance == 0 {
      return Err(ZeroTradingTokens.into());
    }
    let pool_token_amount = requested.min(fee_vault_balance);
    let remaining_fee_balance = fee_vault_balance - pool_token_amount;
    msg!(
      "Withdraw fees outputs: pool_token_amount={}, remaining_fee_balance={}",
      pool_token_amount,
      remaining_fee_balance
    );
    Ok(FeeWithdrawal {
      pool_token_amount,
      remaining_fee_balance,
    })
  }
}
