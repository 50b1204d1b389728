use anchor_lang::prelude::*;

use super::{
  checked_add, checked_sub, OperationResult, PoolConfig, ReserveSnapshot,
  TokenAmounts,
};
use crate::curve::{SwapCurve, TradeDirection};
use crate::error::CoreError::{
  InsufficientLiquidity, SlippageExceeded, ZeroTradingTokens,
};
use crate::fees::FeeSplit;

impl PoolConfig {
  /// Swaps `amount_in` of the source token for the destination token.
  ///
  /// Trade and owner fees are taken from the gross input. The whole input,
  /// fees included, is added to the source reserve.
  ///
  /// # Errors
  /// * `OperationDisabled` while withdrawals-only
  /// * `ZeroTradingTokens` when a non-zero input buys nothing
  /// * `SlippageExceeded` when the output is below `minimum_amount_out`
  pub fn swap(
    &self,
    pool: &ReserveSnapshot,
    trade_direction: TradeDirection,
    amount_in: u128,
    minimum_amount_out: u128,
    host_fee_enabled: bool,
  ) -> Result<OperationResult> {
    msg!(
      "Swap inputs: trade_direction={}, amount_in={}, minimum_amount_out={}",
      trade_direction,
      amount_in,
      minimum_amount_out
    );
    self.ensure_active("swap")?;
    msg!("Swap pool: curve={}, {}", self.curve, pool);

    let (reserve_in, reserve_out) = pool.reserves(trade_direction);
    let result = if amount_in == 0 {
      OperationResult {
        trade_direction: Some(trade_direction),
        amount_in: TokenAmounts::default(),
        amount_out: TokenAmounts::default(),
        source_amount_less_fees: 0,
        fees: FeeSplit::default(),
        new_reserves: *pool,
      }
    } else {
      let fees = self.fees.trading_fees(amount_in, host_fee_enabled)?;
      let total_fees = fees.total()?;
      let source_amount_less_fees = checked_sub(amount_in, total_fees)?;
      let swapped = self.curve.swap_without_fees(
        source_amount_less_fees,
        reserve_in,
        reserve_out,
        trade_direction,
      )?;
      let amount_out = swapped.destination_amount_swapped;
      if amount_out == 0 {
        msg!("ZeroTradingTokens: amount_in={} buys nothing", amount_in);
        return Err(ZeroTradingTokens.into());
      }
      if amount_out > reserve_out {
        return Err(InsufficientLiquidity.into());
      }
      // a constant price curve may leave part of the net input unswapped
      let source_amount =
        checked_add(swapped.source_amount_swapped, total_fees)?;
      OperationResult {
        trade_direction: Some(trade_direction),
        amount_in: TokenAmounts::source_side(trade_direction, source_amount),
        amount_out: TokenAmounts::source_side(
          trade_direction.reverse(),
          amount_out,
        ),
        source_amount_less_fees: swapped.source_amount_swapped,
        fees,
        new_reserves: pool.with_reserves(
          trade_direction,
          checked_add(reserve_in, source_amount)?,
          checked_sub(reserve_out, amount_out)?,
        ),
      }
    };

    let (_, amount_out) = trade_direction
      .source_first(result.amount_out.token_a, result.amount_out.token_b);
    if amount_out < minimum_amount_out {
      msg!(
        "SlippageExceeded: amount_out={} < minimum_amount_out={}",
        amount_out,
        minimum_amount_out
      );
      return Err(SlippageExceeded.into());
    }
    msg!(
      "Swap outputs: amount_in={}, amount_out={}, trade_fee={}, owner_fee={}, host_fee={}",
      result.amount_in,
      amount_out,
      result.fees.trade_fee,
      result.fees.owner_fee,
      result.fees.host_fee
    );
    Ok(result)
  }
}
