use anchor_lang::prelude::*;

use super::math::mul_div;
use super::{RoundDirection, SwapCurve, SwapWithoutFees, TradeDirection};
use crate::error::CoreError::{
  EmptySupply, InsufficientLiquidity, InvalidCurveType, MathOverflow,
};

/// Fixed exchange rate: one token B is worth `token_b_price` token A.
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
pub struct ConstantPriceCurve {
  pub token_b_price: u64,
}

impl ConstantPriceCurve {
  fn price(&self) -> u128 {
    u128::from(self.token_b_price)
  }

  /// Pool value in units of token A.
  fn total_value(&self, token_a: u128, token_b: u128) -> Result<u128> {
    token_b
      .checked_mul(self.price())
      .and_then(|b| b.checked_add(token_a))
      .ok_or(MathOverflow.into())
  }

  fn deposit_value(
    &self,
    amount: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    match trade_direction {
      TradeDirection::AtoB => Ok(amount),
      TradeDirection::BtoA => {
        amount.checked_mul(self.price()).ok_or(MathOverflow.into())
      }
    }
  }

  fn value_to_pool_tokens(
    &self,
    amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
    round: RoundDirection,
  ) -> Result<u128> {
    let total_value =
      self.total_value(pool_token_a_amount, pool_token_b_amount)?;
    if total_value == 0 || pool_token_supply == 0 {
      return Err(InsufficientLiquidity.into());
    }
    let value = self.deposit_value(amount, trade_direction)?;
    mul_div(pool_token_supply, value, total_value, round)
  }
}

impl SwapCurve for ConstantPriceCurve {
  /// A to B floors the consumed source to a multiple of the price; the
  /// remainder is never taken from the user.
  fn swap_without_fees(
    &self,
    source_amount: u128,
    _pool_source_amount: u128,
    pool_destination_amount: u128,
    trade_direction: TradeDirection,
  ) -> Result<SwapWithoutFees> {
    let price = self.price();
    let (source_amount_swapped, destination_amount_swapped) =
      match trade_direction {
        TradeDirection::BtoA => (
          source_amount,
          source_amount.checked_mul(price).ok_or(MathOverflow)?,
        ),
        TradeDirection::AtoB => {
          let out = source_amount.checked_div(price).ok_or(MathOverflow)?;
          (out.checked_mul(price).ok_or(MathOverflow)?, out)
        }
      };
    if destination_amount_swapped > pool_destination_amount {
      return Err(InsufficientLiquidity.into());
    }
    Ok(SwapWithoutFees {
      source_amount_swapped,
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
    self.value_to_pool_tokens(
      source_amount,
      pool_token_a_amount,
      pool_token_b_amount,
      pool_token_supply,
      trade_direction,
      RoundDirection::Floor,
    )
  }

  fn withdraw_single_token_type_exact_out(
    &self,
    destination_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    let (reserve, _) =
      trade_direction.source_first(pool_token_a_amount, pool_token_b_amount);
    if destination_amount > reserve {
      return Err(InsufficientLiquidity.into());
    }
    self.value_to_pool_tokens(
      destination_amount,
      pool_token_a_amount,
      pool_token_b_amount,
      pool_token_supply,
      trade_direction,
      RoundDirection::Ceiling,
    )
  }

  fn validate(&self) -> Result<()> {
    if self.token_b_price == 0 {
      Err(InvalidCurveType.into())
    } else {
      Ok(())
    }
  }

  /// Token B may start empty.
  fn validate_supply(&self, token_a_amount: u128, _: u128) -> Result<()> {
    if token_a_amount == 0 {
      Err(EmptySupply.into())
    } else {
      Ok(())
    }
  }
}
