use anchor_lang::prelude::*;

use super::constant_product;
use super::{SwapCurve, SwapWithoutFees, TradeDirection};
use crate::error::CoreError::{
  EmptySupply, InsufficientLiquidity, InvalidCurveType, MathOverflow,
  UnsupportedCurveOperation,
};

/// Constant product with `token_b_offset` virtual B tokens.
///
/// Lets a creator bootstrap a pool with token A only. Deposits are refused:
/// a depositor sharing the virtual reserve could withdraw real tokens that
/// back it.
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
pub struct OffsetCurve {
  pub token_b_offset: u64,
}

impl OffsetCurve {
  fn virtual_b(&self, token_b_amount: u128) -> Result<u128> {
    token_b_amount
      .checked_add(u128::from(self.token_b_offset))
      .ok_or(MathOverflow.into())
  }
}

impl SwapCurve for OffsetCurve {
  fn swap_without_fees(
    &self,
    source_amount: u128,
    pool_source_amount: u128,
    pool_destination_amount: u128,
    trade_direction: TradeDirection,
  ) -> Result<SwapWithoutFees> {
    let out = match trade_direction {
      TradeDirection::AtoB => constant_product::swap(
        source_amount,
        pool_source_amount,
        self.virtual_b(pool_destination_amount)?,
      )?,
      TradeDirection::BtoA => constant_product::swap(
        source_amount,
        self.virtual_b(pool_source_amount)?,
        pool_destination_amount,
      )?,
    };
    // the virtual reserve can price more B than the pool holds
    if out.destination_amount_swapped > pool_destination_amount {
      return Err(InsufficientLiquidity.into());
    }
    Ok(out)
  }

  fn deposit_single_token_type(
    &self,
    _source_amount: u128,
    _pool_token_a_amount: u128,
    _pool_token_b_amount: u128,
    _pool_token_supply: u128,
    _trade_direction: TradeDirection,
  ) -> Result<u128> {
    Err(UnsupportedCurveOperation.into())
  }

  fn withdraw_single_token_type_exact_out(
    &self,
    destination_amount: u128,
    pool_token_a_amount: u128,
    pool_token_b_amount: u128,
    pool_token_supply: u128,
    trade_direction: TradeDirection,
  ) -> Result<u128> {
    let (real_reserve, _) =
      trade_direction.source_first(pool_token_a_amount, pool_token_b_amount);
    if destination_amount >= real_reserve {
      return Err(InsufficientLiquidity.into());
    }
    let (reserve, _) = trade_direction.source_first(
      pool_token_a_amount,
      self.virtual_b(pool_token_b_amount)?,
    );
    constant_product::withdraw_single_token_type_exact_out(
      destination_amount,
      reserve,
      pool_token_supply,
    )
  }

  fn validate(&self) -> Result<()> {
    if self.token_b_offset == 0 {
      Err(InvalidCurveType.into())
    } else {
      Ok(())
    }
  }

  fn validate_supply(&self, token_a_amount: u128, _: u128) -> Result<()> {
    if token_a_amount == 0 {
      Err(EmptySupply.into())
    } else {
      Ok(())
    }
  }

  fn allows_deposits(&self) -> bool {
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::curve::INITIAL_POOL_TOKEN_SUPPLY;

  #[test]
  fn swap_prices_against_virtual_b() -> Result<()> {
    let curve = OffsetCurve {
      token_b_offset: 1_000_000,
    };
    let with_offset =
      curve.swap_without_fees(100_000, 0, 1_000_000, TradeDirection::BtoA)?;
    let plain = constant_product::swap(100_000, 1_000_000, 1_000_000)?;
    assert_eq!(with_offset, plain);
    Ok(())
  }

  #[test]
  fn cannot_sell_into_empty_b() {
    let curve = OffsetCurve {
      token_b_offset: 1_000_000,
    };
    let out = curve.swap_without_fees(100_000, 1_000_000, 0, TradeDirection::AtoB);
    assert_eq!(out.err(), Some(InsufficientLiquidity.into()));
  }

  #[test]
  fn withdraw_limited_to_real_reserve() -> Result<()> {
    let curve = OffsetCurve { token_b_offset: 500 };
    let out = curve.withdraw_single_token_type_exact_out(
      10,
      1_000,
      10,
      INITIAL_POOL_TOKEN_SUPPLY,
      TradeDirection::BtoA,
    );
    assert_eq!(out.err(), Some(InsufficientLiquidity.into()));
    let burned = curve.withdraw_single_token_type_exact_out(
      5,
      1_000,
      10,
      INITIAL_POOL_TOKEN_SUPPLY,
      TradeDirection::BtoA,
    )?;
    assert!(burned > 0);
    Ok(())
  }
}
