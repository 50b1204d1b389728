//! Pool operations over a reserve snapshot.
//!
//! [`PoolConfig`] carries the fee schedule, the curve and the operating
//! mode. Each operation borrows a [`ReserveSnapshot`], computes every amount
//! up front and returns an [`OperationResult`] holding the snapshot the
//! caller should commit. Nothing is applied on failure.

mod deposit;
mod swap;
mod withdraw;

use std::fmt::Display;

use anchor_lang::prelude::*;

pub use self::withdraw::FeeWithdrawal;
use crate::curve::{
  validate_curve_config, CurveParameters, SwapCurve, TradeDirection,
  INITIAL_POOL_TOKEN_SUPPLY,
};
use crate::error::CoreError::{
  MathOverflow, OperationDisabled, UnsupportedCurveOperation,
};
use crate::fees::{validate_fee_config, FeeSplit, Fees};

/// Operating mode of a pool.
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
pub enum PoolMode {
  /// Swaps, deposits, withdrawals and fee sweeps.
  #[default]
  Active,
  /// Only withdrawals and fee sweeps.
  WithdrawalsOnly,
}

impl Display for PoolMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PoolMode::Active => f.write_str("Active"),
      PoolMode::WithdrawalsOnly => f.write_str("WithdrawalsOnly"),
    }
  }
}

/// Admin config update. The curve is fixed at creation and has no variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum UpdatePoolConfig {
  WithdrawalsOnly(bool),
  Fees(Fees),
}

/// Point-in-time pool balances.
#[derive(
  Copy,
  Clone,
  Debug,
  Default,
  PartialEq,
  Eq,
  AnchorSerialize,
  AnchorDeserialize,
)]
pub struct ReserveSnapshot {
  pub reserve_a: u128,
  pub reserve_b: u128,
  pub pool_token_supply: u128,
}

impl ReserveSnapshot {
  #[must_use]
  pub fn new(
    reserve_a: u128,
    reserve_b: u128,
    pool_token_supply: u128,
  ) -> ReserveSnapshot {
    ReserveSnapshot {
      reserve_a,
      reserve_b,
      pool_token_supply,
    }
  }

  /// `(source, destination)` reserves for a direction.
  #[must_use]
  pub fn reserves(&self, trade_direction: TradeDirection) -> (u128, u128) {
    trade_direction.source_first(self.reserve_a, self.reserve_b)
  }

  /// Snapshot with source and destination reserves replaced.
  #[must_use]
  pub fn with_reserves(
    &self,
    trade_direction: TradeDirection,
    source: u128,
    destination: u128,
  ) -> ReserveSnapshot {
    let (reserve_a, reserve_b) =
      trade_direction.source_first(source, destination);
    ReserveSnapshot {
      reserve_a,
      reserve_b,
      pool_token_supply: self.pool_token_supply,
    }
  }

  #[must_use]
  pub fn with_supply(&self, pool_token_supply: u128) -> ReserveSnapshot {
    ReserveSnapshot {
      pool_token_supply,
      ..*self
    }
  }
}

impl Display for ReserveSnapshot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "reserve_a={} reserve_b={} pool_token_supply={}",
      self.reserve_a, self.reserve_b, self.pool_token_supply
    )
  }
}

/// Token and pool token amounts moved in one direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenAmounts {
  pub token_a: u128,
  pub token_b: u128,
  pub pool_token: u128,
}

impl TokenAmounts {
  #[must_use]
  pub fn pool_tokens(pool_token: u128) -> TokenAmounts {
    TokenAmounts {
      pool_token,
      ..TokenAmounts::default()
    }
  }

  #[must_use]
  pub fn trading_tokens(token_a: u128, token_b: u128) -> TokenAmounts {
    TokenAmounts {
      token_a,
      token_b,
      pool_token: 0,
    }
  }

  /// Single trading token on the `trade_direction` source side.
  #[must_use]
  pub fn source_side(
    trade_direction: TradeDirection,
    amount: u128,
  ) -> TokenAmounts {
    let (token_a, token_b) = trade_direction.source_first(amount, 0);
    TokenAmounts::trading_tokens(token_a, token_b)
  }
}

impl Display for TokenAmounts {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "token_a={} token_b={} pool_token={}",
      self.token_a, self.token_b, self.pool_token
    )
  }
}

/// Outcome of a pool operation, ready to be committed by the ledger.
///
/// `amount_in` is what the user pays and `amount_out` what the user
/// receives. Fee tiers are denominated in the source token for swaps and
/// single-sided deposits and in pool tokens for withdrawals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OperationResult {
  pub trade_direction: Option<TradeDirection>,
  pub amount_in: TokenAmounts,
  pub amount_out: TokenAmounts,
  /// Amount priced by the curve once every fee tier is removed.
  pub source_amount_less_fees: u128,
  pub fees: FeeSplit,
  pub new_reserves: ReserveSnapshot,
}

/// Fee schedule, curve and mode of one pool.
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
pub struct PoolConfig {
  pub fees: Fees,
  pub curve: CurveParameters,
  pub mode: PoolMode,
}

impl PoolConfig {
  /// Validated config for a new, active pool.
  pub fn new(fees: Fees, curve: CurveParameters) -> Result<PoolConfig> {
    validate_fee_config(&fees)?;
    validate_curve_config(&curve)?;
    Ok(PoolConfig {
      fees,
      curve,
      mode: PoolMode::Active,
    })
  }

  /// Applies an admin update. Authorisation is the caller's concern.
  pub fn update(&mut self, update: UpdatePoolConfig) -> Result<()> {
    match update {
      UpdatePoolConfig::WithdrawalsOnly(enabled) => {
        self.mode = if enabled {
          PoolMode::WithdrawalsOnly
        } else {
          PoolMode::Active
        };
        msg!("Pool mode: {}", self.mode);
      }
      UpdatePoolConfig::Fees(fees) => {
        validate_fee_config(&fees)?;
        self.fees = fees;
        msg!("Pool fees updated: {:?}", self.fees);
      }
    }
    Ok(())
  }

  fn ensure_active(&self, operation: &str) -> Result<()> {
    match self.mode {
      PoolMode::Active => Ok(()),
      PoolMode::WithdrawalsOnly => {
        msg!("OperationDisabled: {} while pool is {}", operation, self.mode);
        Err(OperationDisabled.into())
      }
    }
  }

  fn ensure_deposits(&self, operation: &str) -> Result<()> {
    self.ensure_active(operation)?;
    if self.curve.allows_deposits() {
      Ok(())
    } else {
      msg!("UnsupportedCurveOperation: {} on {}", operation, self.curve);
      Err(UnsupportedCurveOperation.into())
    }
  }

  /// Checks the initial reserves and mints the initial pool token supply.
  ///
  /// # Errors
  /// * `EmptySupply` when the curve needs a reserve that is empty
  pub fn initialize_pool(
    &self,
    initial_token_a: u128,
    initial_token_b: u128,
  ) -> Result<OperationResult> {
    msg!(
      "Initialize inputs: curve={}, initial_token_a={}, initial_token_b={}",
      self.curve,
      initial_token_a,
      initial_token_b
    );
    validate_fee_config(&self.fees)?;
    validate_curve_config(&self.curve)?;
    self
      .curve
      .validate_supply(initial_token_a, initial_token_b)?;
    let new_reserves = ReserveSnapshot::new(
      initial_token_a,
      initial_token_b,
      INITIAL_POOL_TOKEN_SUPPLY,
    );
    msg!("Initialize outputs: {}", new_reserves);
    Ok(OperationResult {
      trade_direction: None,
      amount_in: TokenAmounts::trading_tokens(initial_token_a, initial_token_b),
      amount_out: TokenAmounts::pool_tokens(INITIAL_POOL_TOKEN_SUPPLY),
      source_amount_less_fees: 0,
      fees: FeeSplit::default(),
      new_reserves,
    })
  }
}

pub(crate) fn checked_add(a: u128, b: u128) -> Result<u128> {
  a.checked_add(b).ok_or(MathOverflow.into())
}

pub(crate) fn checked_sub(a: u128, b: u128) -> Result<u128> {
  a.checked_sub(b).ok_or(MathOverflow.into())
}
