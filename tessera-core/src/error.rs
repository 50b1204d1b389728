use anchor_lang::prelude::error_code;

#[error_code]
pub enum CoreError {
  // `curve`
  #[msg("Pool reserve or pool token supply is zero.")]
  InsufficientLiquidity = 6000,
  #[msg("Intermediate arithmetic exceeded the representable range.")]
  MathOverflow,
  #[msg("Stable swap invariant did not converge within the iteration bound.")]
  ConvergenceFailure,
  #[msg("Input amount rounds to zero tokens.")]
  ZeroTradingTokens,
  #[msg("Operation is not supported by the configured curve.")]
  UnsupportedCurveOperation,
  // `pool`
  #[msg("Computed amount violates the caller supplied bound.")]
  SlippageExceeded,
  #[msg("Swaps and deposits are disabled while the pool is withdrawals-only.")]
  OperationDisabled,
  #[msg("Initial reserves are empty for the configured curve.")]
  EmptySupply,
  // `fees`
  #[msg("Fee ratio numerator exceeds its denominator.")]
  InvalidFeeConfiguration,
  // `curve` parameters
  #[msg("Curve parameters failed validation.")]
  InvalidCurveType,
  // `slippage_config`
  #[msg("Over/underflow while computing slippage bound.")]
  SlippageArithmetic,
}
