#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)]

pub mod curve;
pub mod error;
pub mod fees;
pub mod fixed_ratio;
pub mod pool;
pub mod slippage_config;
