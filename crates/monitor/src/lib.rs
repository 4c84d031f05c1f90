//! Rolling Sharpe monitoring and the risk decision built on it.

pub mod decision;
mod error;
pub mod rolling;
pub mod snapshot;

pub use decision::{decide, position_multiplier, DecisionThresholds, RiskDecision, RiskMode};
pub use error::MonitorError;
pub use rolling::{latest_rolling_sharpe, result_returns, rolling_sharpe, step_returns};
pub use snapshot::{SharpeSnapshot, SnapshotRow, WindowSharpe};

pub const DEFAULT_ANNUALIZATION: f64 = 252.0;
