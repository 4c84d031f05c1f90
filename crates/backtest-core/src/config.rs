use serde::{Deserialize, Serialize};

use crate::error::BacktestError;

/// When a rebalanced position starts earning the price move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionTiming {
    /// The position entered at step `i` earns the move from `i - 1` to `i`.
    #[default]
    SameStep,
    /// Lagged variant: the position held before the rebalance earns the move.
    NextStep,
}

/// Which P&L series feeds the Sharpe reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpeBasis {
    /// Raw per-step P&L; the risk-free rate is ignored.
    #[default]
    RawPnl,
    /// Per-step P&L minus `initial_capital * risk_free_rate * dt_in_years`.
    ExcessOfRiskFree,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub transaction_cost_pct: f64,
    #[serde(default)]
    pub risk_free_rate: f64,
    #[serde(default)]
    pub position_timing: PositionTiming,
    #[serde(default)]
    pub sharpe_basis: SharpeBasis,
}

impl BacktestConfig {
    pub fn new(initial_capital: f64, transaction_cost_pct: f64, risk_free_rate: f64) -> Self {
        Self {
            initial_capital,
            transaction_cost_pct,
            risk_free_rate,
            position_timing: PositionTiming::default(),
            sharpe_basis: SharpeBasis::default(),
        }
    }

    pub fn with_position_timing(mut self, position_timing: PositionTiming) -> Self {
        self.position_timing = position_timing;
        self
    }

    pub fn with_sharpe_basis(mut self, sharpe_basis: SharpeBasis) -> Self {
        self.sharpe_basis = sharpe_basis;
        self
    }

    /// Checks the values the legacy path accepts unconditionally.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(BacktestError::InvalidInitialCapital);
        }
        if !self.transaction_cost_pct.is_finite() || self.transaction_cost_pct < 0.0 {
            return Err(BacktestError::InvalidTransactionCost);
        }
        if !self.risk_free_rate.is_finite() {
            return Err(BacktestError::InvalidRiskFreeRate);
        }

        Ok(())
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self::new(100_000.0, 0.001, 0.0)
    }
}
