use crate::config::{BacktestConfig, PositionTiming, SharpeBasis};
use crate::error::BacktestError;
use crate::metrics::{excess_sharpe_ratio, max_drawdown, sharpe_ratio};
use crate::result::BacktestResult;
use crate::signal::Signal;

/// Cost of moving from `from` to `to` at `price`.
pub fn rebalance_cost(from: i32, to: i32, price: f64, transaction_cost_pct: f64) -> f64 {
    let traded_notional = f64::from((to - from).abs()) * price;
    traded_notional * transaction_cost_pct
}

/// Single-asset signal backtester.
///
/// Holds only its configuration, so one instance can serve any number of
/// independent runs, including concurrent ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backtester {
    config: BacktestConfig,
}

impl Backtester {
    pub fn new(initial_capital: f64, transaction_cost_pct: f64, risk_free_rate: f64) -> Self {
        Self::with_config(BacktestConfig::new(
            initial_capital,
            transaction_cost_pct,
            risk_free_rate,
        ))
    }

    pub fn with_config(config: BacktestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Runs the backtest.
    ///
    /// Empty, single-element or length-mismatched inputs produce an empty
    /// result with zero statistics instead of an error; use [`Self::try_run`]
    /// to have those reported.
    pub fn run(&self, prices: &[f64], signals: &[Signal], dt_in_years: f64) -> BacktestResult {
        let n = prices.len();
        if n == 0 || signals.len() != n || n == 1 {
            return BacktestResult::default();
        }

        let mut result = BacktestResult::with_len(n);
        let mut equity = self.config.initial_capital;
        let mut current_position = 0_i32;

        // Step 0 is always flat, whatever signals[0] says.
        result.equity_curve[0] = equity;

        for i in 1..n {
            let desired = signals[i].value();
            let price_change = prices[i] - prices[i - 1];

            if self.config.position_timing == PositionTiming::NextStep {
                let step_pnl = f64::from(current_position) * price_change;
                result.pnl[i] += step_pnl;
                equity += step_pnl;
            }

            if desired != current_position {
                let cost = rebalance_cost(
                    current_position,
                    desired,
                    prices[i],
                    self.config.transaction_cost_pct,
                );
                equity -= cost;
                result.pnl[i] -= cost;
                current_position = desired;
            }

            if self.config.position_timing == PositionTiming::SameStep {
                let step_pnl = f64::from(current_position) * price_change;
                result.pnl[i] += step_pnl;
                equity += step_pnl;
            }

            result.position[i] = current_position;
            result.equity_curve[i] = equity;
        }

        result.total_return = equity / self.config.initial_capital - 1.0;
        result.max_drawdown = max_drawdown(&result.equity_curve);
        result.sharpe_ratio = self.sharpe(&result.pnl, dt_in_years);

        result
    }

    /// Strict variant of [`Self::run`]: rejects inputs the legacy path
    /// silently turns into an empty result, plus invalid configuration.
    pub fn try_run(
        &self,
        prices: &[f64],
        signals: &[Signal],
        dt_in_years: f64,
    ) -> Result<BacktestResult, BacktestError> {
        self.config.validate()?;

        if !dt_in_years.is_finite() || dt_in_years <= 0.0 {
            return Err(BacktestError::InvalidTimeStep);
        }
        if prices.is_empty() {
            return Err(BacktestError::EmptySeries);
        }
        if signals.len() != prices.len() {
            return Err(BacktestError::LengthMismatch {
                prices: prices.len(),
                signals: signals.len(),
            });
        }
        if prices.len() < 2 {
            return Err(BacktestError::InsufficientObservations { len: prices.len() });
        }
        if let Some(index) = prices.iter().position(|price| !price.is_finite()) {
            return Err(BacktestError::NonFinitePrice { index });
        }

        Ok(self.run(prices, signals, dt_in_years))
    }

    fn sharpe(&self, pnl: &[f64], dt_in_years: f64) -> f64 {
        match self.config.sharpe_basis {
            SharpeBasis::RawPnl => sharpe_ratio(pnl, dt_in_years),
            SharpeBasis::ExcessOfRiskFree => {
                let risk_free_per_step =
                    self.config.initial_capital * self.config.risk_free_rate * dt_in_years;
                excess_sharpe_ratio(pnl, dt_in_years, risk_free_per_step)
            }
        }
    }
}

impl Default for Backtester {
    fn default() -> Self {
        Self::with_config(BacktestConfig::default())
    }
}
