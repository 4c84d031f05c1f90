mod config;
mod engine;
mod error;
mod generators;
pub mod metrics;
mod result;
mod signal;

pub use config::{BacktestConfig, PositionTiming, SharpeBasis};
pub use engine::{rebalance_cost, Backtester};
pub use error::BacktestError;
pub use generators::SeriesGenerator;
pub use metrics::{max_drawdown, sharpe_ratio};
pub use result::BacktestResult;
pub use signal::{signals_from_ints, Signal, SignalError};

/// Trading days per year used for daily data.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sample scenario used by the demo entry point.
pub mod sample {
    pub const PRICES: [f64; 20] = [
        100.0, 101.0, 102.0, 101.0, 100.0, 99.0, 98.0, 99.0, 100.0, 102.0, 101.0, 100.0, 99.0,
        98.0, 97.0, 98.0, 99.0, 100.0, 101.0, 103.0,
    ];

    pub const SIGNALS: [i64; 20] = [
        0, 0, -1, 0, 0, 1, 1, 0, 0, -1, 0, 0, 1, 1, 0, 0, 0, 0, 0, -1,
    ];

    pub const INITIAL_CAPITAL: f64 = 100_000.0;
    pub const TRANSACTION_COST_PCT: f64 = 0.001;
    pub const RISK_FREE_RATE: f64 = 0.0;
}
