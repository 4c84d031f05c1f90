use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktestError {
    EmptySeries,
    LengthMismatch { prices: usize, signals: usize },
    InsufficientObservations { len: usize },
    InvalidInitialCapital,
    InvalidTransactionCost,
    InvalidRiskFreeRate,
    InvalidTimeStep,
    NonFinitePrice { index: usize },
}

impl fmt::Display for BacktestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySeries => write!(f, "price series is empty"),
            Self::LengthMismatch { prices, signals } => write!(
                f,
                "signal series length {signals} does not match price series length {prices}"
            ),
            Self::InsufficientObservations { len } => {
                write!(f, "at least 2 observations are required, got {len}")
            }
            Self::InvalidInitialCapital => {
                write!(f, "initial_capital must be finite and greater than 0")
            }
            Self::InvalidTransactionCost => {
                write!(f, "transaction_cost_pct must be finite and non-negative")
            }
            Self::InvalidRiskFreeRate => write!(f, "risk_free_rate must be finite"),
            Self::InvalidTimeStep => write!(f, "dt_in_years must be finite and greater than 0"),
            Self::NonFinitePrice { index } => write!(f, "price at index {index} is not finite"),
        }
    }
}

impl std::error::Error for BacktestError {}
