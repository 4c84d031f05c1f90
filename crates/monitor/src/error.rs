use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    InvalidWindow,
    InvalidAnnualization,
    InvalidThreshold,
    InvalidFraction,
    NoSharpeWindows,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindow => write!(f, "rolling window must be at least 1"),
            Self::InvalidAnnualization => {
                write!(f, "annualization must be finite and greater than 0")
            }
            Self::InvalidThreshold => write!(f, "sharpe thresholds must be finite"),
            Self::InvalidFraction => write!(f, "trigger fractions must be between 0 and 1"),
            Self::NoSharpeWindows => write!(f, "at least one sharpe window is required"),
        }
    }
}

impl std::error::Error for MonitorError {}
