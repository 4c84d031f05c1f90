use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete target position: -1 short, 0 flat, +1 long.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Signal {
    Short,
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn value(self) -> i32 {
        match self {
            Self::Short => -1,
            Self::Flat => 0,
            Self::Long => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    OutOfRange { index: usize, value: i64 },
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, value } => {
                write!(f, "signal at index {index} is {value}, expected -1, 0 or 1")
            }
        }
    }
}

impl std::error::Error for SignalError {}

impl TryFrom<i64> for Signal {
    type Error = SignalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Short),
            0 => Ok(Self::Flat),
            1 => Ok(Self::Long),
            _ => Err(SignalError::OutOfRange { index: 0, value }),
        }
    }
}

impl From<Signal> for i64 {
    fn from(signal: Signal) -> Self {
        i64::from(signal.value())
    }
}

/// Converts an integer series, reporting the first out-of-range index.
pub fn signals_from_ints(values: &[i64]) -> Result<Vec<Signal>, SignalError> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            Signal::try_from(value).map_err(|_| SignalError::OutOfRange { index, value })
        })
        .collect()
}
