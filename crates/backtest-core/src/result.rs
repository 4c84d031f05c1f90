use serde::{Deserialize, Serialize};

/// Output of one backtest run. Every series is index-aligned with the inputs;
/// a degenerate run leaves all of them empty and every scalar at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub equity_curve: Vec<f64>,
    pub pnl: Vec<f64>,
    pub position: Vec<i32>,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl BacktestResult {
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            equity_curve: vec![0.0; len],
            pnl: vec![0.0; len],
            position: vec![0; len],
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.equity_curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equity_curve.is_empty()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().copied()
    }

    /// Number of steps whose position differs from the previous step.
    pub fn trade_count(&self) -> usize {
        self.position
            .windows(2)
            .filter(|pair| pair[0] != pair[1])
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::BacktestResult;

    #[test]
    fn default_result_is_empty_with_zero_scalars() {
        let result = BacktestResult::default();

        assert!(result.is_empty());
        assert_eq!(result.final_equity(), None);
        assert_eq!(result.trade_count(), 0);
        assert_eq!(result.total_return, 0.0);
        assert_eq!(result.max_drawdown, 0.0);
        assert_eq!(result.sharpe_ratio, 0.0);
    }

    #[test]
    fn trade_count_counts_position_changes() {
        let result = BacktestResult {
            position: vec![0, 1, 1, -1, 0, 0],
            ..BacktestResult::default()
        };

        assert_eq!(result.trade_count(), 3);
    }
}
