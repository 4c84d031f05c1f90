use backtest_core::BacktestResult;

use crate::error::MonitorError;

/// Simple per-step returns of an equity curve; the first step is 0.
pub fn step_returns(equity_curve: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(equity_curve.len());
    if equity_curve.is_empty() {
        return returns;
    }

    returns.push(0.0);
    for pair in equity_curve.windows(2) {
        let change = if pair[0] != 0.0 {
            pair[1] / pair[0] - 1.0
        } else {
            0.0
        };
        returns.push(change);
    }

    returns
}

pub fn result_returns(result: &BacktestResult) -> Vec<f64> {
    step_returns(&result.equity_curve)
}

/// Trailing-window annualised Sharpe ratio.
///
/// Entry `i` covers `samples[i + 1 - window..=i]`. It is `None` until the
/// window is full, and wherever the window's population standard deviation
/// is zero or the ratio is not finite.
pub fn rolling_sharpe(
    samples: &[f64],
    window: usize,
    annualization: f64,
) -> Result<Vec<Option<f64>>, MonitorError> {
    if window == 0 {
        return Err(MonitorError::InvalidWindow);
    }
    if !annualization.is_finite() || annualization <= 0.0 {
        return Err(MonitorError::InvalidAnnualization);
    }

    let scale = annualization.sqrt();
    let out = (0..samples.len())
        .map(|end| {
            if end + 1 < window {
                return None;
            }
            let slice = &samples[end + 1 - window..=end];
            window_sharpe(slice).map(|ratio| ratio * scale)
        })
        .collect();

    Ok(out)
}

/// Latest value of [`rolling_sharpe`], if any.
pub fn latest_rolling_sharpe(
    samples: &[f64],
    window: usize,
    annualization: f64,
) -> Result<Option<f64>, MonitorError> {
    let series = rolling_sharpe(samples, window, annualization)?;
    Ok(series.last().copied().flatten())
}

fn window_sharpe(slice: &[f64]) -> Option<f64> {
    let n = slice.len() as f64;
    let mean = slice.iter().sum::<f64>() / n;
    let variance = slice.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return None;
    }

    Some(mean / std_dev).filter(|ratio| ratio.is_finite())
}
