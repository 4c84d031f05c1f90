//! Reductions over a completed run.

/// Largest peak-to-trough decline as a fraction of the running peak.
///
/// Points seen while the running peak is not positive contribute nothing,
/// so a zero or negative starting equity never divides by zero.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };

    let mut max_peak = first;
    let mut max_dd = 0.0;

    for &equity in equity_curve {
        if equity > max_peak {
            max_peak = equity;
        }
        if max_peak <= 0.0 {
            continue;
        }

        let dd = (max_peak - equity) / max_peak;
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}

/// Annualised Sharpe ratio of a per-step P&L series.
///
/// Uses the population variance over the whole series, first element
/// included, and scales the per-step ratio by `sqrt(1 / dt_in_years)`.
pub fn sharpe_ratio(pnl: &[f64], dt_in_years: f64) -> f64 {
    if pnl.len() <= 1 || dt_in_years <= 0.0 {
        return 0.0;
    }

    let n = pnl.len() as f64;
    let mean = pnl.iter().sum::<f64>() / n;
    let variance = pnl
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;

    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return 0.0;
    }

    mean / std_dev * (1.0 / dt_in_years).sqrt()
}

/// Sharpe ratio after removing a constant per-step risk-free P&L.
pub fn excess_sharpe_ratio(pnl: &[f64], dt_in_years: f64, risk_free_pnl_per_step: f64) -> f64 {
    let excess: Vec<f64> = pnl.iter().map(|x| x - risk_free_pnl_per_step).collect();
    sharpe_ratio(&excess, dt_in_years)
}

#[cfg(test)]
mod tests {
    use super::{excess_sharpe_ratio, max_drawdown, sharpe_ratio};

    #[test]
    fn empty_curve_has_no_drawdown() {
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn non_decreasing_curve_has_no_drawdown() {
        assert_eq!(max_drawdown(&[100.0, 100.0, 101.0, 105.0, 105.0]), 0.0);
    }

    #[test]
    fn drawdown_is_measured_from_running_peak() {
        let dd = max_drawdown(&[100.0, 120.0, 90.0, 110.0, 60.0, 130.0]);

        assert!((dd - 0.5).abs() < 1e-12);
    }

    #[test]
    fn drawdown_stays_within_unit_interval_for_positive_curves() {
        let dd = max_drawdown(&[1_000.0, 1.0, 0.5, 2_000.0, 0.001]);

        assert!(dd > 0.0);
        assert!(dd <= 1.0);
    }

    #[test]
    fn zero_peak_does_not_divide_by_zero() {
        let dd = max_drawdown(&[0.0, 0.0, -5.0]);

        assert_eq!(dd, 0.0);
    }

    #[test]
    fn sharpe_is_zero_for_short_series_or_bad_dt() {
        assert_eq!(sharpe_ratio(&[], 1.0 / 252.0), 0.0);
        assert_eq!(sharpe_ratio(&[5.0], 1.0 / 252.0), 0.0);
        assert_eq!(sharpe_ratio(&[1.0, 2.0, 3.0], 0.0), 0.0);
        assert_eq!(sharpe_ratio(&[1.0, 2.0, 3.0], -1.0), 0.0);
    }

    #[test]
    fn constant_series_has_zero_sharpe() {
        assert_eq!(sharpe_ratio(&[0.0; 10], 1.0 / 252.0), 0.0);
        assert_eq!(sharpe_ratio(&[2.5; 10], 1.0 / 252.0), 0.0);
    }

    #[test]
    fn sharpe_uses_population_variance() {
        // mean 1, population std 1, dt 1/4 -> 1 * sqrt(4)
        let sharpe = sharpe_ratio(&[0.0, 2.0, 0.0, 2.0], 0.25);

        assert!((sharpe - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sharpe_sign_follows_mean() {
        assert!(sharpe_ratio(&[0.0, -1.0, -2.0, 0.5], 1.0 / 252.0) < 0.0);
        assert!(sharpe_ratio(&[0.0, 1.0, 2.0, -0.5], 1.0 / 252.0) > 0.0);
    }

    #[test]
    fn excess_sharpe_with_zero_rate_matches_raw() {
        let pnl = [0.0, 1.0, -0.5, 2.0];

        assert_eq!(excess_sharpe_ratio(&pnl, 0.25, 0.0), sharpe_ratio(&pnl, 0.25));
    }

    #[test]
    fn excess_sharpe_lowers_the_ratio_for_positive_rate() {
        let pnl = [0.0, 1.0, -0.5, 2.0];

        assert!(excess_sharpe_ratio(&pnl, 0.25, 0.2) < sharpe_ratio(&pnl, 0.25));
    }
}
