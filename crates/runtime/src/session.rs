use backtest_core::{rebalance_cost, BacktestError, BacktestResult, Backtester, Signal};

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

/// Runs `backtester` and reports the run through `log`.
///
/// Emits `BacktestStarted`, one `Rebalanced` per position change, then
/// `BacktestCompleted`; a degenerate input logs `DegenerateInput` in place
/// of the rebalances and still returns the empty result.
pub fn run_logged(
    backtester: &Backtester,
    prices: &[f64],
    signals: &[Signal],
    dt_in_years: f64,
    log: &mut dyn RunLogWriter,
) -> BacktestResult {
    log.write(
        RunLogEvent::new(0, RunLogEventKind::BacktestStarted)
            .with_field("prices", prices.len())
            .with_field("signals", signals.len())
            .with_field("dt_in_years", dt_in_years),
    );

    let result = backtester.run(prices, signals, dt_in_years);

    if result.is_empty() {
        log.write(
            RunLogEvent::new(0, RunLogEventKind::DegenerateInput)
                .with_field("prices", prices.len())
                .with_field("signals", signals.len()),
        );
    } else {
        log_rebalances(backtester, prices, &result, log);
    }

    log_completed(&result, log);
    result
}

/// Strict counterpart of [`run_logged`]; rejected inputs log nothing past
/// `BacktestStarted`.
pub fn try_run_logged(
    backtester: &Backtester,
    prices: &[f64],
    signals: &[Signal],
    dt_in_years: f64,
    log: &mut dyn RunLogWriter,
) -> Result<BacktestResult, BacktestError> {
    log.write(
        RunLogEvent::new(0, RunLogEventKind::BacktestStarted)
            .with_field("prices", prices.len())
            .with_field("signals", signals.len())
            .with_field("dt_in_years", dt_in_years),
    );

    let result = backtester.try_run(prices, signals, dt_in_years)?;
    log_rebalances(backtester, prices, &result, log);
    log_completed(&result, log);
    Ok(result)
}

fn log_rebalances(
    backtester: &Backtester,
    prices: &[f64],
    result: &BacktestResult,
    log: &mut dyn RunLogWriter,
) {
    let cost_pct = backtester.config().transaction_cost_pct;
    for (i, pair) in result.position.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        if from == to {
            continue;
        }

        let tick = i + 1;
        let cost = rebalance_cost(from, to, prices[tick], cost_pct);
        log.write(
            RunLogEvent::new(tick as u64, RunLogEventKind::Rebalanced)
                .with_field("from", from)
                .with_field("to", to)
                .with_field("price", prices[tick])
                .with_field("cost", cost),
        );
    }
}

fn log_completed(result: &BacktestResult, log: &mut dyn RunLogWriter) {
    let last_tick = result.len().saturating_sub(1) as u64;
    log.write(
        RunLogEvent::new(last_tick, RunLogEventKind::BacktestCompleted)
            .with_field("steps", result.len())
            .with_field("trades", result.trade_count())
            .with_field("total_return", result.total_return)
            .with_field("max_drawdown", result.max_drawdown)
            .with_field("sharpe_ratio", result.sharpe_ratio),
    );
}

#[cfg(test)]
mod tests {
    use backtest_core::{sample, signals_from_ints, BacktestError, Backtester, Signal};

    use super::{run_logged, try_run_logged};
    use crate::logging::{InMemoryRunLogWriter, RunLogEventKind};

    const DT: f64 = 1.0 / 252.0;

    #[test]
    fn logs_one_rebalance_per_position_change() {
        let backtester = Backtester::default();
        let signals = signals_from_ints(&sample::SIGNALS).unwrap();
        let mut log = InMemoryRunLogWriter::new();

        let result = run_logged(&backtester, &sample::PRICES, &signals, DT, &mut log);

        let ticks: Vec<u64> = log
            .events()
            .iter()
            .filter(|event| event.kind == RunLogEventKind::Rebalanced)
            .map(|event| event.tick)
            .collect();
        assert_eq!(ticks, vec![2, 3, 5, 7, 9, 10, 12, 14, 19]);
        assert_eq!(log.events()[0].kind, RunLogEventKind::BacktestStarted);

        let completed = log.events().last().unwrap();
        assert_eq!(completed.kind, RunLogEventKind::BacktestCompleted);
        assert_eq!(completed.tick, 19);
        assert_eq!(completed.field("trades"), Some("9"));
        assert_eq!(result, backtester.run(&sample::PRICES, &signals, DT));
    }

    #[test]
    fn rebalance_event_carries_cost() {
        let backtester = Backtester::new(1_000.0, 0.25, 0.0);
        let mut log = InMemoryRunLogWriter::new();

        run_logged(
            &backtester,
            &[100.0, 50.0],
            &[Signal::Flat, Signal::Short],
            DT,
            &mut log,
        );

        let rebalance = &log.events()[1];
        assert_eq!(rebalance.kind, RunLogEventKind::Rebalanced);
        assert_eq!(rebalance.field("from"), Some("0"));
        assert_eq!(rebalance.field("to"), Some("-1"));
        assert_eq!(rebalance.field("cost"), Some("12.5"));
    }

    #[test]
    fn degenerate_input_is_logged_not_raised() {
        let backtester = Backtester::default();
        let mut log = InMemoryRunLogWriter::new();

        let result = run_logged(&backtester, &[100.0], &[Signal::Long], DT, &mut log);

        assert!(result.is_empty());
        assert_eq!(
            log.kinds(),
            vec![
                RunLogEventKind::BacktestStarted,
                RunLogEventKind::DegenerateInput,
                RunLogEventKind::BacktestCompleted,
            ]
        );
    }

    #[test]
    fn strict_run_stops_logging_on_error() {
        let backtester = Backtester::default();
        let mut log = InMemoryRunLogWriter::new();

        let err = try_run_logged(&backtester, &[], &[], DT, &mut log).unwrap_err();

        assert_eq!(err, BacktestError::EmptySeries);
        assert_eq!(log.kinds(), vec![RunLogEventKind::BacktestStarted]);
    }
}
