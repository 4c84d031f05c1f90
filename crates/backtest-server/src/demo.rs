use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use backtest_core::{sample, signals_from_ints, BacktestResult, Backtester, Signal};
use runtime::{logging::RunLogWriter, replay::ReplayCsvWriter, run_logged};

use crate::config::Config;

/// Runs the bundled sample series with the configured parameters and writes
/// the replay artifact.
pub fn run_demo(
    config: &Config,
    log: &mut dyn RunLogWriter,
) -> Result<BacktestResult, Box<dyn Error>> {
    let backtester = Backtester::new(
        config.initial_capital,
        config.transaction_cost_pct,
        config.risk_free_rate,
    );
    let signals = signals_from_ints(&sample::SIGNALS)?;

    let result = run_logged(
        &backtester,
        &sample::PRICES,
        &signals,
        config.dt_in_years(),
        log,
    );
    write_replay_output(
        &config.replay_output_path,
        &sample::PRICES,
        &signals,
        &result,
        log,
    )?;

    Ok(result)
}

fn write_replay_output(
    path: &str,
    prices: &[f64],
    signals: &[Signal],
    result: &BacktestResult,
    log: &mut dyn RunLogWriter,
) -> Result<(), std::io::Error> {
    let replay_path = Path::new(path);

    if let Some(parent) = replay_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }

    let replay_file = BufWriter::new(File::create(replay_path)?);
    let mut replay_writer = ReplayCsvWriter::new(replay_file);
    replay_writer.write_result_and_log(prices, signals, result, log)
}

pub fn render_summary(result: &BacktestResult) -> String {
    let final_equity = result
        .final_equity()
        .map(|equity| format!("{equity:.2}"))
        .unwrap_or_else(|| "n/a".to_owned());

    format!(
        "======== Backtest Result ========\n\
         Total Return: {:.4} %\n\
         Max Drawdown: {:.4} %\n\
         Sharpe Ratio: {:.4}\n\
         \n\
         Final Equity: {final_equity}\n",
        result.total_return * 100.0,
        result.max_drawdown * 100.0,
        result.sharpe_ratio,
    )
}
