use std::time::{Duration, Instant};

use backtest_core::{Backtester, Signal};

/// Wall-clock throughput of repeated backtest runs over one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputSample {
    pub runs: u64,
    pub steps: u64,
    pub elapsed: Duration,
}

impl ThroughputSample {
    pub fn steps_per_sec(&self) -> u64 {
        steps_per_sec(self.steps, self.elapsed.as_nanos())
    }

    pub fn meets_target(&self, target_steps_per_sec: u64) -> bool {
        self.steps_per_sec() >= target_steps_per_sec
    }
}

/// Runs `backtester` over the series `runs` times and records the elapsed time.
pub fn measure_throughput(
    backtester: &Backtester,
    prices: &[f64],
    signals: &[Signal],
    dt_in_years: f64,
    runs: u64,
) -> ThroughputSample {
    let started = Instant::now();
    let mut steps = 0u64;
    for _ in 0..runs {
        let result = backtester.run(prices, signals, dt_in_years);
        steps = steps.saturating_add(result.len() as u64);
    }

    ThroughputSample {
        runs,
        steps,
        elapsed: started.elapsed(),
    }
}

fn steps_per_sec(steps: u64, elapsed_nanos: u128) -> u64 {
    if elapsed_nanos == 0 {
        return 0;
    }

    let per_sec = (steps as u128).saturating_mul(1_000_000_000) / elapsed_nanos;
    u64::try_from(per_sec).unwrap_or(u64::MAX)
}
