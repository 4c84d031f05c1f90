use serde::Serialize;

use crate::decision::{decide, DecisionThresholds, RiskDecision};
use crate::error::MonitorError;
use crate::rolling::latest_rolling_sharpe;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSharpe {
    pub window: usize,
    pub sharpe: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub label: String,
    pub latest: Vec<WindowSharpe>,
    /// Median of the available latest values.
    pub score: Option<f64>,
}

/// Latest rolling Sharpe of several monitored series over several windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharpeSnapshot {
    rows: Vec<SnapshotRow>,
}

impl SharpeSnapshot {
    pub fn build<'a, I>(
        series: I,
        sharpe_windows: &[usize],
        annualization: f64,
    ) -> Result<Self, MonitorError>
    where
        I: IntoIterator<Item = (&'a str, &'a [f64])>,
    {
        if sharpe_windows.is_empty() {
            return Err(MonitorError::NoSharpeWindows);
        }

        let mut rows = Vec::new();
        for (label, samples) in series {
            let latest = sharpe_windows
                .iter()
                .map(|&window| {
                    latest_rolling_sharpe(samples, window, annualization)
                        .map(|sharpe| WindowSharpe { window, sharpe })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut available: Vec<f64> = latest.iter().filter_map(|entry| entry.sharpe).collect();
            let score = median(&mut available);

            rows.push(SnapshotRow {
                label: label.to_owned(),
                latest,
                score,
            });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn scores(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.score).collect()
    }

    pub fn score_for(&self, label: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .and_then(|row| row.score)
    }

    /// Risk decision over every row, reporting the score of `trade_label`.
    pub fn decide(
        &self,
        trade_label: Option<&str>,
        thresholds: &DecisionThresholds,
    ) -> RiskDecision {
        let mut decision = decide(&self.scores(), thresholds);
        decision.trade_score = trade_label.and_then(|label| self.score_for(label));
        decision
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(|left, right| left.total_cmp(right));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
