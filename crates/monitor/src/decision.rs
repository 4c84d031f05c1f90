use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskMode {
    Normal,
    Reduce,
    Stop,
}

pub fn position_multiplier(mode: RiskMode) -> f64 {
    match mode {
        RiskMode::Normal => 1.0,
        RiskMode::Reduce => 0.5,
        RiskMode::Stop => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionThresholds {
    warn_level: f64,
    stop_level: f64,
    warn_frac: f64,
    stop_frac: f64,
}

impl DecisionThresholds {
    pub fn new(
        warn_level: f64,
        stop_level: f64,
        warn_frac: f64,
        stop_frac: f64,
    ) -> Result<Self, MonitorError> {
        if !warn_level.is_finite() || !stop_level.is_finite() {
            return Err(MonitorError::InvalidThreshold);
        }
        for frac in [warn_frac, stop_frac] {
            if !frac.is_finite() || !(0.0..=1.0).contains(&frac) {
                return Err(MonitorError::InvalidFraction);
            }
        }

        Ok(Self {
            warn_level,
            stop_level,
            warn_frac,
            stop_frac,
        })
    }

    pub fn warn_level(&self) -> f64 {
        self.warn_level
    }

    pub fn stop_level(&self) -> f64 {
        self.stop_level
    }
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            warn_level: 0.0,
            stop_level: -0.5,
            warn_frac: 0.5,
            stop_frac: 0.75,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskDecision {
    pub risk_mode: RiskMode,
    pub position_multiplier: f64,
    pub trade_score: Option<f64>,
    pub frac_below_warn: f64,
    pub frac_below_stop: f64,
}

/// Picks a risk mode from one score per monitored run.
///
/// Missing scores count toward the total but never as "below". With no
/// scores at all the mode stays `Normal`.
pub fn decide(scores: &[Option<f64>], thresholds: &DecisionThresholds) -> RiskDecision {
    let frac_below_warn = fraction_below(scores, thresholds.warn_level);
    let frac_below_stop = fraction_below(scores, thresholds.stop_level);

    let risk_mode = if scores.is_empty() {
        RiskMode::Normal
    } else if frac_below_stop >= thresholds.stop_frac {
        RiskMode::Stop
    } else if frac_below_warn >= thresholds.warn_frac {
        RiskMode::Reduce
    } else {
        RiskMode::Normal
    };

    RiskDecision {
        risk_mode,
        position_multiplier: position_multiplier(risk_mode),
        trade_score: None,
        frac_below_warn,
        frac_below_stop,
    }
}

fn fraction_below(scores: &[Option<f64>], level: f64) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let below = scores
        .iter()
        .filter(|score| matches!(score, Some(value) if *value < level))
        .count();
    below as f64 / scores.len() as f64
}
