use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use backtest_core::{
    signals_from_ints, BacktestConfig, BacktestResult, Backtester, PositionTiming, SharpeBasis,
};
use monitor::{DecisionThresholds, RiskDecision, SharpeSnapshot, DEFAULT_ANNUALIZATION};
use runtime::logging::InMemoryRunLogWriter;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/backtests", post(run_backtest))
        .route("/monitor/decision", post(monitor_decision))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct BacktestRequest {
    pub initial_capital: f64,
    pub transaction_cost_pct: f64,
    #[serde(default)]
    pub risk_free_rate: f64,
    pub prices: Vec<f64>,
    pub signals: Vec<i64>,
    pub dt_in_years: f64,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub position_timing: PositionTiming,
    #[serde(default)]
    pub sharpe_basis: SharpeBasis,
}

#[derive(Debug, Serialize)]
struct BacktestResponse {
    run_id: u64,
    result: BacktestResult,
}

#[derive(Debug, Deserialize)]
pub struct MonitoredSeries {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdsRequest {
    pub warn_level: f64,
    pub stop_level: f64,
    pub warn_frac: f64,
    pub stop_frac: f64,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub series: Vec<MonitoredSeries>,
    pub sharpe_windows: Vec<usize>,
    #[serde(default)]
    pub trade_label: Option<String>,
    #[serde(default = "default_annualization")]
    pub annualization: f64,
    #[serde(default)]
    pub thresholds: Option<ThresholdsRequest>,
}

fn default_annualization() -> f64 {
    DEFAULT_ANNUALIZATION
}

#[derive(Debug, Serialize)]
struct DecisionResponse {
    snapshot: SharpeSnapshot,
    decision: RiskDecision,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    RunIdExhausted,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::InvalidInput(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Self::RunIdExhausted => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "run id space exhausted".to_owned(),
            ),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

async fn run_backtest(
    State(state): State<AppState>,
    Json(request): Json<BacktestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let signals = signals_from_ints(&request.signals)
        .map_err(|err| ApiError::InvalidInput(err.to_string()))?;
    let config = BacktestConfig::new(
        request.initial_capital,
        request.transaction_cost_pct,
        request.risk_free_rate,
    )
    .with_position_timing(request.position_timing)
    .with_sharpe_basis(request.sharpe_basis);
    let backtester = Backtester::with_config(config);

    let run_id = state.start_run().map_err(|_| ApiError::RunIdExhausted)?;
    let mut events = InMemoryRunLogWriter::new();
    let outcome = if request.strict {
        runtime::try_run_logged(
            &backtester,
            &request.prices,
            &signals,
            request.dt_in_years,
            &mut events,
        )
    } else {
        Ok(runtime::run_logged(
            &backtester,
            &request.prices,
            &signals,
            request.dt_in_years,
            &mut events,
        ))
    };
    state.forward_run_log(run_id, events.events());

    let result = outcome.map_err(|err| ApiError::InvalidInput(err.to_string()))?;
    let location = format!("/backtests/{run_id}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BacktestResponse { run_id, result }),
    ))
}

async fn monitor_decision(
    Json(request): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let thresholds = match request.thresholds {
        Some(t) => DecisionThresholds::new(t.warn_level, t.stop_level, t.warn_frac, t.stop_frac)
            .map_err(|err| ApiError::InvalidInput(err.to_string()))?,
        None => DecisionThresholds::default(),
    };

    let snapshot = SharpeSnapshot::build(
        request
            .series
            .iter()
            .map(|series| (series.label.as_str(), series.values.as_slice())),
        &request.sharpe_windows,
        request.annualization,
    )
    .map_err(|err| ApiError::InvalidInput(err.to_string()))?;
    let decision = snapshot.decide(request.trade_label.as_deref(), &thresholds);

    Ok(Json(DecisionResponse { snapshot, decision }))
}
