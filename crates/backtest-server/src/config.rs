use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
};

const DEFAULT_LISTEN_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_MODE: RunMode = RunMode::Demo;
const DEFAULT_REPLAY_OUTPUT_PATH: &str = "artifacts/replay.csv";
const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
const DEFAULT_COST_PCT: f64 = 0.001;
const DEFAULT_RISK_FREE_RATE: f64 = 0.0;
const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;

const ENV_ADDR_KEY: &str = "BACKTEST_SERVER_ADDR";
const ENV_MODE_KEY: &str = "BACKTEST_MODE";
const ENV_REPLAY_KEY: &str = "BACKTEST_REPLAY_OUTPUT";
const ENV_CAPITAL_KEY: &str = "BACKTEST_INITIAL_CAPITAL";
const ENV_COST_KEY: &str = "BACKTEST_COST_PCT";
const ENV_RISK_FREE_KEY: &str = "BACKTEST_RISK_FREE_RATE";
const ENV_PERIODS_KEY: &str = "BACKTEST_PERIODS_PER_YEAR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Demo,
    Serve,
}

impl RunMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "demo" => Some(Self::Demo),
            "serve" => Some(Self::Serve),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Serve => "serve",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub mode: RunMode,
    pub replay_output_path: String,
    pub initial_capital: f64,
    pub transaction_cost_pct: f64,
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
}

impl Config {
    pub fn dt_in_years(&self) -> f64 {
        1.0 / self.periods_per_year
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidMode,
    InvalidReplayOutputPath,
    InvalidInitialCapital,
    InvalidCostPct,
    InvalidRiskFreeRate,
    InvalidPeriodsPerYear,
    NonUnicode(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "{ENV_ADDR_KEY} is not a valid socket address: {err}")
            }
            Self::InvalidMode => write!(f, "{ENV_MODE_KEY} must be one of: demo, serve"),
            Self::InvalidReplayOutputPath => {
                write!(f, "{ENV_REPLAY_KEY} must not be empty or whitespace")
            }
            Self::InvalidInitialCapital => {
                write!(f, "{ENV_CAPITAL_KEY} must be a finite number greater than 0")
            }
            Self::InvalidCostPct => {
                write!(f, "{ENV_COST_KEY} must be a finite fraction between 0 and 1")
            }
            Self::InvalidRiskFreeRate => write!(f, "{ENV_RISK_FREE_KEY} must be a finite number"),
            Self::InvalidPeriodsPerYear => {
                write!(f, "{ENV_PERIODS_KEY} must be a finite number greater than 0")
            }
            Self::NonUnicode(key) => write!(f, "{key} contains non-unicode data"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR_KEY)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => SocketAddr::from(DEFAULT_LISTEN_ADDR),
        };

        let mode = match read_env(ENV_MODE_KEY)? {
            Some(value) => RunMode::parse(value.as_str()).ok_or(ConfigError::InvalidMode)?,
            None => DEFAULT_MODE,
        };

        let replay_output_path = match read_env(ENV_REPLAY_KEY)? {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidReplayOutputPath);
            }
            Some(value) => value,
            None => DEFAULT_REPLAY_OUTPUT_PATH.to_owned(),
        };

        let initial_capital = parse_f64_env(
            ENV_CAPITAL_KEY,
            DEFAULT_INITIAL_CAPITAL,
            |value| value > 0.0,
            ConfigError::InvalidInitialCapital,
        )?;

        let transaction_cost_pct = parse_f64_env(
            ENV_COST_KEY,
            DEFAULT_COST_PCT,
            |value| (0.0..=1.0).contains(&value),
            ConfigError::InvalidCostPct,
        )?;

        let risk_free_rate = parse_f64_env(
            ENV_RISK_FREE_KEY,
            DEFAULT_RISK_FREE_RATE,
            |_| true,
            ConfigError::InvalidRiskFreeRate,
        )?;

        let periods_per_year = parse_f64_env(
            ENV_PERIODS_KEY,
            DEFAULT_PERIODS_PER_YEAR,
            |value| value > 0.0,
            ConfigError::InvalidPeriodsPerYear,
        )?;

        Ok(Self {
            listen_addr,
            mode,
            replay_output_path,
            initial_capital,
            transaction_cost_pct,
            risk_free_rate,
            periods_per_year,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_f64_env(
    key: &'static str,
    default_value: f64,
    accept: impl Fn(f64) -> bool,
    invalid_error: ConfigError,
) -> Result<f64, ConfigError> {
    let Some(value) = read_env(key)? else {
        return Ok(default_value);
    };

    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && accept(parsed) => Ok(parsed),
        _ => Err(invalid_error),
    }
}
