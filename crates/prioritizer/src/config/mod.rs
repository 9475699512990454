use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::scoring::ScoringWeights;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub geo_priority: GeoPriorityConfig,
    pub weights: ScoringWeights,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let csv_path = match env::var("APP_GEO_PRIORITY_CSV") {
            Ok(raw) if raw.trim().is_empty() => return Err(ConfigError::EmptyGeoPriorityPath),
            Ok(raw) => Some(PathBuf::from(raw.trim())),
            Err(_) => None,
        };

        let weights = match env::var("APP_SCORING_WEIGHTS") {
            Ok(raw) => parse_weights(&raw)?,
            Err(_) => ScoringWeights::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            geo_priority: GeoPriorityConfig { csv_path },
            weights,
        })
    }
}

/// Reads `financial,stakeholder,approval,risk`. Sum-to-one is checked when the engine is built.
fn parse_weights(raw: &str) -> Result<ScoringWeights, ConfigError> {
    let invalid = || ConfigError::InvalidScoringWeights {
        value: raw.to_string(),
    };

    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [financial_return, stakeholder, approval_probability, risk] => Ok(ScoringWeights {
            financial_return: *financial_return,
            stakeholder: *stakeholder,
            approval_probability: *approval_probability,
            risk: *risk,
        }),
        _ => Err(invalid()),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Source of the geo-priority table. `None` selects the bundled sample dataset.
#[derive(Debug, Clone, Default)]
pub struct GeoPriorityConfig {
    pub csv_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyGeoPriorityPath,
    InvalidScoringWeights { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyGeoPriorityPath => {
                write!(f, "APP_GEO_PRIORITY_CSV is set but empty")
            }
            ConfigError::InvalidScoringWeights { value } => write!(
                f,
                "APP_SCORING_WEIGHTS must list four numbers (financial,stakeholder,approval,risk), got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::EmptyGeoPriorityPath
            | ConfigError::InvalidScoringWeights { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
