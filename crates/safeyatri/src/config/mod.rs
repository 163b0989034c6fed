use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::simulate::Latency;

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

/// Top-level configuration for the companion service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub simulation: SimulationConfig,
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
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let latency_scale = env::var("APP_LATENCY_SCALE")
            .unwrap_or_else(|_| "1.0".to_string())
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|scale| (0.0..=Latency::MAX_SCALE).contains(scale))
            .ok_or(ConfigError::InvalidLatencyScale)?;

        let band_interval_ms = env::var("APP_BAND_INTERVAL_MS")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(ConfigError::InvalidBandInterval)?;

        let session_idle_secs = env::var("APP_SESSION_IDLE_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidSessionIdle)?;

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                session_idle: Duration::from_secs(session_idle_secs),
            },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            simulation: SimulationConfig {
                latency_scale,
                band_interval: Duration::from_millis(band_interval_ms),
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sessions untouched for this long are dropped from the store.
    pub session_idle: Duration,
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
    pub format: LogFormat,
}

/// Line layout for log output. Unknown values fall back to compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Knobs for the simulated services.
///
/// `latency_scale` multiplies every simulated network delay; `0.0` resolves
/// simulated calls immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub latency_scale: f64,
    pub band_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency_scale: 1.0,
            band_interval: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLatencyScale,
    InvalidBandInterval,
    InvalidSessionIdle,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLatencyScale => {
                write!(
                    f,
                    "APP_LATENCY_SCALE must be a number between 0 and {}",
                    Latency::MAX_SCALE
                )
            }
            ConfigError::InvalidBandInterval => {
                write!(f, "APP_BAND_INTERVAL_MS must be a positive integer")
            }
            ConfigError::InvalidSessionIdle => {
                write!(f, "APP_SESSION_IDLE_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLatencyScale
            | ConfigError::InvalidBandInterval
            | ConfigError::InvalidSessionIdle => None,
        }
    }
}
