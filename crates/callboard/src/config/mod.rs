use chrono::FixedOffset;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::performance::{
    ResubmissionPolicy, ScoreThresholds, SubmissionSettings, TargetSet,
};

const DEFAULT_ROSTER: [&str; 3] = ["Bayan", "Salma", "Sahar"];
const WEBHOOK_PLACEHOLDER: &str = "YOUR_APPS_SCRIPT_ID";

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
    pub team: TeamConfig,
    pub archive: ArchiveConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            team: TeamConfig::from_env()?,
            archive: ArchiveConfig::from_env()?,
        })
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

/// Roster, calendar, and fixed goals for the team.
#[derive(Debug, Clone)]
pub struct TeamConfig {
    pub roster: Vec<String>,
    /// Offset whose calendar decides week and month boundaries.
    pub calendar: FixedOffset,
    pub resubmission: ResubmissionPolicy,
    pub targets: TargetSet,
    pub thresholds: ScoreThresholds,
}

impl TeamConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let roster = match env::var("APP_ROSTER") {
            Ok(raw) => parse_roster(&raw)?,
            Err(_) => DEFAULT_ROSTER.iter().map(|name| name.to_string()).collect(),
        };

        let offset_minutes = env::var("APP_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "180".to_string())
            .trim()
            .parse::<i32>()
            .map_err(|_| ConfigError::InvalidUtcOffset)?;
        let calendar = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset)?;

        let resubmission = match env::var("APP_RESUBMISSION") {
            Ok(raw) => ResubmissionPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidResubmissionPolicy(raw))?,
            Err(_) => ResubmissionPolicy::default(),
        };

        Ok(Self {
            roster,
            calendar,
            resubmission,
            targets: TargetSet::standard(),
            thresholds: ScoreThresholds::standard(),
        })
    }

    pub fn submission_settings(&self) -> SubmissionSettings {
        SubmissionSettings {
            roster: self.roster.clone(),
            targets: self.targets.clone(),
            resubmission: self.resubmission,
        }
    }
}

fn parse_roster(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut roster: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        if !roster.iter().any(|existing| existing == name) {
            roster.push(name.to_string());
        }
    }
    if roster.is_empty() {
        return Err(ConfigError::EmptyRoster);
    }
    Ok(roster)
}

/// Where archive rows are mirrored.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub webhook_url: Option<String>,
    pub timeout: Duration,
    pub csv_path: Option<PathBuf>,
}

impl ArchiveConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = env::var("APP_ARCHIVE_WEBHOOK_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty() && !url.contains(WEBHOOK_PLACEHOLDER));

        let timeout_secs = env::var("APP_ARCHIVE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidArchiveTimeout)?;

        let csv_path = env::var("APP_ARCHIVE_CSV_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            webhook_url,
            timeout: Duration::from_secs(timeout_secs),
            csv_path,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyRoster,
    InvalidUtcOffset,
    InvalidResubmissionPolicy(String),
    InvalidArchiveTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyRoster => write!(f, "APP_ROSTER must name at least one participant"),
            ConfigError::InvalidUtcOffset => write!(
                f,
                "APP_UTC_OFFSET_MINUTES must be whole minutes strictly between -1440 and 1440"
            ),
            ConfigError::InvalidResubmissionPolicy(value) => write!(
                f,
                "APP_RESUBMISSION must be 'reject_same_day' or 'allow' (got '{value}')"
            ),
            ConfigError::InvalidArchiveTimeout => {
                write!(f, "APP_ARCHIVE_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
