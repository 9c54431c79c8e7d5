use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Fully resolved process configuration. Built once at startup by [`Settings::load`].
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(super) server: ServerSettings,
    pub(super) api: ApiSettings,
    pub(super) auth: AuthSettings,
    pub(super) cors_origins: Vec<String>,
    pub(super) database: DatabaseSettings,
    pub(super) redis: RedisSettings,
    pub(super) bootstrap_admin: BootstrapAdmin,
    pub(super) scoring: ScoringSettings,
    pub(super) telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) environment: Environment,
    /// Refuse to start without real secrets. Always on in production.
    pub(crate) strict: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiSettings {
    pub(crate) project_name: String,
    pub(crate) version: String,
    pub(crate) prefix: String,
}

#[derive(Debug, Clone)]
pub(crate) struct AuthSettings {
    pub(crate) jwt_secret: String,
    pub(crate) jwt_algorithm: Algorithm,
    pub(crate) token_ttl_minutes: i64,
    pub(crate) login_attempts: u64,
    pub(crate) login_window_seconds: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct DatabaseSettings {
    pub(crate) url: String,
    pub(crate) max_connections: u32,
    /// Whether the URL came without a password; strict mode rejects that.
    pub(super) passwordless: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RedisSettings {
    pub(crate) url: String,
}

/// Account ensured on every start when a password is configured.
#[derive(Debug, Clone)]
pub(crate) struct BootstrapAdmin {
    pub(crate) email: String,
    pub(crate) password: Option<String>,
    pub(crate) name: String,
}

/// Defaults applied to indicators created without an explicit score range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoringSettings {
    pub(crate) min_score_default: f64,
    pub(crate) max_score_default: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
    pub(crate) prometheus_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Test => "test",
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("invalid cors origins: {0}")]
    InvalidCors(String),
    #[error("unsupported jwt algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("{0} must be set when strict configuration is enabled")]
    MissingSecret(&'static str),
}

pub(super) struct PostgresParts<'a> {
    pub(super) host: &'a str,
    pub(super) port: u16,
    pub(super) user: &'a str,
    pub(super) password: &'a str,
    pub(super) database: &'a str,
}

impl PostgresParts<'_> {
    pub(super) fn url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

pub(super) fn redis_url(host: &str, port: u16, db: u16, password: Option<&str>) -> String {
    match password {
        Some(password) => format!("redis://:{password}@{host}:{port}/{db}"),
        None => format!("redis://{host}:{port}/{db}"),
    }
}

/// Only the HMAC family is accepted since tokens are signed with a shared secret.
pub(super) fn jwt_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(ConfigError::UnsupportedAlgorithm(name.to_string())),
    }
}
