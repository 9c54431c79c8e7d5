use super::parsing::{
    env_flag, env_optional, env_or_default, env_parse, env_score, parse_cors_origins,
    parse_environment,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    jwt_algorithm, redis_url, ApiSettings, AuthSettings, BootstrapAdmin, ConfigError,
    DatabaseSettings, Environment, PostgresParts, RedisSettings, ScoringSettings, ServerSettings,
    Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let settings = Self {
            server: load_server()?,
            api: ApiSettings {
                project_name: env_or_default("PROJECT_NAME", "Staff Evaluation API"),
                version: env_or_default("VERSION", env!("CARGO_PKG_VERSION")),
                prefix: env_or_default("API_PREFIX", "/api"),
            },
            auth: load_auth()?,
            cors_origins: parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?,
            database: load_database()?,
            redis: load_redis()?,
            bootstrap_admin: BootstrapAdmin {
                email: env_or_default("FIRST_ADMIN_EMAIL", "admin@example.com"),
                password: env_optional("FIRST_ADMIN_PASSWORD"),
                name: env_or_default("FIRST_ADMIN_NAME", "Administrator"),
            },
            scoring: ScoringSettings {
                min_score_default: env_score("SCORE_MIN_DEFAULT", "1")?,
                max_score_default: env_score("SCORE_MAX_DEFAULT", "4")?,
            },
            telemetry: TelemetrySettings {
                log_level: env_or_default("EVAL_LOG_LEVEL", "info"),
                json: env_flag("EVAL_LOG_JSON").unwrap_or(false),
                prometheus_enabled: env_flag("PROMETHEUS_ENABLED").unwrap_or(false),
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub(crate) fn server(&self) -> &ServerSettings {
        &self.server
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn auth(&self) -> &AuthSettings {
        &self.auth
    }

    pub(crate) fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn bootstrap_admin(&self) -> &BootstrapAdmin {
        &self.bootstrap_admin
    }

    pub(crate) fn scoring(&self) -> &ScoringSettings {
        &self.scoring
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.prefix.starts_with('/') {
            return invalid("API_PREFIX", &self.api.prefix);
        }
        if self.scoring.min_score_default > self.scoring.max_score_default {
            return invalid("SCORE_MIN_DEFAULT", self.scoring.min_score_default);
        }
        if self.database.max_connections == 0 {
            return invalid("DATABASE_MAX_CONNECTIONS", 0);
        }

        if self.server.strict {
            if self.database.passwordless {
                return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
            }
            if self.bootstrap_admin.password.is_none() {
                return Err(ConfigError::MissingSecret("FIRST_ADMIN_PASSWORD"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: impl ToString) -> Result<(), ConfigError> {
    Err(ConfigError::InvalidValue { field, value: value.to_string() })
}

fn load_server() -> Result<ServerSettings, ConfigError> {
    let host = env_or_default("EVAL_HOST", "0.0.0.0");
    let port: u16 = env_parse("EVAL_PORT", "3000")?;
    if port == 0 {
        return Err(ConfigError::InvalidValue { field: "EVAL_PORT", value: port.to_string() });
    }

    let environment =
        parse_environment(env_optional("EVAL_ENV").or_else(|| env_optional("NODE_ENV")).as_deref());
    let strict = environment == Environment::Production
        || env_flag("EVAL_STRICT_CONFIG").unwrap_or(false);

    Ok(ServerSettings { host, port, environment, strict })
}

fn load_auth() -> Result<AuthSettings, ConfigError> {
    let jwt_secret = env_optional("SECRET_KEY")
        .or_else(|| env_optional("JWT_SECRET"))
        .unwrap_or_else(load_or_create_secret_key);

    Ok(AuthSettings {
        jwt_secret,
        jwt_algorithm: jwt_algorithm(&env_or_default("ALGORITHM", "HS256"))?,
        token_ttl_minutes: env_parse("ACCESS_TOKEN_EXPIRE_MINUTES", "480")?,
        login_attempts: env_parse("LOGIN_RATE_LIMIT", "10")?,
        login_window_seconds: env_parse("LOGIN_RATE_WINDOW_SECONDS", "60")?,
    })
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the `POSTGRES_*` parts.
fn load_database() -> Result<DatabaseSettings, ConfigError> {
    let max_connections = env_parse("DATABASE_MAX_CONNECTIONS", "20")?;

    if let Some(url) = env_optional("DATABASE_URL") {
        return Ok(DatabaseSettings { url, max_connections, passwordless: false });
    }

    let host = env_or_default("POSTGRES_SERVER", "localhost");
    let user = env_or_default("POSTGRES_USER", "staff_eval");
    let password = env_optional("POSTGRES_PASSWORD");
    let database = env_or_default("POSTGRES_DB", "staff_eval");
    let parts = PostgresParts {
        host: &host,
        port: env_parse("POSTGRES_PORT", "5432")?,
        user: &user,
        password: password.as_deref().unwrap_or_default(),
        database: &database,
    };

    Ok(DatabaseSettings { url: parts.url(), max_connections, passwordless: password.is_none() })
}

fn load_redis() -> Result<RedisSettings, ConfigError> {
    if let Some(url) = env_optional("REDIS_URL") {
        return Ok(RedisSettings { url });
    }

    let host = env_or_default("REDIS_HOST", "localhost");
    let port = env_parse("REDIS_PORT", "6379")?;
    let db = env_parse("REDIS_DB", "0")?;
    let password = env_optional("REDIS_PASSWORD");

    Ok(RedisSettings { url: redis_url(&host, port, db, password.as_deref()) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn load_reads_overrides_from_env() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EVAL_PORT", "4100");
        std::env::set_var("SCORE_MAX_DEFAULT", "5");

        let settings = Settings::load();
        std::env::remove_var("EVAL_PORT");
        std::env::remove_var("SCORE_MAX_DEFAULT");

        let settings = settings.expect("settings");
        assert_eq!(settings.server().port, 4100);
        assert_eq!(settings.server().environment, Environment::Test);
        assert_eq!(settings.scoring().max_score_default, 5.0);
        assert_eq!(settings.api().prefix, "/api");
        assert_eq!(settings.redis().url, "redis://127.0.0.1:6379/1");
    }

    #[tokio::test]
    async fn port_zero_is_rejected() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EVAL_PORT", "0");

        let result = Settings::load();
        std::env::remove_var("EVAL_PORT");

        assert!(matches!(result, Err(ConfigError::InvalidValue { field: "EVAL_PORT", .. })));
    }

    #[tokio::test]
    async fn inverted_score_defaults_are_rejected() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("SCORE_MIN_DEFAULT", "6");

        let result = Settings::load();
        std::env::remove_var("SCORE_MIN_DEFAULT");

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "SCORE_MIN_DEFAULT", .. })
        ));
    }

    #[tokio::test]
    async fn strict_mode_requires_admin_password() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EVAL_STRICT_CONFIG", "1");
        std::env::remove_var("FIRST_ADMIN_PASSWORD");

        let result = Settings::load();
        std::env::set_var("EVAL_STRICT_CONFIG", "0");

        assert!(matches!(result, Err(ConfigError::MissingSecret("FIRST_ADMIN_PASSWORD"))));
    }

    #[tokio::test]
    async fn postgres_parts_are_used_without_database_url() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::remove_var("DATABASE_URL");
        let parts = [
            ("POSTGRES_SERVER", "db.internal"),
            ("POSTGRES_PORT", "5433"),
            ("POSTGRES_USER", "eval"),
            ("POSTGRES_PASSWORD", "pw"),
            ("POSTGRES_DB", "eval_db"),
        ];
        for (key, value) in parts {
            std::env::set_var(key, value);
        }

        let result = Settings::load();
        for (key, _) in parts {
            std::env::remove_var(key);
        }

        let settings = result.expect("settings");
        assert_eq!(settings.database().url, "postgresql://eval:pw@db.internal:5433/eval_db");
        assert!(!settings.database().passwordless);
    }
}
