use std::env;
use std::str::FromStr;

use super::types::{ConfigError, Environment};

const DEFAULT_CORS_ORIGINS: [&str; 3] =
    ["http://localhost:3000", "http://localhost:5173", "http://localhost:8080"];

/// Trimmed value of `key`; unset and blank are both `None`.
pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

pub(super) fn env_flag(key: &str) -> Option<bool> {
    env_optional(key).map(|value| parse_bool(&value))
}

/// Reads `key` (falling back to `default`) and parses it as `T`.
pub(super) fn env_parse<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env_or_default(key, default);
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue { field: key, value })
}

pub(super) fn env_score(key: &'static str, default: &str) -> Result<f64, ConfigError> {
    let score = env_parse::<f64>(key, default)?;
    if score.is_finite() {
        Ok(score)
    } else {
        Err(ConfigError::InvalidValue { field: key, value: score.to_string() })
    }
}

/// Accepts a JSON array or a comma separated list. Nothing usable means the local dev origins.
pub(super) fn parse_cors_origins(value: Option<String>) -> Result<Vec<String>, ConfigError> {
    let raw = value.unwrap_or_default();
    let raw = raw.trim();

    let origins: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str(raw).map_err(|_| ConfigError::InvalidCors(raw.to_string()))?
    } else {
        raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(String::from).collect()
    };

    if origins.is_empty() {
        return Ok(DEFAULT_CORS_ORIGINS.iter().map(|origin| origin.to_string()).collect());
    }
    Ok(origins)
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub(super) fn parse_environment(value: Option<&str>) -> Environment {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("production" | "prod") => Environment::Production,
        Some("staging") => Environment::Staging,
        Some("test" | "testing") => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_json_and_csv() {
        let expected = vec!["http://a".to_string(), "http://b".to_string()];
        assert_eq!(
            parse_cors_origins(Some("[\"http://a\",\"http://b\"]".to_string())).expect("json"),
            expected
        );
        let csv = parse_cors_origins(Some("http://a, http://b".to_string())).expect("csv");
        assert_eq!(csv, expected);
    }

    #[test]
    fn cors_falls_back_to_dev_origins() {
        assert_eq!(parse_cors_origins(None).expect("unset").len(), DEFAULT_CORS_ORIGINS.len());
        assert_eq!(parse_cors_origins(Some(" , ".to_string())).expect("blank").len(), 3);
        assert_eq!(parse_cors_origins(Some("[]".to_string())).expect("empty json").len(), 3);
        assert!(parse_cors_origins(Some("[\"http://a\"".to_string())).is_err());
    }

    #[test]
    fn bool_is_case_insensitive() {
        for value in ["1", "true", "TRUE", "Yes", "on"] {
            assert!(parse_bool(value), "{value}");
        }
        for value in ["0", "false", "off", "nope"] {
            assert!(!parse_bool(value), "{value}");
        }
    }

    #[test]
    fn environment_aliases() {
        assert_eq!(parse_environment(Some("Prod")), Environment::Production);
        assert_eq!(parse_environment(Some("staging")), Environment::Staging);
        assert_eq!(parse_environment(Some("testing")), Environment::Test);
        assert_eq!(parse_environment(Some("qa")), Environment::Development);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[tokio::test]
    async fn scores_must_be_finite_numbers() {
        let _guard = crate::test_support::env_lock().await;
        std::env::set_var("SCORE_PARSE_PROBE", "NaN");
        assert!(env_score("SCORE_PARSE_PROBE", "1").is_err());
        std::env::set_var("SCORE_PARSE_PROBE", "abc");
        assert!(env_score("SCORE_PARSE_PROBE", "1").is_err());
        std::env::remove_var("SCORE_PARSE_PROBE");
        assert_eq!(env_score("SCORE_PARSE_PROBE", "1.5").expect("default"), 1.5);
    }
}
