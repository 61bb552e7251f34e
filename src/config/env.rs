//! Environment variable configuration module.
//!
//! Provides environment variable loading and the global `APP_CONFIG` instance.

use std::env;
use std::sync::Once;

use once_cell::sync::Lazy;

static INIT: Once = Once::new();

/// Initializes the environment by loading the .env file.
/// This is called automatically when `get_env` is first used.
fn init_env() {
    INIT.call_once(|| {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
    });
}

/// Retrieves an environment variable by key.
///
/// If the variable is not set, returns the provided default value.
/// If no default is provided and the variable is not set, returns an empty string.
pub fn get_env(key: &str, default: Option<&str>) -> String {
    init_env();
    env::var(key).unwrap_or_else(|_| default.unwrap_or("").to_string())
}

/// Retrieves an environment variable as a parsed type.
pub fn get_env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    init_env();
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Retrieves an environment variable as a boolean flag.
///
/// Accepts `1`, `true`, `yes` and `on` (case-insensitive) as true.
pub fn get_env_flag(key: &str, default: bool) -> bool {
    init_env();
    env::var(key).map_or(default, |v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Maps a `LOG_LEVEL` value onto a `tracing` level name.
///
/// Accepts the uvicorn names as well, so `warning` becomes `warn` and
/// `critical` becomes `error`. Unknown values fall back to `info`.
fn normalize_log_level(value: &str) -> &'static str {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" | "fatal" => "error",
        "off" => "off",
        _ => "info",
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    pub reload: bool,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,

    // Environment
    pub is_production: bool,

    // Sentry settings
    pub sentry_dsn: String,
    pub sentry_traces_sample_rate: f32,

    // CORS settings
    pub cors_origins: String,

    // Rate limiting
    pub rate_limit_per_second: u64,
    pub rate_limit_burst_size: u32,
}

impl AppConfig {
    /// Creates a new `AppConfig` from environment variables.
    pub fn from_env() -> Self {
        let rust_env = get_env("RUST_ENV", Some("development"));
        let is_production = rust_env == "production" || rust_env == "prod";

        Self {
            host: get_env("HOST", Some("0.0.0.0")),
            port: get_env_parsed("PORT", 8080),
            reload: get_env_flag("UVICORN_RELOAD", false),

            log_level: normalize_log_level(&get_env("LOG_LEVEL", Some("info"))).to_string(),
            log_format: LogFormat::from_env_value(&get_env("LOG_FORMAT", Some("text"))),

            is_production,

            sentry_dsn: get_env("SENTRY_DSN", None),
            sentry_traces_sample_rate: get_env_parsed("SENTRY_TRACES_SAMPLE_RATE", 0.1),

            cors_origins: get_env("CORS_ORIGINS", Some("*")),

            rate_limit_per_second: get_env_parsed("RATE_LIMIT_PER_SECOND", 10),
            rate_limit_burst_size: get_env_parsed("RATE_LIMIT_BURST_SIZE", 50),
        }
    }

    /// Default `EnvFilter` directive used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> String {
        format!(
            "first_uv_pro={level},tower_http={level},axum={level}",
            level = self.log_level
        )
    }
}

/// Global application configuration instance.
pub static APP_CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_with_default() {
        let result = get_env("NON_EXISTENT_VAR_FOR_TEST_12345", Some("default_value"));
        assert_eq!(result, "default_value");
    }

    #[test]
    fn test_get_env_no_default() {
        let result = get_env("NON_EXISTENT_VAR_FOR_TEST_67890", None);
        assert_eq!(result, "");
    }

    #[test]
    fn test_get_env_parsed_default_u16() {
        let result: u16 = get_env_parsed("NON_EXISTENT_U16_VAR", 8080);
        assert_eq!(result, 8080);
    }

    #[test]
    fn test_get_env_parsed_default_f32() {
        let result: f32 = get_env_parsed("NON_EXISTENT_F32_VAR", 0.5);
        assert!((result - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_get_env_flag_default() {
        assert!(!get_env_flag("NON_EXISTENT_FLAG_VAR", false));
        assert!(get_env_flag("NON_EXISTENT_FLAG_VAR", true));
    }

    #[test]
    fn test_parse_flag_truthy_values() {
        for value in ["1", "true", "TRUE", "yes", "On", " true "] {
            assert!(parse_flag(value), "expected {value:?} to be true");
        }
    }

    #[test]
    fn test_parse_flag_falsy_values() {
        for value in ["0", "false", "no", "off", "", "maybe"] {
            assert!(!parse_flag(value), "expected {value:?} to be false");
        }
    }

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value("text"), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value("pretty"), LogFormat::Text);
    }

    #[test]
    fn test_app_config_server_defaults() {
        // Only meaningful when the container variables are not set for the test run
        let config = AppConfig::from_env();
        if env::var("HOST").is_err() {
            assert_eq!(config.host, "0.0.0.0");
        }
        if env::var("PORT").is_err() {
            assert_eq!(config.port, 8080);
        }
        if env::var("LOG_LEVEL").is_err() {
            assert_eq!(config.log_level, "info");
        }
        if env::var("UVICORN_RELOAD").is_err() {
            assert!(!config.reload);
        }
    }

    #[test]
    fn test_app_config_rate_limit_positive() {
        let config = AppConfig::from_env();
        assert!(config.rate_limit_per_second > 0);
        assert!(config.rate_limit_burst_size > 0);
    }

    #[test]
    fn test_app_config_sentry_traces_sample_rate_range() {
        let config = AppConfig::from_env();
        assert!(config.sentry_traces_sample_rate >= 0.0);
        assert!(config.sentry_traces_sample_rate <= 1.0);
    }

    #[test]
    fn test_default_log_filter_uses_level() {
        let mut config = AppConfig::from_env();
        config.log_level = "warn".to_string();
        assert_eq!(
            config.default_log_filter(),
            "first_uv_pro=warn,tower_http=warn,axum=warn"
        );
    }

    #[test]
    fn test_normalize_log_level_accepts_uvicorn_names() {
        assert_eq!(normalize_log_level("warning"), "warn");
        assert_eq!(normalize_log_level("WARNING"), "warn");
        assert_eq!(normalize_log_level("critical"), "error");
        assert_eq!(normalize_log_level(" Debug "), "debug");
        assert_eq!(normalize_log_level("trace"), "trace");
        assert_eq!(normalize_log_level("info"), "info");
        assert_eq!(normalize_log_level("verbose"), "info");
    }

    #[test]
    fn test_default_log_filter_parses_for_every_uvicorn_level() {
        let mut config = AppConfig::from_env();
        for level in ["critical", "error", "warning", "info", "debug", "trace"] {
            config.log_level = normalize_log_level(level).to_string();
            assert!(
                tracing_subscriber::EnvFilter::try_new(config.default_log_filter()).is_ok(),
                "filter for {level:?} should parse"
            );
        }
    }

    #[test]
    fn test_app_config_global_same_instance() {
        let port1 = APP_CONFIG.port;
        let port2 = APP_CONFIG.port;
        assert_eq!(port1, port2);
    }
}
