use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;

pub mod models;
pub use models::*;

/// Loads the unified application configuration.
///
/// Sources, in order of increasing precedence:
/// 1. `config/default.*`
/// 2. `config/{RUN_ENV}.*` (RUN_ENV defaults to "debug")
/// 3. Environment variables prefixed with `SLOTBOOK`, `__`-separated
///    (e.g. `SLOTBOOK__SERVER__PORT=8080`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "SLOTBOOK".to_string());

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the dotenv file is loaded into the environment exactly once.
///
/// Honors `DOTENV_OVERRIDE`, then a leading `.env*` command line argument,
/// then falls back to ".env".
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = std::env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_defaults_match_reference_deployment() {
        let booking = BookingConfig::default();
        assert_eq!(booking.blocked_weekdays, vec!["Fri", "Sat"]);
        assert_eq!(booking.morning, HourRange { start: 8, end: 14 });
        assert_eq!(booking.evening, HourRange { start: 19, end: 22 });
    }

    #[test]
    fn app_config_deserializes_with_minimal_input() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "server": { "host": "127.0.0.1", "port": 8080 } }"#,
        )
        .unwrap();
        assert!(!config.use_gcal);
        assert!(!config.use_gmail);
        assert!(config.gcal.is_none());
        assert_eq!(config.booking.morning.start, 8);
    }
}
