use dotenv::dotenv;
use std::env;
use std::time::Duration;

use crate::accounts::EngineConfig;

/// Loads `EngineConfig` from the environment. Each key, when present, must
/// parse or the process panics (a malformed override is a deploy mistake,
/// not something to silently paper over); when absent, the default from
/// `EngineConfig::default()` is used.
pub fn load_engine_config() -> EngineConfig {
    dotenv().ok();
    let defaults = EngineConfig::default();

    EngineConfig {
        priorities_max: parse_env_or("PRIORITIES_MAX", defaults.priorities_max),
        blocking_max: parse_env_or("BLOCKING_MAX", defaults.blocking_max),
        cooldown: parse_duration_ms_env_or("COOLDOWN_MS", defaults.cooldown),
    }
}

pub fn load_listener_cleanup_interval() -> Duration {
    dotenv().ok();
    parse_duration_ms_env_or("LISTENER_CLEANUP_INTERVAL_MS", Duration::from_secs(1))
}

pub fn load_listener_addr() -> String {
    dotenv().ok();
    env::var("LISTENER_ADDR").unwrap_or_else(|_| "127.0.0.1:7075".to_string())
}

fn parse_env_or(key: &str, default: usize) -> usize {
    match env::var(key) {
        Ok(raw) => raw.parse::<usize>().expect(&format!("{key} must be a number")),
        Err(_) => default,
    }
}

fn parse_duration_ms_env_or(key: &str, default: Duration) -> Duration {
    match env::var(key) {
        Ok(raw) => {
            let ms = raw.parse::<u64>().expect(&format!("{key} must be a number of milliseconds"));
            Duration::from_millis(ms)
        }
        Err(_) => default,
    }
}
