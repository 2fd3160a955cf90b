use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::core::session::SessionSettings;

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub gateway_latency_ms: u64,
    /// 0 keeps a successful attempt on screen until dismissed.
    pub success_display_delay_ms: u64,
    pub deposit_url: String,
    /// 0 keeps sessions until they are closed explicitly.
    pub session_idle_timeout_secs: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env_or("PORT", 3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            gateway_latency_ms: env_or("GATEWAY_LATENCY_MS", 2000),
            success_display_delay_ms: env_or("SUCCESS_DISPLAY_DELAY_MS", 2000),
            deposit_url: env::var("DEPOSIT_URL").unwrap_or_else(|_| "https://wallet.interledger-test.dev".to_string()),
            session_idle_timeout_secs: env_or("SESSION_IDLE_TIMEOUT_SECS", 1800),
        }
    }

    pub fn gateway_latency(&self) -> Duration {
        Duration::from_millis(self.gateway_latency_ms)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            success_display_delay: match self.success_display_delay_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
            deposit_url: Some(self.deposit_url.clone()).filter(|u| !u.trim().is_empty()),
            idle_timeout: match self.session_idle_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
