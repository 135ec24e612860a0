use std::time::Duration;

use serde::Serialize;

const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
const DEFAULT_POLL_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub api_base: String,
    pub poll_interval: Duration,
}

impl UiConfig {
    pub fn from_env() -> Self {
        let api_base =
            std::env::var("GDCLONE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let poll_interval =
            Duration::from_millis(read_u64_env("GDCLONE_POLL_MS", DEFAULT_POLL_MS));
        Self {
            api_base,
            poll_interval,
        }
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            api_base: self.api_base.clone(),
            poll_ms: self.poll_interval.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub api_base: String,
    pub poll_ms: u64,
}

fn read_u64_env(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
