use std::env;
use std::time::Duration;

use crate::error::Error;

/// Runtime configuration, read once at startup from `LURELAB_*` variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    /// Public base URL baked into tracking links; must be reachable by the
    /// recipients' mail clients.
    pub base_url: String,
    pub send_delay: Duration,
    pub mail_api_url: Option<String>,
    pub mail_api_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        let send_delay_secs =
            parse_optional_u64("LURELAB_SEND_DELAY_SECS")?.unwrap_or(5);

        Ok(Config {
            bind_addr: env_or("LURELAB_BIND_ADDR", "127.0.0.1:8080"),
            database_url: env_or("LURELAB_DATABASE_URL", "sqlite://lurelab.db?mode=rwc"),
            base_url: env_or("LURELAB_BASE_URL", "http://localhost:8080"),
            send_delay: Duration::from_secs(send_delay_secs),
            mail_api_url: env_optional("LURELAB_MAIL_API_URL"),
            mail_api_token: env_optional("LURELAB_MAIL_API_TOKEN"),
            openai_api_key: env_optional("LURELAB_OPENAI_API_KEY"),
            model: env_or("LURELAB_MODEL", "gpt-4o-mini"),
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    env_optional(var).unwrap_or_else(|| default.to_owned())
}

fn env_optional(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_optional_u64(var: &str) -> Result<Option<u64>, Error> {
    match env_optional(var) {
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("{var} must be a non-negative integer"))),
        None => Ok(None),
    }
}
