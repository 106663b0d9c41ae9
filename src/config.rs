use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub auth_tokens: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("STATKEEP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            log_level: env::var("STATKEEP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            auth_tokens: env::var("STATKEEP_TOKENS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|token| !token.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
