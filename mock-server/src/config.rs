use std::env;
use std::fmt;

/// Settings for the mock backend binary, read from the environment
/// (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let raw_port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = raw_port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(raw_port))?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            log_level,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(value) => write!(f, "PORT must be a valid u16, got '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}
