use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
/// Megabytes
const DEFAULT_MAX_IMAGE_SIZE: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("invalid MAXIMAGESIZE (megabytes expected): {0}")]
    InvalidMaxImageSize(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a request body, in megabytes
    pub max_image_size_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_image_size_mb: DEFAULT_MAX_IMAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `MAXIMAGESIZE`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST").filter(|h| !h.is_empty()) {
            config.host = host;
        }

        match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(port) => {
                config.port = port
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            }
            None => log::warn!("No PORT set, defaulting to {}", DEFAULT_PORT),
        }

        match lookup("MAXIMAGESIZE").filter(|s| !s.is_empty()) {
            Some(size) => {
                config.max_image_size_mb = size
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidMaxImageSize(size.clone()))?;
            }
            None => log::warn!(
                "No MAXIMAGESIZE set, defaulting to {} MB",
                DEFAULT_MAX_IMAGE_SIZE
            ),
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.max_image_size_mb.saturating_mul(1024 * 1024)
    }
}
