//! Server configuration from the environment.

use crate::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

/// Where the relay listens.
///
/// | Variable      | Default       |
/// |---------------|---------------|
/// | `HOST`        | `0.0.0.0`     |
/// | `PORT`        | `3001`        |
/// | `STATUS_PORT` | `PORT + 1`    |
///
/// `PORT` carries the WebSocket endpoint; `STATUS_PORT` serves the HTTP
/// probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub status_port: u16,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a port variable is set but not a valid
    /// port.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());

        let port = parse_port("PORT", lookup("PORT"))?.unwrap_or(DEFAULT_PORT);
        let status_port = match parse_port("STATUS_PORT", lookup("STATUS_PORT"))? {
            Some(p) => p,
            None => port.checked_add(1).ok_or(ConfigError::NoStatusPort(port))?,
        };

        Ok(Self {
            host,
            port,
            status_port,
        })
    }

    /// `host:port` for the WebSocket listener.
    pub fn ws_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `host:status_port` for the HTTP probe listener.
    pub fn status_addr(&self) -> String {
        format!("{}:{}", self.host, self.status_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            status_port: DEFAULT_PORT + 1,
        }
    }
}

fn parse_port(var: &'static str, raw: Option<String>) -> Result<Option<u16>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidPort { var, value }),
    }
}
