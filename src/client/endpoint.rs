//! Endpoint resolution - host and port of the PharoSmalltalkInteropServer

use std::fmt;

use crate::error::{InteropError, Result};

/// Environment variable overriding the default port
pub const PORT_ENV_VAR: &str = "PHARO_SIS_PORT";

pub const DEFAULT_HOST: &str = "localhost";

pub const DEFAULT_PORT: u16 = 8086;

/// Where the remote server listens. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolve from explicit values and the process environment
    ///
    /// Explicit port > `PHARO_SIS_PORT` > 8086. The environment is read here
    /// and nowhere else.
    pub fn resolve(host: Option<&str>, port: Option<u16>) -> Result<Self> {
        let env_port = std::env::var(PORT_ENV_VAR).ok();
        Self::from_parts(host, port, env_port.as_deref())
    }

    /// Resolution with the environment value passed in
    pub fn from_parts(host: Option<&str>, port: Option<u16>, env_port: Option<&str>) -> Result<Self> {
        let host = host.unwrap_or(DEFAULT_HOST);

        let port = match (port, env_port) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw.trim().parse::<u16>().map_err(|e| {
                InteropError::Config(format!("{} is not a valid port ('{}'): {}", PORT_ENV_VAR, raw, e))
            })?,
            (None, None) => DEFAULT_PORT,
        };

        Ok(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Full URL for an endpoint path such as `/eval`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url())
    }
}
