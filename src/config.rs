use std::{net::SocketAddr, time::Duration};

use serde::Deserialize;

use crate::geo::DEFAULT_PROVIDER;

const ENV_PREFIX: &str = "CHECKIP_";

/// Service configuration, read from `CHECKIP_*` environment variables
///
/// ```sh
/// CHECKIP_LISTEN=127.0.0.1:8080 CHECKIP_LOOKUP_TIMEOUT_SECS=5 checkip
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Address to listen on, `CHECKIP_LISTEN`
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Base URL of the geolocation provider, `CHECKIP_PROVIDER_URL`
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// Upper bound for a lookup in seconds, `CHECKIP_LOOKUP_TIMEOUT_SECS`.
    /// Lookups aren't bounded when unset.
    #[serde(default)]
    pub lookup_timeout_secs: Option<u64>,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 80))
}

fn default_provider_url() -> String {
    DEFAULT_PROVIDER.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            provider_url: default_provider_url(),
            lookup_timeout_secs: None,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails on a malformed variable.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Reads the configuration from `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Fails on a malformed variable.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    /// Lookup timeout, if any
    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_secs.map(Duration::from_secs)
    }
}
