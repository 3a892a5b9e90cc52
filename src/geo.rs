//! IP geolocation through an external JSON API
//!
//! The provider is queried with `GET {base}/{ip}/json` and is expected to answer
//! with an object like the one served by <http://ipapi.co>:
//!
//! ```json
//! {"timezone": "America/Los_Angeles", "city": "Mountain View",
//!  "region_code": "CA", "country_code_iso3": "USA"}
//! ```
//!
//! or, when it can't locate the address, `{"error": true, "reason": "..."}`.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Placeholder for data that is unavailable or wasn't looked up
pub const NOT_AVAILABLE: &str = "NA";

/// Provider used when nothing else is configured
pub const DEFAULT_PROVIDER: &str = "http://ipapi.co";

const INJECTED: &str = "injected fault";

/// Timezone and location of an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geolocation {
    /// IANA timezone name, e.g. `America/New_York`
    pub timezone: String,
    /// `city, region, country`
    pub location: String,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self {
            timezone: NOT_AVAILABLE.into(),
            location: NOT_AVAILABLE.into(),
        }
    }
}

/// Failure of a lookup, one variant per stage
#[derive(Debug, Error)]
pub enum GeoError {
    /// The request couldn't be sent or no response came back
    #[error("Failed to call Get: {0}")]
    Call(String),
    /// The response body couldn't be read
    #[error("Failed to read resp body: {0}")]
    ReadBody(String),
    /// The body isn't a JSON object
    #[error("Failed to unmarshal: {0}")]
    Decode(String),
    /// The provider answered with an error of its own
    #[error("Failed to get geolocation: {0}")]
    Provider(String),
}

/// Forces a lookup to fail at a given stage
///
/// Production code always passes [`Fault::None`]; the other variants let tests
/// walk each failure branch without breaking the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fault {
    /// Run the lookup as is
    #[default]
    None,
    /// Fail before sending the request
    Call,
    /// Fail reading the response body
    ReadBody,
    /// Fail decoding the body
    Decode,
    /// Treat the answer as a provider error
    Provider,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region_code: Option<String>,
    #[serde(default)]
    country_code_iso3: Option<String>,
}

impl ProviderResponse {
    /// Decodes a body that must be a JSON object
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_slice(body)?;
        serde_json::from_value(Value::Object(object))
    }

    fn is_error(&self) -> bool {
        !matches!(self.error, None | Some(Value::Null) | Some(Value::Bool(false)))
    }

    fn into_geolocation(self) -> Geolocation {
        let part = |s: Option<String>| s.unwrap_or_else(|| NOT_AVAILABLE.into());
        Geolocation {
            location: format!(
                "{}, {}, {}",
                part(self.city),
                part(self.region_code),
                part(self.country_code_iso3)
            ),
            timezone: part(self.timezone),
        }
    }
}

/// Client for the geolocation provider
///
/// Cheap to clone, all clones share one connection pool. There are no retries
/// and nothing is cached.
#[derive(Debug, Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    base_url: String,
}

impl GeoLocator {
    /// Creates a locator for the provider at `base_url`.
    ///
    /// Without a `timeout` a lookup waits for the provider as long as it takes.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client can't be initialized.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, base_url))
    }

    /// Creates a locator around an existing client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Looks up the timezone and location of `ip`.
    ///
    /// `ip` is put into the request path as is.
    ///
    /// # Errors
    ///
    /// Returns the stage that failed. Callers are expected to carry on with
    /// [`Geolocation::default`].
    pub async fn lookup(&self, ip: &str, fault: Fault) -> Result<Geolocation, GeoError> {
        if fault == Fault::Call {
            return Err(GeoError::Call(INJECTED.into()));
        }
        let url = format!("{}/{ip}/json", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeoError::Call(e.to_string()))?;

        if fault == Fault::ReadBody {
            return Err(GeoError::ReadBody(INJECTED.into()));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| GeoError::ReadBody(e.to_string()))?;

        if fault == Fault::Decode {
            return Err(GeoError::Decode(INJECTED.into()));
        }
        let answer =
            ProviderResponse::decode(&body).map_err(|e| GeoError::Decode(e.to_string()))?;

        if answer.is_error() || fault == Fault::Provider {
            let reason = answer.reason.unwrap_or_else(|| "unknown reason".into());
            return Err(GeoError::Provider(reason));
        }
        Ok(answer.into_geolocation())
    }
}
