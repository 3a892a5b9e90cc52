//! A tiny service telling clients their public IP address
//!
//! Every request, whatever the method or path, gets an HTML page with the
//! client's IP and, for public addresses, the timezone and location reported by
//! a geolocation provider:
//!
//! ```text
//! Current IP Address: 2001:4860:4860::8888
//! Time Zone: America/Los_Angeles
//! Location: Mountain View, CA, USA
//! ```
//!
//! The client IP is the leftmost `X-Forwarded-For` entry, or the connection
//! peer when the header is missing. The header isn't checked against trusted
//! proxies, so a client can claim any address. That's fine for showing a
//! location, not for anything security related.
//!
//! Private addresses (loopback, link-local, RFC1918, IPv6 unique local) are
//! never sent to the provider, and a failed lookup just leaves `NA` in place.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//!
//! use checkip::{AppState, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let state = AppState::from_config(&config).unwrap();
//!     let listener = tokio::net::TcpListener::bind(config.listen).await.unwrap();
//!     axum::serve(
//!         listener,
//!         // The peer address is needed when there's no proxy in front
//!         checkip::app(state).into_make_service_with_connect_info::<SocketAddr>(),
//!     )
//!     .await
//!     .unwrap()
//! }
//! ```

use std::sync::Arc;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;
use tracing::info_span;

mod client_addr;
mod config;
mod error;
mod geo;
mod handler;
pub mod logging;
mod normalize;
mod private;
mod render;
#[cfg(test)]
mod test_support;

pub use client_addr::ClientAddress;
pub use config::Config;
pub use error::Error;
pub use geo::{DEFAULT_PROVIDER, Fault, GeoError, GeoLocator, Geolocation, NOT_AVAILABLE};
pub use normalize::valid_ip;
pub use private::PrivateRanges;
pub use render::{render_invalid, render_page};

/// Read-only state shared by all requests
#[derive(Debug)]
pub struct AppState {
    ranges: PrivateRanges,
    locator: GeoLocator,
}

impl AppState {
    /// Creates the state from its parts.
    pub fn new(ranges: PrivateRanges, locator: GeoLocator) -> Self {
        Self { ranges, locator }
    }

    /// Creates the state with the standard private ranges and the configured
    /// provider.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client can't be initialized.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let locator = GeoLocator::new(&config.provider_url, config.lookup_timeout())?;
        Ok(Self::new(PrivateRanges::standard(), locator))
    }
}

/// Builds the router answering every method and path
pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback(handler::check_ip)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri()
                )
            }),
        )
        .with_state(Arc::new(state))
}
