use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header::HOST, request::Parts},
};
use tracing::{debug, info};

pub(crate) const X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// The candidate client address of a request, before any validation
///
/// The leftmost entry of the `X-Forwarded-For` header wins when there is one,
/// otherwise it's the peer address of the connection as `ip:port`. The header
/// is trusted verbatim, so the candidate may carry a port suffix or be plain
/// garbage; pass it through [`crate::valid_ip`] before use.
///
/// The peer address comes from [`axum::extract::ConnectInfo`], so serve the
/// router with [`axum::routing::Router::into_make_service_with_connect_info`].
/// Without it the peer is empty and the request ends up as an invalid IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress {
    /// Host the request was addressed to
    pub host: String,
    /// Transport peer address, empty if unknown
    pub peer: String,
    /// Address chosen to represent the client
    pub candidate: String,
}

impl ClientAddress {
    /// Picks the candidate address from the request headers and the peer.
    pub fn from(headers: &HeaderMap, host: String, peer: String) -> Self {
        info!("Received request from host: {host}, remoteAddr: {peer}");

        let candidate = leftmost_forwarded_for(headers).unwrap_or_else(|| peer.clone());
        debug!("Client IP is: {candidate}");

        Self {
            host,
            peer,
            candidate,
        }
    }
}

impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(HOST)
            .and_then(|hv| hv.to_str().ok())
            .map(str::to_owned)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();
        let peer = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();
        Ok(Self::from(&parts.headers, host, peer))
    }
}

/// Returns the first entry of the first `X-Forwarded-For` header value
///
/// Entries are separated by commas and/or spaces. Nothing is parsed here, the
/// entry is returned as the proxy chain wrote it. A non-empty value without
/// any entry is returned whole, and non-UTF-8 bytes are replaced, so both end
/// up rejected as invalid instead of falling back to the peer.
pub(crate) fn leftmost_forwarded_for(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(X_FORWARDED_FOR)
        .filter(|hv| !hv.is_empty())?;
    let value = String::from_utf8_lossy(value.as_bytes());
    let entry = value
        .split([',', ' '])
        .find(|entry| !entry.is_empty())
        .unwrap_or(value.as_ref());
    Some(entry.to_owned())
}
