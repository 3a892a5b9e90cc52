use std::{io, net::SocketAddr};

use thiserror::Error;

/// Errors that stop the service
#[derive(Debug, Error)]
pub enum Error {
    /// A `CHECKIP_*` variable is malformed
    #[error("invalid configuration: {0}")]
    Config(#[from] envy::Error),
    /// The geolocation HTTP client couldn't be built
    #[error("failed to initialize the geolocation client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The listening socket couldn't be bound
    #[error("ListenAndServe: failed to bind {addr}: {source}")]
    Bind {
        /// Requested listening address
        addr: SocketAddr,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// The server stopped with an error
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
