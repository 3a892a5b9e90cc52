//! `checkip` server
//!
//! Configured with `CHECKIP_*` environment variables, logging is controlled
//! with `RUST_LOG`.

use std::{net::SocketAddr, process::ExitCode};

use checkip::{AppState, Config, Error};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    checkip::logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| Error::Bind {
            addr: config.listen,
            source,
        })?;
    info!("Listening on {}", config.listen);

    axum::serve(
        listener,
        checkip::app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(Error::Serve)
}
