use std::{net::IpAddr, sync::Arc};

use axum::{extract::State, response::Html};
use tracing::{info, warn};

use crate::{
    AppState, ClientAddress,
    geo::{Fault, Geolocation},
    normalize::valid_ip,
    render::{render_invalid, render_page},
};

/// Answers every request with the client's IP, timezone and location
pub(crate) async fn check_ip(
    State(state): State<Arc<AppState>>,
    addr: ClientAddress,
) -> Html<String> {
    Html(respond(&state, &addr.candidate).await)
}

async fn respond(state: &AppState, candidate: &str) -> String {
    let Some(ip) = valid_ip(candidate) else {
        warn!("Invalid IP: {candidate}");
        return render_invalid(candidate);
    };

    // an address left over from port stripping may not parse, it goes to the provider
    let private = ip
        .parse::<IpAddr>()
        .is_ok_and(|parsed| state.ranges.contains(parsed));

    let geo = if private {
        info!("IP {ip} is a private address");
        Geolocation::default()
    } else {
        state
            .locator
            .lookup(ip, Fault::None)
            .await
            .unwrap_or_else(|err| {
                warn!("{err}");
                Geolocation::default()
            })
    };

    let page = render_page(ip, &geo.timezone, &geo.location);
    info!("Return response to client: {page}");
    page
}
