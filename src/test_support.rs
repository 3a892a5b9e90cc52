//! In-process stand-in for the geolocation provider

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::GeoLocator;

pub(crate) struct MockProvider {
    pub(crate) base_url: String,
    pub(crate) hits: Arc<AtomicUsize>,
}

/// Serves canned answers on a random local port
pub(crate) async fn spawn_provider() -> MockProvider {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/{ip}/json", get(answer))
        .with_state(Arc::clone(&hits));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    MockProvider {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Locator that ignores proxy settings of the environment
pub(crate) fn locator(base_url: &str) -> GeoLocator {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    GeoLocator::with_client(client, base_url)
}

async fn answer(State(hits): State<Arc<AtomicUsize>>, Path(ip): Path<String>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    match ip.as_str() {
        "2001:4860:4860::8888" | "8.8.8.8" => Json(json!({
            "ip": ip,
            "city": "Mountain View",
            "region": "California",
            "region_code": "CA",
            "country_code_iso3": "USA",
            "timezone": "America/Los_Angeles",
        }))
        .into_response(),
        "8.8.2.8" => Json(json!({
            "ip": ip,
            "city": "Newark",
            "region": "New Jersey",
            "region_code": "NJ",
            "country_code_iso3": "USA",
            "timezone": "America/New_York",
        }))
        .into_response(),
        "1.2.3.4" => "<html>Too many requests</html>".into_response(),
        "5.6.7.8" => Json(json!([])).into_response(),
        _ => Json(json!({
            "ip": ip,
            "error": true,
            "reason": "Invalid IP Address",
        }))
        .into_response(),
    }
}
