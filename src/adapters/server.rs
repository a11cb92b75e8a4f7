use crate::core::relay::ContactRelay;
use crate::core::{ConfigProvider, EmailProvider, RelayRequest, RelayResponse};
use crate::domain::model::ALLOWED_HEADERS;
use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue, Method,
    },
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub fn router<P, C>(relay: Arc<ContactRelay<P, C>>) -> Router<()>
where
    P: EmailProvider + 'static,
    C: ConfigProvider + 'static,
{
    // Messages have no length cap. Responses produced by axum itself
    // (404, body read failures) still get the CORS headers.
    Router::new()
        .route("/", routing::any(relay_handler::<P, C>))
        .route("/send-contact-email", routing::any(relay_handler::<P, C>))
        .layer(DefaultBodyLimit::disable())
        .route("/health", routing::get(health))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Serves until Ctrl-C. In-flight requests finish before the listener closes.
pub async fn serve(listener: TcpListener, app: Router<()>) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn relay_handler<P, C>(
    State(relay): State<Arc<ContactRelay<P, C>>>,
    method: Method,
    body: Bytes,
) -> Response
where
    P: EmailProvider + 'static,
    C: ConfigProvider + 'static,
{
    let response = relay.handle(RelayRequest::new(method, body.to_vec())).await;
    into_response(response)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn into_response(response: RelayResponse) -> Response {
    let body = match &response.body {
        Some(_) => Body::from(response.body_string()),
        None => Body::empty(),
    };
    (response.status, response.headers, body).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
