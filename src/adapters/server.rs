use crate::core::responder::Responder;
use crate::utils::error::{GachaError, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;

pub const EVENT_CONTENT_TYPE: &str = "text/json; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    pub responder: Responder,
}

impl IntoResponse for GachaError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub fn router(responder: Responder) -> Router {
    Router::new()
        .route("/", any(gacha_handler))
        .with_state(AppState { responder })
}

/// Binds the webhook port. Failures are reported against the `port` setting.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let address = format!("0.0.0.0:{}", port);
    TcpListener::bind(&address)
        .await
        .map_err(|e| GachaError::InvalidConfigValueError {
            field: "port".to_string(),
            value: port.to_string(),
            reason: format!("cannot bind {}: {}", address, e),
        })
}

/// Serves the webhook until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, responder: Responder, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(responder))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn gacha_handler(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    // Only POST carries an event; anything else gets an empty 200.
    if method != Method::POST {
        return StatusCode::OK.into_response();
    }

    let reply = state
        .responder
        .respond_to_json(&body)
        .and_then(|event| Ok(serde_json::to_vec(&event)?));

    match reply {
        Ok(json) => ([(CONTENT_TYPE, EVENT_CONTENT_TYPE)], json).into_response(),
        Err(e) => {
            tracing::error!("❌ Gacha request failed: {}", e);
            e.into_response()
        }
    }
}
