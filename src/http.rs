use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use tracing::debug;

use crate::aws::sts::{StsConnector, TokenExchange};
use crate::constants::{HEALTH_ROUTE, SESSION_TOKEN_ROUTE};
use crate::error::AppError;

/// Build the service router. Each route is registered here and nowhere else.
pub fn router<C: StsConnector>(exchange: Arc<TokenExchange<C>>) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(health_check))
        .route(SESSION_TOKEN_ROUTE, get(get_session_token::<C>))
        .with_state(exchange)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn get_session_token<C: StsConnector>(
    State(exchange): State<Arc<TokenExchange<C>>>,
) -> Result<impl IntoResponse, AppError> {
    debug!("GET {}", SESSION_TOKEN_ROUTE);
    let credentials = exchange.issue_session_token().await?;
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(credentials)))
}
