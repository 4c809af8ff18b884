//! HTTP surface called by the proxy.

use std::sync::Arc;

use actors::CommandDispatcher;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

/// Path the proxy posts invocations to.
pub const ACTIONS_PATH: &str = "/api/v1/actors/actions";

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Build the router around a shared dispatcher.
pub fn router(dispatcher: Arc<CommandDispatcher>) -> Router {
    Router::new()
        .route(ACTIONS_PATH, post(handle_actions))
        .route("/status", get(status))
        .with_state(dispatcher)
}

/// Invocation bytes in, response bytes out.
///
/// Always answers 200: failures travel inside the response envelope.
async fn handle_actions(State(dispatcher): State<Arc<CommandDispatcher>>, body: Bytes) -> impl IntoResponse {
    let response = dispatcher.handle(&body).await;
    ([(header::CONTENT_TYPE, OCTET_STREAM)], response)
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    actor_types: usize,
    active_actors: usize,
}

async fn status(State(dispatcher): State<Arc<CommandDispatcher>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        actor_types: dispatcher.registry().len(),
        active_actors: dispatcher.active_actors(),
    })
}
