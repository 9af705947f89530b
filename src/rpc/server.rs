//! RPC HTTP Server
//!
//! Axum-based HTTP server that handles JSON-RPC requests.

use crate::rpc::methods::{handle_request, JsonRpcRequest, JsonRpcResponse, RpcState};
use crate::storage::KvStore;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Router serving JSON-RPC on `/`
pub fn router<St: KvStore + Send + 'static>(state: Arc<RpcState<St>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(handle_rpc::<St>))
        .layer(cors)
        .with_state(state)
}

/// Start the RPC server on the specified port
pub async fn start_rpc_server<St: KvStore + Send + 'static>(
    state: Arc<RpcState<St>>,
    port: u16,
) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "RPC server listening");
    axum::serve(listener, router(state)).await
}

/// Handle incoming JSON-RPC requests
async fn handle_rpc<St: KvStore + Send + 'static>(
    State(state): State<Arc<RpcState<St>>>,
    Json(request): Json<JsonRpcRequest>,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let response = handle_request(&state, request);
    (StatusCode::OK, Json(response))
}
