//! HTTP liveness probes.
//!
//! Served on their own listener next to the WebSocket endpoint. Both are
//! unauthenticated and open to every origin.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::server::ServerState;

#[derive(Debug, Serialize)]
struct Banner {
    status: &'static str,
    message: &'static str,
    /// Milliseconds since the Unix epoch.
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    rooms: usize,
    connections: usize,
}

pub(crate) fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn banner() -> Json<Banner> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    Json(Banner {
        status: "Server running",
        message: "Ludo Game Relay Server",
        timestamp,
    })
}

async fn health(State(state): State<Arc<ServerState>>) -> Json<Health> {
    let rooms = state.rooms.lock().await.room_count();
    Json(Health {
        status: "healthy",
        rooms,
        connections: state.connections.load(Ordering::Relaxed),
    })
}
