pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pagination::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/paginate", post(handlers::handle_paginate))
        .with_state(state)
}
