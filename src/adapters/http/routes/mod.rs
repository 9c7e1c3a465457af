pub mod auth;
pub mod cart;
pub mod products;

use axum::{Json, Router, middleware, routing::get};
use chrono::Utc;

use crate::adapters::http::{app_state::AppState, middleware::auth_middleware};

pub fn router(app_state: AppState) -> Router<AppState> {
    // Everything outside auth/products/health requires a bearer session token.
    let protected = Router::new()
        .nest("/cart", cart::router())
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware));

    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .route("/health", get(health))
        .merge(protected)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
