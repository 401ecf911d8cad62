// src/api/handlers/system_handler.rs
use crate::api::AppState;
use crate::error::AppResult;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// 認証不要。DB に届くことまで確認する
pub async fn health_handler(State(app_state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    app_state.db.ping().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state)
}
