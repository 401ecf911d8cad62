// src/api/mod.rs
use crate::api::handlers::{organization_handler, system_handler};
use crate::db::DbPool;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{api_key_auth_middleware, ApiKeyAuthConfig};
use crate::service::organization_service::OrganizationService;
use axum::{middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub organization_service: Arc<OrganizationService>,
    pub db: Arc<DbPool>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            organization_service: Arc::new(OrganizationService::new(db_pool.clone())),
            db: Arc::new(db_pool),
        }
    }
}

pub const API_PREFIX: &str = "/api/v1";

/// `/api/v1` 以下は API キー必須、`/health` は認証なし
pub fn app_router(app_state: AppState, auth_config: ApiKeyAuthConfig) -> Router {
    let protected = organization_handler::organization_router(app_state.clone()).route_layer(
        axum_middleware::from_fn_with_state(auth_config, api_key_auth_middleware),
    );

    Router::new()
        .nest(API_PREFIX, protected)
        .merge(system_handler::system_router(app_state))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
}
