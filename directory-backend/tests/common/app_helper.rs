// tests/common/app_helper.rs
use axum::Router;
use directory_backend::api::{app_router, AppState};
use directory_backend::middleware::auth::ApiKeyAuthConfig;

use crate::common;

pub const TEST_API_KEY: &str = "test-api-key";

/// テスト用 DB に繋いだルーター
pub async fn setup_app() -> (Router, common::db::TestDatabase) {
    let db = common::db::TestDatabase::new().await;
    let app = app_router(
        AppState::new(db.connection.clone()),
        ApiKeyAuthConfig::new(TEST_API_KEY),
    );
    (app, db)
}
