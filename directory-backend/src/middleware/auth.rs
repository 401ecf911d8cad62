// src/middleware/auth.rs

//! 固定の API キーによる Bearer 認証
//!
//! * Authorization ヘッダーが無い → 401
//! * スキームが Bearer でない → 401
//! * トークンが一致しない → 403

use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// 認証ミドルウェアの設定
#[derive(Clone)]
pub struct ApiKeyAuthConfig {
    pub api_key: Arc<str>,
}

impl ApiKeyAuthConfig {
    pub fn new(api_key: impl Into<Arc<str>>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

pub async fn api_key_auth_middleware(
    State(config): State<ApiKeyAuthConfig>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(err) = verify_api_key(&headers, &config.api_key) {
        warn!(
            path = %request.uri().path(),
            error = %err,
            "API key authentication failed"
        );
        return Err(err);
    }

    Ok(next.run(request).await)
}

/// ヘッダーからトークンを取り出して設定値と比較する
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    let token = extract_bearer_token(headers)?;
    if !constant_time_eq(token.as_bytes(), expected.as_bytes()) {
        return Err(AppError::Forbidden("Invalid API Key".to_string()));
    }
    Ok(())
}

/// `Authorization: Bearer <token>` のトークン部分（スキームは大文字小文字を区別しない）
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Authorization header missing".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    let (scheme, token) = value.trim().split_once(' ').unwrap_or((value.trim(), ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(
            "Invalid authentication scheme".to_string(),
        ));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized(
            "Invalid authorization header".to_string(),
        ));
    }
    Ok(token)
}

// 比較時間が一致位置に依存しないようにする
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
