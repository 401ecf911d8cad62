// src/logging/mod.rs

//! ログ初期化とリクエスト単位の相関
//!
//! `inject_request_context` がリクエストごとに `request` スパンを開くので、
//! その内側で出るサービス・リポジトリのログ（`organization_id` や
//! `activity_id` 付き）はすべて同じ `request_id` で追える。

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info_span, Instrument};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

pub const DEFAULT_LOG_FILTER: &str = "directory_backend=info,tower_http=info";

/// リクエストIDを受け取り・返すヘッダー
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// キーと値を並べて構造化ログを出す
///
/// ```ignore
/// log_with_context!(tracing::Level::INFO, "Organization created", organization_id => id);
/// ```
#[macro_export]
macro_rules! log_with_context {
    ($level:expr, $msg:expr $(, $($key:ident => $value:expr),* $(,)?)?) => {
        match $level {
            tracing::Level::ERROR => {
                tracing::error!(message = $msg $(, $($key = ?$value,)*)?);
            }
            tracing::Level::WARN => {
                tracing::warn!(message = $msg $(, $($key = ?$value,)*)?);
            }
            tracing::Level::INFO => {
                tracing::info!(message = $msg $(, $($key = ?$value,)*)?);
            }
            _ => {
                tracing::debug!(message = $msg $(, $($key = ?$value,)*)?);
            }
        }
    };
}

/// トレーシングの初期化（RUST_LOG が無ければデフォルトフィルタ）
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(fmt::layer())
        .init();
}

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub path: String,
    pub method: String,
}

impl RequestContext {
    fn from_request(req: &Request<Body>) -> Self {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(accept_request_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            request_id,
            path: req.uri().path().to_string(),
            method: req.method().to_string(),
        }
    }
}

// 呼び出し側のIDはログに載せられる形のときだけ引き継ぐ
fn accept_request_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let acceptable = !trimmed.is_empty()
        && trimmed.len() <= MAX_REQUEST_ID_LEN
        && trimmed.chars().all(|c| c.is_ascii_graphic());
    acceptable.then(|| trimmed.to_string())
}

/// リクエストIDを決めて `request` スパンの中で後続を実行し、応答ヘッダーにも載せる
pub async fn inject_request_context(mut req: Request<Body>, next: Next) -> Response {
    let context = RequestContext::from_request(&req);
    let span = info_span!(
        "request",
        request_id = %context.request_id,
        method = %context.method,
        path = %context.path,
    );
    let request_id = context.request_id.clone();
    req.extensions_mut().insert(context);

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// 完了ログ。5xx は ERROR、4xx は WARN（認証失敗や NotFound を含む）
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let response = next.run(req).await;
    let status = response.status();

    let level = if status.is_server_error() {
        tracing::Level::ERROR
    } else if status.is_client_error() {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    log_with_context!(
        level,
        "Request completed",
        status => status.as_u16(),
        duration_ms => start.elapsed().as_millis(),
    );

    response
}
