// src/main.rs
use directory_backend::api::{app_router, AppState};
use directory_backend::config::Config;
use directory_backend::db::{create_db_pool, run_migrations};
use directory_backend::logging::init_tracing;
use directory_backend::middleware::auth::ApiKeyAuthConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    tracing::info!("Starting Directory Backend server...");

    // 設定を読み込む
    let app_config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    tracing::info!("Configuration loaded: {:?}", app_config);

    // データベース接続プールを作成（終了時に明示的に閉じる）
    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    if app_config.run_migrations {
        run_migrations(&db_pool).await?;
        tracing::info!("Database migrations applied.");
    }

    let app_state = AppState::new(db_pool.clone());
    let router = app_router(app_state, ApiKeyAuthConfig::new(app_config.api_key.as_str()));

    let listener = TcpListener::bind(app_config.server_addr()).await?;
    tracing::info!("Server listening on {}", app_config.server_addr());

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await?;
    tracing::info!("Database pool closed. Bye.");

    Ok(())
}

// Ctrl-C か SIGTERM で停止する
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
