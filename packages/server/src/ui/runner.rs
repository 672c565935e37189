//! Server startup.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::{ServerArgs, ServerConfig},
    error::ServerError,
    infrastructure::{repository::StoredContactRepository, store::JsonFileContactStore},
    ui::{
        handler::{health_check, stats, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the application router on top of `state`
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validate `args`, load the contact store and serve until Ctrl-C / SIGTERM.
pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let config = ServerConfig::try_from(args)?;
    let store = Arc::new(JsonFileContactStore::new(config.data_file.clone()));
    tracing::info!("Using data file {}", store.path().display());

    // Repository を作成（起動時に保存済みの状態を読み込む）
    let repository = Arc::new(StoredContactRepository::open(store).await);
    let state = Arc::new(AppState::new(repository));

    let app = build_router(state);

    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    tracing::info!("Listening on {}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn args(host: &str) -> ServerArgs {
        ServerArgs {
            host: host.to_string(),
            port: 0,
            data_file: Some(std::env::temp_dir().join("timechat-runner-unused.json")),
            log_level: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_config_stops_before_serving() {
        // テスト項目: 設定が不正なら待ち受けを始めずに ServerError::Config を返す
        // given (前提条件):
        let args = args("not an ip");

        // when (操作):
        let result = run(args).await;

        // then (期待する結果):
        match result {
            Err(ServerError::Config(e)) => {
                assert_eq!(e, ConfigError::InvalidHost("not an ip".to_string()));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
