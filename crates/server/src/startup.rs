use std::{future::Future, sync::Arc};

use anyhow::Context;
use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::employee::{
    repo::seaorm::SeaOrmEmployeeRepository,
    repository::EmployeeRepository,
    service::RegistrationConfig,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Serve `app` on `listener` until `shutdown` resolves; in-flight requests are drained.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server error")?;
    Ok(())
}

/// Public entry: bind the listener, connect the pool, build the app and run
/// the HTTP server until `shutdown` resolves. The pool is closed before returning.
pub async fn run<F>(mut cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(format!("{e:#}")))?;

    // 先绑定端口，绑定失败时尚未建立连接池
    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cfg.server.host, cfg.server.port))?;
    let addr = listener.local_addr()?;

    let db = models::db::connect_with_config(&cfg.database.clone().into())
        .await
        .map_err(|e| StartupError::Database(format!("{e:#}")))?;

    let repo: Arc<dyn EmployeeRepository> = Arc::new(SeaOrmEmployeeRepository::new(db.clone()));
    let state = ServerState::new(repo, RegistrationConfig::from(&cfg));
    let app = routes::build_router(state, build_cors());

    info!(%addr, "starting server crate");
    let served = serve(listener, app, shutdown).await;

    // 无论服务如何退出都关闭连接池；两者都失败时优先返回服务错误
    let closed = db.close().await.context("failed to close database pool");
    info!("database pool closed");
    served?;
    closed?;
    Ok(())
}
