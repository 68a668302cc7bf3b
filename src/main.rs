use axum::Router;
use std::sync::Arc;
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equiptrack::app::clock::SystemClock;
use equiptrack::app::notifications::NotificationSettings;
use equiptrack::config::{AppConfig, NotificationStoreKind};
use equiptrack::http;
use equiptrack::infra::notification_store::{
    MemoryNotificationStore, NotificationStore, RedisNotificationStore,
};
use equiptrack::infra::repositories::{PgEquipmentRepository, PgTenantRepository};
use equiptrack::infra::{cache::RedisCache, db::Db};
use equiptrack::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let db = Db::connect(&config).await?;
    let store: Arc<dyn NotificationStore> = match config.notification_store {
        NotificationStoreKind::Redis => {
            let cache = RedisCache::connect(&config.redis_url).await?;
            Arc::new(RedisNotificationStore::new(cache))
        }
        NotificationStoreKind::Memory => {
            tracing::warn!("using in-memory notification store; notifications are lost on restart");
            Arc::new(MemoryNotificationStore::new())
        }
    };

    let state = AppState::new(
        Arc::new(PgTenantRepository::new(db.clone())),
        Arc::new(PgEquipmentRepository::new(db)),
        store,
        Arc::new(SystemClock),
        NotificationSettings {
            dedup_window: Duration::days(config.notification_dedup_window_days),
            cap: config.notification_cap,
        },
    );

    let app: Router = http::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
