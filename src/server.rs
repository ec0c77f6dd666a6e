//! Process lifecycle: startup, both listeners, and shutdown.
//!
//! Startup order is strict. The store is dialed and migrated, the retention
//! policy installed and the hit worker spawned before either listener binds,
//! so no request can observe a half-initialized service. Any failure along
//! the way, or either listener terminating with an error afterwards, is a
//! [`FatalError`] and ends the process.

use crate::application::services::LinkRegistry;
use crate::config::Config;
use crate::domain::hit_worker::run_hit_worker;
use crate::domain::repositories::{HitRepository, LinkRepository};
use crate::domain::retention::RetentionPolicy;
use crate::error::FatalError;
use crate::infrastructure::persistence::{PgHitRepository, PgLinkRepository};
use crate::infrastructure::store::StorePool;
use crate::routes::{PRIVATE_LISTENER, PUBLIC_LISTENER, normalized, private_router, public_router};
use crate::state::AppState;

use axum::extract::Request;
use axum::{Router, ServiceExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Upper bound on how long queued hits may keep the process alive after shutdown.
const HIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the service until a shutdown signal arrives or a listener fails.
///
/// Initializes, in order:
/// - Store connection pool (one dial, shared by every request)
/// - Migrations
/// - Hit retention (expiry index + periodic sweep)
/// - Background hit worker
/// - Public and private listeners
///
/// # Errors
///
/// Returns an error if:
/// - The store is unreachable or migrations fail
/// - Either listener cannot bind its address
/// - Either listener terminates with an I/O error
pub async fn run(config: Config) -> Result<(), FatalError> {
    let store = StorePool::connect(&config).await?;

    sqlx::migrate!("./migrations").run(store.pool()).await?;
    tracing::info!("Store migrations applied");

    let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(store.clone()));
    let hits: Arc<dyn HitRepository> = Arc::new(PgHitRepository::new(store.clone()));

    let retention = RetentionPolicy::from_config(&config);
    let sweeper = retention.install(hits.clone());
    tracing::info!(
        retention_days = retention.window_days(),
        "Hit retention policy installed"
    );

    let (hit_tx, hit_rx) = mpsc::channel(config.hit_queue_capacity);
    let worker = tokio::spawn(run_hit_worker(
        hit_rx,
        hits.clone(),
        config.hit_worker_concurrency,
    ));
    tracing::info!("Hit worker started");

    let registry = Arc::new(LinkRegistry::new(links, hits, hit_tx, retention));
    let state = AppState::new(
        registry,
        Arc::new(store.clone()),
        config.public_base_url.as_str(),
        Duration::from_millis(config.healthcheck_timeout_ms),
    );

    let public = bind_listener(PUBLIC_LISTENER, &config.public_addr).await?;
    let private = bind_listener(PRIVATE_LISTENER, &config.private_addr).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let served = serve_both(
        public,
        public_router(state.clone()),
        private,
        private_router(state),
        shutdown_rx,
    )
    .await;

    // Every sender lived in the routers; the worker now sees a closed channel.
    drain_hit_worker(worker, HIT_DRAIN_TIMEOUT).await;
    sweeper.abort();
    store.close().await;

    served
}

/// Waits for the hit worker to finish. Returns whether it drained cleanly.
async fn drain_hit_worker(worker: JoinHandle<()>, limit: Duration) -> bool {
    match tokio::time::timeout(limit, worker).await {
        Ok(Ok(())) => {
            tracing::info!("Hit worker drained");
            true
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Hit worker terminated abnormally");
            false
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = limit.as_secs(),
                "Hit worker did not drain in time, pending hits are lost"
            );
            false
        }
    }
}

/// Binds one listener, mapping failure to a fatal error naming the listener.
pub async fn bind_listener(name: &'static str, addr: &str) -> Result<TcpListener, FatalError> {
    let bind_error = |source| FatalError::Bind {
        listener: name,
        addr: addr.to_string(),
        source,
    };

    let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
    let local = listener.local_addr().map_err(bind_error)?;
    tracing::info!(listener = name, "Listening on http://{local}");

    Ok(listener)
}

/// Serves both routers concurrently.
///
/// Completes once both listeners stopped gracefully, or as soon as one of
/// them fails; in the latter case the other is dropped with it.
pub async fn serve_both(
    public: TcpListener,
    public_app: Router,
    private: TcpListener,
    private_app: Router,
    shutdown: watch::Receiver<bool>,
) -> Result<(), FatalError> {
    supervise(
        serve_listener(PUBLIC_LISTENER, public, public_app, shutdown.clone()),
        serve_listener(PRIVATE_LISTENER, private, private_app, shutdown),
    )
    .await
}

/// Drives two listener futures jointly.
///
/// The first error cancels the other future and is returned as is; there is
/// no restart of a failed listener.
pub async fn supervise<P, Q>(public: P, private: Q) -> Result<(), FatalError>
where
    P: Future<Output = Result<(), FatalError>>,
    Q: Future<Output = Result<(), FatalError>>,
{
    tokio::try_join!(public, private)?;
    Ok(())
}

/// Serves one router until shutdown is signalled or the listener fails.
pub async fn serve_listener(
    name: &'static str,
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), FatalError> {
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(normalized(app)),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown.wait_for(|stop| *stop).await;
    })
    .await
    .map_err(|source| {
        tracing::error!(listener = name, error = %source, "Listener failed");
        FatalError::Listener {
            listener: name,
            source,
        }
    })?;

    tracing::info!(listener = name, "Listener stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
