use axum::{
    Router,
    http::Method,
};
use std::future::Future;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod demand;
pub mod error;
pub mod middleware;
pub mod state;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(bookings::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(state.clone(), middleware::track_active_requests))
        .with_state(state)
}

/// Resolves when `signal` fires. If the signal handler could not be installed
/// the error is logged and shutdown starts right away.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!("Failed to listen for shutdown signal, shutting down: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_install_failure_shuts_down_immediately() {
        let failed = async { Err(std::io::Error::other("signal driver unavailable")) };
        tokio::time::timeout(Duration::from_secs(1), shutdown_on(failed))
            .await
            .expect("shutdown should not wait");
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_signal() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let signal = async move {
            let _ = rx.await;
            Ok(())
        };
        let shutdown = tokio::spawn(shutdown_on(signal));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!shutdown.is_finished());

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), shutdown)
            .await
            .expect("shutdown after signal")
            .unwrap();
    }
}
