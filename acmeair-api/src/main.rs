use std::sync::Arc;
use std::net::SocketAddr;
use std::time::Duration;
use anyhow::Context;
use acmeair_api::{app, state::AppState, worker};
use acmeair_core::{ControlSink, Controllable, ServiceLoad};
use acmeair_store::{app_config::Config, InMemoryBookingStore, JwtGuard, RedisClient, RedisControlSink, RewardLedger};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acmeair_api=debug,acmeair_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting booking service {} on port {}", config.control.name, config.server.port);

    let load: Arc<dyn Controllable> = Arc::new(ServiceLoad::new(config.control.name.clone(), config.control.hw));

    // Control-plane sink: Redis when configured, log otherwise
    let sink: Arc<dyn ControlSink> = match &config.control.redis_url {
        Some(url) => {
            let redis = RedisClient::new(url)
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(RedisControlSink::new(redis))
        }
        None => Arc::new(worker::LogSink),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reporter = worker::spawn_control_reporter(
        load.clone(),
        sink,
        Duration::from_millis(config.control.interval_ms),
        shutdown_rx,
    );

    let app_state = AppState {
        bookings: Arc::new(InMemoryBookingStore::new()),
        rewards: Arc::new(RewardLedger::new(config.rewards.track_reward_miles)),
        auth: Arc::new(JwtGuard::new(config.auth.jwt_secret.clone(), config.auth.secure_user_calls)),
        load,
        service_demand: config.control.service_demand,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(acmeair_api::shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    let _ = shutdown_tx.send(true);
    reporter.await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
