use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use acmeair_core::{ControlSink, Controllable, CoreResult, LoadSnapshot};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Sink that only writes snapshots to the log.
pub struct LogSink;

#[async_trait]
impl ControlSink for LogSink {
    async fn report(&self, snapshot: &LoadSnapshot) -> CoreResult<Option<f32>> {
        debug!(name = %snapshot.name, users = snapshot.users, hw = snapshot.hw, "load report");
        Ok(None)
    }
}

/// Send one snapshot and apply any load-weight hint the sink hands back.
pub async fn report_once(service: &dyn Controllable, sink: &dyn ControlSink) {
    let snapshot = LoadSnapshot::capture(service);
    match sink.report(&snapshot).await {
        Ok(Some(hw)) => {
            info!("Control plane set hw for {}: {} -> {}", snapshot.name, snapshot.hw, hw);
            service.set_hw(hw);
        }
        Ok(None) => {}
        Err(e) => warn!("Failed to report load for {}: {}", snapshot.name, e),
    }
}

/// Report load every `period` until `shutdown` flips to true or its sender is dropped.
pub async fn run_control_reporter(
    service: Arc<dyn Controllable>,
    sink: Arc<dyn ControlSink>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    info!("Control reporter started for {} every {:?}", service.name(), period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report_once(service.as_ref(), sink.as_ref()).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Control reporter stopped for {}", service.name());
}

pub fn spawn_control_reporter(
    service: Arc<dyn Controllable>,
    sink: Arc<dyn ControlSink>,
    period: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(run_control_reporter(service, sink, period, shutdown))
}
