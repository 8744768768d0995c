use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;
use crate::CoreResult;

/// Hooks polled by the control-plane reporter.
pub trait Controllable: Send + Sync {
    fn hw(&self) -> f32;
    fn name(&self) -> &str;
    fn set_hw(&self, hw: f32);
    fn user(&self) -> i64;
    fn ingress(&self);
    fn egress(&self);
}

/// Point-in-time view of a service's load, as sent to a monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadSnapshot {
    pub name: String,
    pub hw: f32,
    pub users: i64,
}

impl LoadSnapshot {
    pub fn capture(service: &dyn Controllable) -> Self {
        Self {
            name: service.name().to_string(),
            hw: service.hw(),
            users: service.user(),
        }
    }
}

/// Destination for periodic load reports.
#[async_trait]
pub trait ControlSink: Send + Sync {
    /// Publish a snapshot. A returned value is a new load-weight hint
    /// requested by the monitor.
    async fn report(&self, snapshot: &LoadSnapshot) -> CoreResult<Option<f32>>;
}

// Smallest load weight used for scaling; keeps the delay finite.
const MIN_HW: f32 = 0.01;

/// Work time an endpoint spends for a base demand of `base_ms` on a
/// service with load weight `hw`. A larger weight means faster service.
///
/// A weight that is not a positive finite number leaves the base demand unscaled.
pub fn scaled_demand(base_ms: u64, hw: f32) -> Duration {
    let base = Duration::from_millis(base_ms);
    if !hw.is_finite() || hw <= 0.0 {
        return base;
    }
    let nanos = (base.as_nanos() as f64 / f64::from(hw.max(MIN_HW))).round();
    // float-to-int `as` saturates
    Duration::from_nanos(nanos as u64)
}

/// Active-request counter plus the static load configuration of this service.
#[derive(Debug)]
pub struct ServiceLoad {
    name: String,
    // f32 bit pattern
    hw: AtomicU32,
    users: AtomicI64,
}

impl ServiceLoad {
    pub fn new(name: impl Into<String>, hw: f32) -> Self {
        Self {
            name: name.into(),
            hw: AtomicU32::new(hw.to_bits()),
            users: AtomicI64::new(0),
        }
    }

    pub fn increment(&self) -> i64 {
        self.users.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn decrement(&self) -> i64 {
        self.users.fetch_sub(1, Ordering::SeqCst) - 1
    }

    pub fn current(&self) -> i64 {
        self.users.load(Ordering::SeqCst)
    }
}

impl Controllable for ServiceLoad {
    fn hw(&self) -> f32 {
        f32::from_bits(self.hw.load(Ordering::SeqCst))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_hw(&self, hw: f32) {
        self.hw.store(hw.to_bits(), Ordering::SeqCst);
    }

    fn user(&self) -> i64 {
        self.current()
    }

    fn ingress(&self) {
        self.increment();
    }

    fn egress(&self) {
        self.decrement();
    }
}
