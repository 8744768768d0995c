use std::sync::Arc;
use acmeair_core::{AuthGuard, BookingService, Controllable, RewardTracker};

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingService>,
    pub rewards: Arc<dyn RewardTracker>,
    pub auth: Arc<dyn AuthGuard>,
    pub load: Arc<dyn Controllable>,
    /// Spend the per-endpoint work time on successful calls.
    pub service_demand: bool,
}
