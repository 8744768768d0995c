//! Per-endpoint service demand. Each successful call spends a fixed base work
//! time divided by the current load weight, so a controller that raises the
//! weight makes the service answer faster.

use acmeair_core::{scaled_demand, Controllable};
use tracing::trace;
use crate::state::AppState;

/// Base demand in milliseconds for `POST /bookflights`.
pub const BOOK_FLIGHTS: u64 = 100;
/// `GET /bybookingnumber/{userid}/{number}`
pub const BOOKING_BY_NUMBER: u64 = 120;
/// `GET /byuser/{user}`
pub const BOOKINGS_BY_USER: u64 = 140;
/// `POST /cancelbooking`
pub const CANCEL_BOOKING: u64 = 87;

pub async fn emulate(state: &AppState, base_ms: u64) {
    if !state.service_demand {
        return;
    }
    let delay = scaled_demand(base_ms, state.load.hw());
    trace!("Service demand {}ms -> {:?}", base_ms, delay);
    tokio::time::sleep(delay).await;
}
