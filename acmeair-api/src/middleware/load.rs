use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use acmeair_core::Controllable;

use crate::state::AppState;

/// Holds one slot of the active-request counter; released on drop so that
/// aborted requests are still counted out.
struct InFlight(Arc<dyn Controllable>);

impl InFlight {
    fn enter(load: Arc<dyn Controllable>) -> Self {
        load.ingress();
        Self(load)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.egress();
    }
}

pub async fn track_active_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let _slot = InFlight::enter(state.load.clone());
    next.run(req).await
}
