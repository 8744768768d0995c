pub mod booking;
pub mod repository;
pub mod control;

pub use booking::{Booking, BookingInfo};
pub use control::{scaled_demand, ControlSink, Controllable, LoadSnapshot, ServiceLoad};
pub use repository::{AuthGuard, BookingService, RewardTracker};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Reward tracking failed: {0}")]
    RewardError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
