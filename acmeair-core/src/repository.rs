use async_trait::async_trait;
use crate::booking::Booking;
use crate::CoreResult;

/// Owns booking creation, lookup and cancellation.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Book one flight segment for a customer, returning the new booking id.
    async fn book_flight(
        &self,
        user_id: &str,
        flight_segment_id: &str,
        flight_id: &str,
    ) -> CoreResult<String>;

    /// Fails with `CoreError::NotFound` when the number is unknown for this user.
    async fn get_booking(&self, user_id: &str, number: &str) -> CoreResult<Booking>;

    async fn get_bookings_by_user(&self, user_id: &str) -> CoreResult<Vec<Booking>>;

    async fn cancel_booking(&self, user_id: &str, number: &str) -> CoreResult<()>;
}

/// Awards and reverses reward miles tied to a flight segment.
#[async_trait]
pub trait RewardTracker: Send + Sync {
    fn track_reward_miles(&self) -> bool;

    async fn update_reward_miles(
        &self,
        user_id: &str,
        flight_segment_id: &str,
        award: bool,
    ) -> CoreResult<()>;
}

/// Checks that a caller's token belongs to the user being acted on.
pub trait AuthGuard: Send + Sync {
    fn secure_user_calls(&self) -> bool;

    fn validate_jwt(&self, user_id: &str, token: Option<&str>) -> bool;
}
