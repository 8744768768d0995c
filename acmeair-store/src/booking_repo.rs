use acmeair_core::{Booking, BookingService, CoreError, CoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Process-local booking store, keyed by customer id.
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<String, Vec<Booking>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
        }
    }

    pub async fn count(&self) -> usize {
        self.bookings.read().await.values().map(Vec::len).sum()
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

fn require(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[async_trait]
impl BookingService for InMemoryBookingStore {
    async fn book_flight(
        &self,
        user_id: &str,
        flight_segment_id: &str,
        flight_id: &str,
    ) -> CoreResult<String> {
        require("user id", user_id)?;
        require("flight segment id", flight_segment_id)?;
        require("flight id", flight_id)?;

        let booking = Booking::new(user_id, flight_segment_id, flight_id);
        let booking_id = booking.id.clone();

        self.bookings
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(booking);

        info!("Booked segment {} on flight {} for {}: {}", flight_segment_id, flight_id, user_id, booking_id);
        Ok(booking_id)
    }

    async fn get_booking(&self, user_id: &str, number: &str) -> CoreResult<Booking> {
        self.bookings
            .read()
            .await
            .get(user_id)
            .and_then(|list| list.iter().find(|b| b.id == number))
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("booking {}", number)))
    }

    async fn get_bookings_by_user(&self, user_id: &str) -> CoreResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn cancel_booking(&self, user_id: &str, number: &str) -> CoreResult<()> {
        let mut bookings = self.bookings.write().await;
        let list = bookings
            .get_mut(user_id)
            .ok_or_else(|| CoreError::NotFound(format!("booking {}", number)))?;

        let before = list.len();
        list.retain(|b| b.id != number);
        if list.len() == before {
            return Err(CoreError::NotFound(format!("booking {}", number)));
        }

        debug!("Cancelled booking {} for {}", number, user_id);
        Ok(())
    }
}
