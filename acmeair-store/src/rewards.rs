use acmeair_core::{CoreError, CoreResult, RewardTracker};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

/// Records which flight segments have earned miles for each customer.
///
/// Mileage values live with the flight service; the ledger only tracks
/// award and reversal of a segment.
pub struct RewardLedger {
    enabled: bool,
    awarded: RwLock<HashMap<String, Vec<String>>>,
}

impl RewardLedger {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            awarded: RwLock::new(HashMap::new()),
        }
    }

    pub async fn awarded_segments(&self, user_id: &str) -> Vec<String> {
        self.awarded
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RewardTracker for RewardLedger {
    fn track_reward_miles(&self) -> bool {
        self.enabled
    }

    async fn update_reward_miles(
        &self,
        user_id: &str,
        flight_segment_id: &str,
        award: bool,
    ) -> CoreResult<()> {
        let mut awarded = self.awarded.write().await;
        let segments = awarded.entry(user_id.to_string()).or_default();

        if award {
            segments.push(flight_segment_id.to_string());
            info!("Awarded miles for segment {} to {}", flight_segment_id, user_id);
            return Ok(());
        }

        let pos = segments
            .iter()
            .position(|s| s == flight_segment_id)
            .ok_or_else(|| {
                CoreError::RewardError(format!(
                    "no miles awarded to {} for segment {}",
                    user_id, flight_segment_id
                ))
            })?;
        segments.remove(pos);
        info!("Reversed miles for segment {} from {}", flight_segment_id, user_id);
        Ok(())
    }
}
