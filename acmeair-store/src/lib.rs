pub mod app_config;
pub mod booking_repo;
pub mod rewards;
pub mod jwt_guard;
pub mod redis_repo;

pub use booking_repo::InMemoryBookingStore;
pub use rewards::RewardLedger;
pub use jwt_guard::JwtGuard;
pub use redis_repo::{RedisClient, RedisControlSink};
