pub mod load;

pub use load::track_active_requests;
