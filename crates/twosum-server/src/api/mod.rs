//! API endpoints module

pub mod health;
pub mod two_sum;

pub use health::{health, BreakerHealth, HealthResponse};
pub use two_sum::two_sum;
