//! HTTP handlers for health-coach-service.

pub mod analysis;
pub mod app;
pub mod extract;
pub mod health;
pub mod metrics;

pub use analysis::calculate;
pub use app::index;
pub use health::{health_check, readiness_check};
