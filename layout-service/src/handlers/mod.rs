//! HTTP handlers for the layout service.

pub mod health;
pub mod layout;

pub use health::{
    health_check, method_not_allowed, metrics_endpoint, not_found, readiness_check,
};
pub use layout::generate_layout;
