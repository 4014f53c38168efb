//! Axum middleware stack.

pub mod admission;
pub mod cors;
pub mod logging;
