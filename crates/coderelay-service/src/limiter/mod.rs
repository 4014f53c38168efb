//! Per-client token-bucket admission control.

pub mod bucket;
pub mod registry;

pub use bucket::{RatePolicy, TokenBucket};
pub use registry::RateLimiterRegistry;
