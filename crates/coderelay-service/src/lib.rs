//! # coderelay-service
//!
//! Business logic for CodeRelay. The [`RelayService`] gates every boundary
//! operation through the [`RateLimiterRegistry`], validates input, and then
//! calls exactly one [`ShareStore`](coderelay_core::traits::ShareStore)
//! operation.
//!
//! Services follow constructor injection; all dependencies are provided at
//! construction time via `Arc` references.

pub mod limiter;
pub mod relay;

pub use limiter::{RateLimiterRegistry, RatePolicy};
pub use relay::RelayService;
