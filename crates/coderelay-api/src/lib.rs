//! # coderelay-api
//!
//! HTTP API layer for CodeRelay built on Axum.
//!
//! Provides the relay endpoints, middleware (request logging, CORS),
//! the client identity extractor, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
