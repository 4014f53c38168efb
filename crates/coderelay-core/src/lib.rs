//! # coderelay-core
//!
//! Core crate for CodeRelay. Contains the ephemeral store trait,
//! configuration schemas, the share model, clocks, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other CodeRelay crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
