//! Background tasks for CodeRelay.
//!
//! This crate provides the [`ExpirySweeper`], a single timer-driven task
//! that physically removes expired shares and, when configured, evicts idle
//! rate-limiter buckets.

pub mod sweeper;

pub use sweeper::ExpirySweeper;
