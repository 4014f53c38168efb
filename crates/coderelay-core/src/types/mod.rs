//! Core type definitions used across the CodeRelay workspace.

pub mod clock;
pub mod share;

pub use clock::{Clock, ManualClock, SystemClock};
pub use share::{Availability, Share};
