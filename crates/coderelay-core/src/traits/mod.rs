//! Core traits defined in `coderelay-core` and implemented by other crates.

pub mod store;

pub use store::ShareStore;
