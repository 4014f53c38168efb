//! # coderelay-cache
//!
//! In-process [`ShareStore`](coderelay_core::traits::ShareStore) backed by a
//! concurrent map. Nothing survives a restart; useful for tests and for
//! single-node deployments that do not want a database file.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryShareStore;
