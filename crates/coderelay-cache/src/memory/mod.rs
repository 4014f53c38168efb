//! Concurrent in-memory share store.

pub mod store;

pub use store::MemoryShareStore;
