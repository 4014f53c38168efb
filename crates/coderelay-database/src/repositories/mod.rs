//! Repository implementations backed by SQLite.

pub mod share;

pub use share::ShareRepository;
