//! # coderelay-database
//!
//! SQLite connection management, migrations, and the persistent
//! [`ShareStore`](coderelay_core::traits::ShareStore) implementation.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::ShareRepository;
