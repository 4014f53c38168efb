//! Relay use cases: check, store, and retrieve shares by code.

pub mod service;

pub use service::RelayService;
