//! # ghs-client
//!
//! Client library for GEN series data-acquisition mainframes.
//!
//! This crate provides:
//! - Async TCP transaction channel with one request in flight per connection
//! - Bounded bookkeeping of open connections
//! - Typed API for connection, acquisition, mainframe, recorder and channel
//!   operations
//! - YAML/environment configuration

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod registry;
pub mod reply;
pub mod transport;

pub use client::Client;
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use error::{ClientError, ConfigError};
pub use registry::{ConnectionRegistry, RegistrySlot, MAX_CONNECTIONS};
pub use reply::{AcquisitionStartTime, DiskSpace, MainframeInfo, RecorderInfo, Reply};
