//! # ghsapi
//!
//! Client for GEN series data-acquisition mainframes.
//!
//! The mainframe speaks JSON-RPC 2.0 over TCP, each message wrapped in an
//! 8-byte header carrying the payload length and a version magic. Every call
//! reports a [`ReturnValue`] status code; calls that produce data return a
//! [`Reply`] holding the status and the value.
//!
//! ```no_run
//! use ghsapi::{Client, ConnectionConfig, ConnectionRegistry, ReturnValue, DEFAULT_PORT};
//!
//! # async fn run() {
//! let registry = ConnectionRegistry::new();
//! let mut client = Client::new(registry, ConnectionConfig::default());
//!
//! if client.connect("192.168.1.10", DEFAULT_PORT).await == ReturnValue::Ok {
//!     let slots = client.slot_count().await;
//!     println!("{:?} slots ({})", slots.value, slots.status);
//!     client.disconnect().await;
//! }
//! # }
//! ```

pub use ghs_client as client;
pub use ghs_protocol as protocol;

pub use ghs_client::{
    AcquisitionStartTime, Client, ClientError, ConfigError, Connection, ConnectionConfig,
    ConnectionRegistry, DiskSpace, MainframeInfo, RecorderInfo, Reply, MAX_CONNECTIONS,
};
pub use ghs_protocol::enums;
pub use ghs_protocol::{
    EnumArg, EnumTable, ProtocolError, ResultRecord, ReturnValue, CLIENT_API_VERSION,
    DEFAULT_PORT,
};
