//! # ghs-protocol
//!
//! Wire protocol implementation for GEN series data-acquisition mainframes.
//!
//! This crate provides:
//! - Binary framing with a length prefix and version magic
//! - JSON-RPC 2.0 request/response serialization
//! - The decoded result record handed to callers
//! - Status code and domain enumeration tables

pub mod codec;
pub mod enums;
pub mod error;
pub mod frame;
pub mod message;
pub mod status;

pub use codec::{
    decode_request, decode_response, encode_request, encode_response, parse_response,
};
pub use error::ProtocolError;
pub use frame::{decode_header, Frame, FrameHeader, FRAME_HEADER_SIZE, VERSION_MAGIC};
pub use message::{Request, Response, ResultRecord, RpcError, RESULT_KEY};
pub use status::{from_symbol, to_symbol, EnumArg, EnumTable, ReturnValue};

/// API version this client implements, sent as `ClientAPIVersion` on connect.
pub const CLIENT_API_VERSION: u32 = 4;

/// Port the mainframe listens on.
pub const DEFAULT_PORT: u16 = 8006;

/// Default upper bound accepted for an incoming payload (16 MiB).
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// JSON-RPC error code for a request the server could not parse.
pub const JSONRPC_PARSE_ERROR: i64 = -32700;

/// JSON-RPC error code for an unknown method.
pub const JSONRPC_METHOD_NOT_FOUND: i64 = -32601;
