//! Protocol error types.

use crate::status::ReturnValue;
use crate::{JSONRPC_METHOD_NOT_FOUND, JSONRPC_PARSE_ERROR};
use thiserror::Error;

/// Protocol-level errors that can occur during framing or message handling.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("short frame header: got {received} of 8 bytes")]
    ShortHeader { received: usize },

    #[error("header version mismatch: expected {expected:#x}, got {actual:#x}")]
    VersionMismatch { expected: u32, actual: u32 },

    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: u64, max: u64 },

    #[error("incomplete payload: expected {expected} bytes, got {received}")]
    IncompletePayload { expected: usize, received: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing or invalid field: {0}")]
    MissingField(&'static str),

    #[error("response id mismatch: expected {expected}, got {actual:?}")]
    IdMismatch { expected: u64, actual: Option<u64> },

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl ProtocolError {
    /// Maps the error onto the status code reported to callers.
    pub fn status(&self) -> ReturnValue {
        match self {
            ProtocolError::Rpc { code, .. } => match *code {
                JSONRPC_PARSE_ERROR => ReturnValue::InvalidJsonFormat,
                JSONRPC_METHOD_NOT_FOUND => ReturnValue::MethodNotFound,
                _ => ReturnValue::UnknownErrorMessage,
            },
            _ => ReturnValue::Nok,
        }
    }

    /// Returns whether the byte stream can no longer be trusted to be
    /// aligned on a frame boundary.
    pub fn is_desync(&self) -> bool {
        matches!(
            self,
            ProtocolError::ShortHeader { .. }
                | ProtocolError::VersionMismatch { .. }
                | ProtocolError::FrameTooLarge { .. }
                | ProtocolError::IncompletePayload { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_status() {
        let err = ProtocolError::Rpc {
            code: -32700,
            message: "Parse error".into(),
        };
        assert_eq!(err.status(), ReturnValue::InvalidJsonFormat);

        let err = ProtocolError::Rpc {
            code: -32601,
            message: "Method not found".into(),
        };
        assert_eq!(err.status(), ReturnValue::MethodNotFound);

        for code in [-32600, -32602, -32603, 0, 42] {
            let err = ProtocolError::Rpc {
                code,
                message: String::new(),
            };
            assert_eq!(err.status(), ReturnValue::UnknownErrorMessage);
        }
    }

    #[test]
    fn test_framing_errors_are_nok() {
        assert_eq!(
            ProtocolError::ShortHeader { received: 3 }.status(),
            ReturnValue::Nok
        );
        assert_eq!(
            ProtocolError::IdMismatch {
                expected: 1,
                actual: Some(2)
            }
            .status(),
            ReturnValue::Nok
        );
        assert_eq!(
            ProtocolError::MissingField("result").status(),
            ReturnValue::Nok
        );
    }

    #[test]
    fn test_desync_classification() {
        assert!(ProtocolError::ShortHeader { received: 0 }.is_desync());
        assert!(ProtocolError::VersionMismatch {
            expected: 1,
            actual: 2
        }
        .is_desync());
        assert!(!ProtocolError::IdMismatch {
            expected: 1,
            actual: None
        }
        .is_desync());
        assert!(!ProtocolError::MissingField("id").is_desync());
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::ShortHeader { received: 5 };
        assert!(err.to_string().contains('5'));

        let err = ProtocolError::VersionMismatch {
            expected: 0xABC,
            actual: 0xDEF,
        };
        let msg = err.to_string();
        assert!(msg.contains("abc") && msg.contains("def"));

        let err = ProtocolError::FrameTooLarge { size: 100, max: 50 };
        assert!(err.to_string().contains("100"));

        let err = ProtocolError::MissingField("GHSReturnValue");
        assert!(err.to_string().contains("GHSReturnValue"));

        let err = ProtocolError::Rpc {
            code: -32601,
            message: "Method not found".into(),
        };
        assert!(err.to_string().contains("Method not found"));
    }
}
