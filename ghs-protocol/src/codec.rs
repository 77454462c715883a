//! Stateless encode/decode of JSON-RPC frames.

use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::message::{Request, Response, ResultRecord};
use bytes::BytesMut;
use serde_json::{Map, Value};

/// Encodes a request into a complete frame (header + NUL-terminated JSON).
pub fn encode_request(
    id: u64,
    method: &str,
    params: Option<&Map<String, Value>>,
) -> Result<BytesMut, ProtocolError> {
    let mut request = Request::new(id, method);
    if let Some(params) = params {
        request = request.with_params(params.clone());
    }
    Frame::from_json(&request)?.encode()
}

/// Encodes a response into a complete frame.
pub fn encode_response(response: &Response) -> Result<BytesMut, ProtocolError> {
    Frame::from_json(response)?.encode()
}

/// Parses a request payload (without header) as it was sent.
pub fn decode_request(payload: &[u8]) -> Result<Request, ProtocolError> {
    Ok(serde_json::from_slice(strip_terminator(payload))?)
}

/// Decodes a response payload (without header) into a result record.
///
/// Never fails: every protocol deviation is folded into the record's status.
pub fn decode_response(expected_id: u64, payload: &[u8]) -> ResultRecord {
    parse_response(expected_id, payload).unwrap_or_else(|e| {
        tracing::debug!("response for id={} rejected: {}", expected_id, e);
        ResultRecord::from_status(e.status())
    })
}

/// Decodes a response payload, reporting why it was rejected.
///
/// Validation order:
/// 1. the id must match `expected_id` (a `null` id is tolerated only
///    alongside an error object),
/// 2. an error object becomes [`ProtocolError::Rpc`],
/// 3. an integer result is the status code,
/// 4. an object result must carry the status key and passes through as is.
pub fn parse_response(expected_id: u64, payload: &[u8]) -> Result<ResultRecord, ProtocolError> {
    let response: Response = serde_json::from_slice(strip_terminator(payload))?;

    let actual = response.numeric_id();
    let id_matches = actual == Some(expected_id);
    let unattributed_error = response.id.is_null() && response.error.is_some();
    if !id_matches && !unattributed_error {
        tracing::warn!(
            "response id mismatch: expected {}, got {}",
            expected_id,
            response.id
        );
        return Err(ProtocolError::IdMismatch {
            expected: expected_id,
            actual,
        });
    }

    if let Some(error) = response.error {
        return Err(ProtocolError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    match response.result {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(ResultRecord::from_code)
            .ok_or(ProtocolError::MissingField("result")),
        Some(Value::Object(fields)) => ResultRecord::from_fields(fields),
        _ => Err(ProtocolError::MissingField("result")),
    }
}

fn strip_terminator(payload: &[u8]) -> &[u8] {
    match payload.split_last() {
        Some((0, rest)) => rest,
        _ => payload,
    }
}
