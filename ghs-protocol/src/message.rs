//! JSON-RPC 2.0 message types and the decoded result record.

use crate::error::ProtocolError;
use crate::status::ReturnValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// Reserved key holding the status code in every result record.
pub const RESULT_KEY: &str = "GHSReturnValue";

/// Request message.
///
/// Field order is the serialized key order: `jsonrpc, method, [params], id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,

    /// Bare method name, e.g. `StartRecording`.
    pub method: String,

    /// Flat parameter object, omitted from the wire when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,

    pub id: u64,
}

impl Request {
    pub fn new(id: u64, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: None,
            id,
        }
    }

    /// Attaches parameters. An empty object is treated as no parameters.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = if params.is_empty() { None } else { Some(params) };
        self
    }
}

/// Error object of a failed JSON-RPC call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Response message.
///
/// `id` is kept as a raw value: the mainframe may answer with an integer, a
/// numeric string, or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub jsonrpc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,

    #[serde(default)]
    pub id: Value,
}

impl Response {
    pub fn result(id: u64, result: impl Into<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result.into()),
            error: None,
            id: Value::from(id),
        }
    }

    /// Builds an error response. `None` as id serializes as `null`.
    pub fn error(id: Option<u64>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id: id.map(Value::from).unwrap_or(Value::Null),
        }
    }

    /// Returns the id coerced to an integer, if it has a recognizable form.
    ///
    /// Whole floats (`1.0`) and decimal strings (`"12"`) are accepted.
    pub fn numeric_id(&self) -> Option<u64> {
        match &self.id {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Decoded response: a field map that always carries the status key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultRecord {
    fields: Map<String, Value>,
}

impl ResultRecord {
    /// A record with only the status field.
    pub fn from_code(code: i64) -> Self {
        let mut fields = Map::new();
        fields.insert(RESULT_KEY.to_string(), Value::from(code));
        Self { fields }
    }

    pub fn from_status(status: ReturnValue) -> Self {
        Self::from_code(status.code())
    }

    /// Wraps a result object. It must carry an integer status field.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, ProtocolError> {
        match fields.get(RESULT_KEY) {
            Some(value) if value.is_i64() => Ok(Self { fields }),
            _ => Err(ProtocolError::MissingField(RESULT_KEY)),
        }
    }

    /// Raw status code.
    pub fn status_code(&self) -> i64 {
        self.fields
            .get(RESULT_KEY)
            .and_then(Value::as_i64)
            .unwrap_or_else(|| ReturnValue::Nok.code())
    }

    /// Status code as a table value; unknown codes map to `Reserved`.
    pub fn status(&self) -> ReturnValue {
        ReturnValue::from_code_lossy(self.status_code())
    }

    pub fn is_ok(&self) -> bool {
        self.status_code() == ReturnValue::Ok.code()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Deserializes one field. `None` if it is absent or has the wrong shape.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.fields.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!("field {} has unexpected shape: {}", key, e);
                None
            }
        }
    }

    /// Deserializes the whole record into a typed reply struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        match serde_json::from_value(Value::Object(self.fields.clone())) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!("record does not match reply shape: {}", e);
                None
            }
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<ReturnValue> for ResultRecord {
    fn from(status: ReturnValue) -> Self {
        Self::from_status(status)
    }
}
