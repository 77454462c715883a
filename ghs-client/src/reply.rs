//! Typed results of API calls.

use ghs_protocol::{ResultRecord, ReturnValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Status of a call plus the value it produced.
///
/// `value` is `None` whenever `status` is not OK or the mainframe left out
/// the expected field.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: ReturnValue,
    pub value: Option<T>,
}

impl<T> Reply<T> {
    /// A reply without a value.
    pub fn from_status(status: ReturnValue) -> Self {
        Self {
            status,
            value: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok() && self.value.is_some()
    }

    /// Converts into a `Result`, treating a missing value as `Nok`.
    pub fn into_result(self) -> Result<T, ReturnValue> {
        match (self.status, self.value) {
            (ReturnValue::Ok, Some(value)) => Ok(value),
            (ReturnValue::Ok, None) => Err(ReturnValue::Nok),
            (status, _) => Err(status),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            status: self.status,
            value: self.value.map(f),
        }
    }
}

impl<T: DeserializeOwned> Reply<T> {
    /// Extracts one field of an OK record.
    pub fn from_field(record: &ResultRecord, key: &str) -> Self {
        let status = record.status();
        let value = if status.is_ok() {
            record.field(key)
        } else {
            None
        };
        Self { status, value }
    }

    /// Decodes an OK record as a whole.
    pub fn from_record(record: &ResultRecord) -> Self {
        let status = record.status();
        let value = if status.is_ok() { record.decode() } else { None };
        Self { status, value }
    }
}

/// Identity of the mainframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MainframeInfo {
    pub mainframe_type: String,
    pub mainframe_name: String,
    pub serial_number: String,
    pub firmware_version: String,
}

/// Identity of the recorder in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecorderInfo {
    pub recorder_type: String,
    pub recorder_name: String,
    pub serial_number: String,
    pub firmware_version: String,
}

/// Storage capacity of the mainframe, in gigabytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskSpace {
    pub total_size: f64,
    pub available_size: f64,
}

/// Absolute time at which the current acquisition started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionStartTime {
    #[serde(rename = "AbsoluteTimeYear")]
    pub year: u32,
    #[serde(rename = "AbsoluteTimeDay")]
    pub day: u32,
    /// Seconds since the start of `day`.
    #[serde(rename = "AbsoluteTimeSeconds")]
    pub seconds: f64,
}
