//! High-level client API.

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::registry::ConnectionRegistry;
use crate::reply::{AcquisitionStartTime, DiskSpace, MainframeInfo, RecorderInfo, Reply};
use ghs_protocol::enums::{
    Access, AcquisitionState, ChannelType, DigitalOutMode, DigitalOutput, EnableDisable,
    SyncStatus, UserMode,
};
use ghs_protocol::{EnumArg, ResultRecord, ReturnValue};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// High-level client for one mainframe.
pub struct Client<S = TcpStream> {
    registry: Arc<ConnectionRegistry>,
    conn: Connection<S>,
}

impl Client<TcpStream> {
    /// Creates a new client; `registry` bounds how many clients may be
    /// connected at once.
    pub fn new(registry: Arc<ConnectionRegistry>, config: ConnectionConfig) -> Self {
        Self {
            registry,
            conn: Connection::new(config),
        }
    }

    /// Opens the socket and performs the `Connect` handshake.
    ///
    /// The socket is closed again if the mainframe rejects the handshake or
    /// reports a different API version.
    pub async fn connect(&mut self, host: &str, port: u16) -> ReturnValue {
        let client_version = self.conn.config().client_api_version;
        if client_version == 0 {
            return ReturnValue::NullPtrArgument;
        }

        let status = self.conn.establish(&self.registry, host, port).await;
        if !status.is_ok() {
            return status;
        }

        let record = self
            .call("Connect", params(json!({"ClientAPIVersion": client_version})))
            .await;

        let status = match record.field::<u32>("ServerAPIVersion") {
            Some(server_version) if record.is_ok() && server_version != client_version => {
                tracing::warn!(
                    "API version mismatch: server {}, client {}",
                    server_version,
                    client_version
                );
                ReturnValue::ApiMismatch
            }
            _ => record.status(),
        };

        if !status.is_ok() {
            self.conn.close().await;
        }
        status
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an existing connection.
    pub fn from_connection(registry: Arc<ConnectionRegistry>, conn: Connection<S>) -> Self {
        Self { registry, conn }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Returns the underlying connection for raw transactions.
    pub fn connection(&mut self) -> &mut Connection<S> {
        &mut self.conn
    }

    /// Sends `Disconnect` and closes the socket whatever the answer.
    ///
    /// Returns `NoConnection` without side effects if never connected.
    pub async fn disconnect(&mut self) -> ReturnValue {
        if !self.conn.is_connected() {
            return ReturnValue::NoConnection;
        }
        let status = self.call_status("Disconnect", None).await;
        self.conn.close().await;
        status
    }

    /// API version announced on connect.
    pub fn client_api_version(&self) -> u32 {
        self.conn.config().client_api_version
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    async fn call(&mut self, method: &str, params: Option<Map<String, Value>>) -> ResultRecord {
        self.conn.send_request_wait_response(method, params).await
    }

    async fn call_status(
        &mut self,
        method: &str,
        params: Option<Map<String, Value>>,
    ) -> ReturnValue {
        self.call(method, params).await.status()
    }

    async fn call_field<T: DeserializeOwned>(
        &mut self,
        method: &str,
        params: Option<Map<String, Value>>,
        key: &str,
    ) -> Reply<T> {
        Reply::from_field(&self.call(method, params).await, key)
    }

    async fn call_record<T: DeserializeOwned>(
        &mut self,
        method: &str,
        params: Option<Map<String, Value>>,
    ) -> Reply<T> {
        Reply::from_record(&self.call(method, params).await)
    }

    // =========================================================================
    // Connection operations
    // =========================================================================

    /// Access permission granted to this client.
    pub async fn current_access(&mut self) -> Reply<Access> {
        self.call_field("GetCurrentAccess", None, "Access").await
    }

    // =========================================================================
    // Acquisition operations
    // =========================================================================

    pub async fn start_preview(&mut self) -> ReturnValue {
        self.call_status("StartPreview", None).await
    }

    pub async fn stop_preview(&mut self) -> ReturnValue {
        self.call_status("StopPreview", None).await
    }

    pub async fn start_recording(&mut self) -> ReturnValue {
        self.call_status("StartRecording", None).await
    }

    pub async fn pause_recording(&mut self) -> ReturnValue {
        self.call_status("PauseRecording", None).await
    }

    pub async fn resume_recording(&mut self) -> ReturnValue {
        self.call_status("ResumeRecording", None).await
    }

    pub async fn stop_recording(&mut self) -> ReturnValue {
        self.call_status("StopRecording", None).await
    }

    /// Issues a manual trigger.
    pub async fn trigger(&mut self) -> ReturnValue {
        self.call_status("Trigger", None).await
    }

    pub async fn acquisition_state(&mut self) -> Reply<AcquisitionState> {
        self.call_field("GetAcquisitionState", None, "GHSAcquisitionState")
            .await
    }

    pub async fn acquisition_start_time(&mut self) -> Reply<AcquisitionStartTime> {
        self.call_record("GetAcquisitionStartTime", None).await
    }

    /// Seconds elapsed since the start of the acquisition.
    pub async fn acquisition_time(&mut self) -> Reply<f64> {
        self.call_field("GetAcquisitionTime", None, "AcquisitionTime")
            .await
    }

    // =========================================================================
    // Mainframe operations
    // =========================================================================

    pub async fn mainframe_info(&mut self) -> Reply<MainframeInfo> {
        self.call_record("GetMainframeInformation", None).await
    }

    pub async fn disk_space(&mut self) -> Reply<DiskSpace> {
        self.call_record("DiskSpace", None).await
    }

    pub async fn slot_count(&mut self) -> Reply<u32> {
        self.call_field("GetSlotCount", None, "SlotCount").await
    }

    pub async fn sync_status(&mut self) -> Reply<SyncStatus> {
        self.call_field("GetSyncStatus", None, "SyncStatus").await
    }

    pub async fn user_mode(&mut self) -> Reply<UserMode> {
        self.call_field("GetUserMode", None, "UserMode").await
    }

    /// Switches the user mode. The system must be idle.
    pub async fn set_user_mode(&mut self, mode: impl Into<EnumArg<UserMode>>) -> ReturnValue {
        let Some(mode) = mode.into().resolve() else {
            return ReturnValue::InvalidUserMode;
        };
        self.call_status("SetUserMode", params(json!({"UserMode": mode})))
            .await
    }

    /// Turns the identification sound of the mainframe on or off.
    pub async fn identify(&mut self, on: bool) -> ReturnValue {
        self.call_status("Identify", params(json!({"Identify": u8::from(on)})))
            .await
    }

    // =========================================================================
    // Recorder operations
    // =========================================================================

    pub async fn channel_count(&mut self, slot_id: &str) -> Reply<u32> {
        if slot_id.is_empty() {
            return Reply::from_status(ReturnValue::NullPtrArgument);
        }
        self.call_field("GetChannelCount", slot(slot_id), "ChannelCount")
            .await
    }

    pub async fn recorder_enabled(&mut self, slot_id: &str) -> Reply<EnableDisable> {
        if slot_id.is_empty() {
            return Reply::from_status(ReturnValue::NullPtrArgument);
        }
        self.call_field("GetRecorderEnabled", slot(slot_id), "IsRecorderEnabled")
            .await
    }

    /// Enables or disables a recorder. The system must be idle.
    pub async fn set_recorder_enabled(
        &mut self,
        slot_id: &str,
        enabled: impl Into<EnumArg<EnableDisable>>,
    ) -> ReturnValue {
        if slot_id.is_empty() {
            return ReturnValue::NullPtrArgument;
        }
        let Some(enabled) = enabled.into().resolve() else {
            return ReturnValue::InvalidDataType;
        };
        self.call_status(
            "SetRecorderEnabled",
            params(json!({"SlotId": slot_id, "EnabledStatus": enabled})),
        )
        .await
    }

    pub async fn recorder_info(&mut self, slot_id: &str) -> Reply<RecorderInfo> {
        if slot_id.is_empty() {
            return Reply::from_status(ReturnValue::NullPtrArgument);
        }
        self.call_record("GetRecorderInformation", slot(slot_id))
            .await
    }

    /// Sample rate of a recorder, in samples per second.
    pub async fn sample_rate(&mut self, slot_id: &str) -> Reply<f64> {
        if slot_id.is_empty() {
            return Reply::from_status(ReturnValue::NullPtrArgument);
        }
        self.call_field("GetSampleRate", slot(slot_id), "SampleRate")
            .await
    }

    /// Sets the sample rate of a recorder. Unsupported rates are rounded by
    /// the mainframe to the nearest supported one.
    pub async fn set_sample_rate(&mut self, slot_id: &str, sample_rate: f64) -> ReturnValue {
        if slot_id.is_empty() {
            return ReturnValue::NullPtrArgument;
        }
        if !sample_rate.is_finite() {
            return ReturnValue::InvalidDataType;
        }
        self.call_status(
            "SetSampleRate",
            params(json!({"SlotId": slot_id, "SampleRate": sample_rate})),
        )
        .await
    }

    pub async fn digital_output(
        &mut self,
        slot_id: &str,
        output: impl Into<EnumArg<DigitalOutput>>,
    ) -> Reply<DigitalOutMode> {
        if slot_id.is_empty() {
            return Reply::from_status(ReturnValue::NullPtrArgument);
        }
        let Some(output) = output.into().resolve() else {
            return Reply::from_status(ReturnValue::InvalidOutputNumber);
        };
        self.call_field(
            "GetDigitalOutput",
            params(json!({"SlotId": slot_id, "Output": output})),
            "DigitalOutMode",
        )
        .await
    }

    pub async fn set_digital_output(
        &mut self,
        slot_id: &str,
        output: impl Into<EnumArg<DigitalOutput>>,
        mode: impl Into<EnumArg<DigitalOutMode>>,
    ) -> ReturnValue {
        if slot_id.is_empty() {
            return ReturnValue::NullPtrArgument;
        }
        let Some(output) = output.into().resolve() else {
            return ReturnValue::InvalidOutputNumber;
        };
        let Some(mode) = mode.into().resolve() else {
            return ReturnValue::IncompatibleDigitalOutputMode;
        };
        self.call_status(
            "SetDigitalOutput",
            params(json!({"SlotId": slot_id, "DigitalOutMode": mode, "Output": output})),
        )
        .await
    }

    // =========================================================================
    // Channel operations
    // =========================================================================

    pub async fn channel_type(&mut self, slot_id: &str, channel_index: u32) -> Reply<ChannelType> {
        if slot_id.is_empty() {
            return Reply::from_status(ReturnValue::NullPtrArgument);
        }
        self.call_field(
            "GetChannelType",
            params(json!({"SlotId": slot_id, "ChannelIndex": channel_index})),
            "ChannelType",
        )
        .await
    }

    pub async fn channel_name(
        &mut self,
        slot_id: &str,
        channel_index: u32,
        channel_type: impl Into<EnumArg<ChannelType>>,
    ) -> Reply<String> {
        let channel = match channel_params(slot_id, channel_index, channel_type.into()) {
            Ok(channel) => channel,
            Err(status) => return Reply::from_status(status),
        };
        self.call_field("GetChannelName", Some(channel), "ChannelName")
            .await
    }

    /// Renames a channel. Names must be unique on the mainframe.
    pub async fn set_channel_name(
        &mut self,
        slot_id: &str,
        channel_index: u32,
        channel_type: impl Into<EnumArg<ChannelType>>,
        channel_name: &str,
    ) -> ReturnValue {
        if channel_name.is_empty() {
            return ReturnValue::NullPtrArgument;
        }
        let mut channel = match channel_params(slot_id, channel_index, channel_type.into()) {
            Ok(channel) => channel,
            Err(status) => return status,
        };
        channel.insert("ChannelName".into(), json!(channel_name));
        self.call_status("SetChannelName", Some(channel)).await
    }

    pub async fn channel_storage_enabled(
        &mut self,
        slot_id: &str,
        channel_index: u32,
        channel_type: impl Into<EnumArg<ChannelType>>,
    ) -> Reply<EnableDisable> {
        let channel = match channel_params(slot_id, channel_index, channel_type.into()) {
            Ok(channel) => channel,
            Err(status) => return Reply::from_status(status),
        };
        self.call_field("GetChannelStorageEnabled", Some(channel), "Enabled")
            .await
    }

    pub async fn set_channel_storage_enabled(
        &mut self,
        slot_id: &str,
        channel_index: u32,
        channel_type: impl Into<EnumArg<ChannelType>>,
        enabled: impl Into<EnumArg<EnableDisable>>,
    ) -> ReturnValue {
        let mut channel = match channel_params(slot_id, channel_index, channel_type.into()) {
            Ok(channel) => channel,
            Err(status) => return status,
        };
        let Some(enabled) = enabled.into().resolve() else {
            return ReturnValue::InvalidDataType;
        };
        channel.insert("ChannelStorageEnable".into(), json!(enabled));
        self.call_status("SetChannelStorageEnabled", Some(channel))
            .await
    }
}

/// Turns a `json!` object into a parameter map.
fn params(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn slot(slot_id: &str) -> Option<Map<String, Value>> {
    params(json!({"SlotId": slot_id}))
}

/// Validates the arguments addressing one channel.
fn channel_params(
    slot_id: &str,
    channel_index: u32,
    channel_type: EnumArg<ChannelType>,
) -> Result<Map<String, Value>, ReturnValue> {
    if slot_id.is_empty() {
        return Err(ReturnValue::NullPtrArgument);
    }
    let channel_type = channel_type
        .resolve()
        .ok_or(ReturnValue::InvalidChannelType)?;

    let mut map = Map::new();
    map.insert("SlotId".into(), json!(slot_id));
    map.insert("ChannelIndex".into(), json!(channel_index));
    map.insert("ChannelType".into(), json!(channel_type));
    Ok(map)
}
