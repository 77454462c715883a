//! Connection management.
//!
//! A [`Connection`] owns one socket and runs strictly sequential request/
//! response transactions over it. Every transaction takes `&mut self`, so at
//! most one request is ever in flight per connection.

use crate::config::ConnectionConfig;
use crate::error::ClientError;
use crate::registry::{ConnectionRegistry, RegistrySlot};
use crate::transport::{read_full, write_full};
use ghs_protocol::codec::{encode_request, parse_response};
use ghs_protocol::{decode_header, ProtocolError, ResultRecord, ReturnValue, FRAME_HEADER_SIZE};
use serde_json::{Map, Value};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};

/// A connection to a mainframe.
pub struct Connection<S = TcpStream> {
    config: ConnectionConfig,
    stream: Option<S>,
    /// Held for as long as the socket is open.
    slot: Option<RegistrySlot>,
    peer: Option<SocketAddr>,
    /// Last request id issued. Monotonic for the lifetime of the value,
    /// including across reconnects.
    last_id: u64,
}

impl Connection<TcpStream> {
    /// Creates a new connection (not yet connected).
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            stream: None,
            slot: None,
            peer: None,
            last_id: 0,
        }
    }

    /// Opens the TCP connection, counting it against `registry`.
    pub async fn establish(
        &mut self,
        registry: &Arc<ConnectionRegistry>,
        host: &str,
        port: u16,
    ) -> ReturnValue {
        match self.try_establish(registry, host, port).await {
            Ok(()) => ReturnValue::Ok,
            Err(e) => {
                tracing::debug!("establish {}:{} failed: {}", host, port, e);
                e.status()
            }
        }
    }

    async fn try_establish(
        &mut self,
        registry: &Arc<ConnectionRegistry>,
        host: &str,
        port: u16,
    ) -> Result<(), ClientError> {
        if host.is_empty() {
            return Err(ClientError::MissingArgument("host"));
        }
        if port == 0 {
            return Err(ClientError::MissingArgument("port"));
        }
        if self.stream.is_some() {
            return Err(ClientError::AlreadyConnected);
        }

        let slot = registry.try_acquire().ok_or(ClientError::ConnectionLimit {
            limit: registry.limit(),
        })?;

        tracing::debug!("Connecting to {}:{}...", host, port);
        let deadline = Instant::now() + self.config.connect_timeout;

        let addrs: Vec<SocketAddr> = timeout_at(deadline, tokio::net::lookup_host((host, port)))
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(|e| ClientError::Resolve {
                host: host.to_string(),
                reason: e.to_string(),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::Resolve {
                host: host.to_string(),
                reason: "no addresses".to_string(),
            });
        }

        let stream = timeout_at(deadline, TcpStream::connect(&addrs[..]))
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(|e| match e.kind() {
                io::ErrorKind::ConnectionRefused => ClientError::Refused,
                _ => ClientError::Connect(e),
            })?;

        stream.set_nodelay(self.config.nodelay).ok();
        self.peer = stream.peer_addr().ok();
        tracing::debug!("TCP connected to {:?}", self.peer);

        self.stream = Some(stream);
        self.slot = Some(slot);
        Ok(())
    }

    /// Returns the remote address of the open socket.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already open stream. It is not counted against any registry.
    pub fn from_stream(stream: S, config: ConnectionConfig) -> Self {
        Self {
            config,
            stream: Some(stream),
            slot: None,
            peer: None,
            last_id: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Id of the most recent request, 0 before the first one.
    pub fn last_request_id(&self) -> u64 {
        self.last_id
    }

    /// Sends one request and waits for its response.
    ///
    /// Never fails: every error is reported as a record carrying only the
    /// corresponding status code.
    pub async fn send_request_wait_response(
        &mut self,
        method: &str,
        params: Option<Map<String, Value>>,
    ) -> ResultRecord {
        match self.request(method, params).await {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("{} failed: {}", method, e);
                ResultRecord::from_status(e.status())
            }
        }
    }

    /// Sends one request and waits for its response, reporting why it failed.
    ///
    /// Fatal errors tear the connection down before returning.
    pub async fn request(
        &mut self,
        method: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<ResultRecord, ClientError> {
        if method.is_empty() {
            return Err(ClientError::MissingArgument("method"));
        }
        if self.stream.is_none() {
            return Err(ClientError::NotConnected);
        }

        self.last_id += 1;
        let id = self.last_id;
        let encoded = encode_request(id, method, params.as_ref())?;
        tracing::debug!("Sending request id={} method={} ({} bytes)", id, method, encoded.len());

        let result = self.round_trip(id, &encoded).await;
        if let Err(e) = &result {
            if e.is_fatal() {
                tracing::debug!("Request id={} broke the connection: {}", id, e);
                self.teardown();
            }
        }
        result
    }

    async fn round_trip(&mut self, id: u64, encoded: &[u8]) -> Result<ResultRecord, ClientError> {
        let deadline = Instant::now() + self.config.request_timeout;
        let max_payload = self.config.max_payload_size;
        let stream = self.stream.as_mut().ok_or(ClientError::NotConnected)?;

        let (header, payload) = encoded.split_at(FRAME_HEADER_SIZE);
        write_full(stream, header, deadline).await?;
        write_full(stream, payload, deadline).await?;

        let raw_header = read_full(stream, FRAME_HEADER_SIZE, deadline).await?;
        let header = decode_header(&raw_header).inspect_err(|e| {
            if matches!(e, ProtocolError::VersionMismatch { .. }) {
                tracing::warn!("Response id={}: {}", id, e);
            }
        })?;

        if header.payload_len > max_payload {
            tracing::warn!(
                "Response id={} announces {} bytes (max {})",
                id,
                header.payload_len,
                max_payload
            );
            return Err(ProtocolError::FrameTooLarge {
                size: u64::from(header.payload_len),
                max: u64::from(max_payload),
            }
            .into());
        }

        let expected = header.payload_len as usize;
        let payload = read_full(stream, expected, deadline).await?;
        if payload.len() < expected {
            return Err(ProtocolError::IncompletePayload {
                expected,
                received: payload.len(),
            }
            .into());
        }
        tracing::trace!("Response id={}: {}", id, String::from_utf8_lossy(&payload));

        Ok(parse_response(id, &payload)?)
    }

    /// Closes the socket and releases the registry slot. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!("Closing connection to {:?}", self.peer);
            let _ = stream.shutdown().await;
        }
        self.teardown();
    }

    fn teardown(&mut self) {
        self.stream = None;
        self.slot = None;
        self.peer = None;
    }
}
