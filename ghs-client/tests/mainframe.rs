//! Client tests against a mock mainframe listening on localhost.

use ghs_client::{Client, ConnectionConfig, ConnectionRegistry, MAX_CONNECTIONS};
use ghs_protocol::{
    decode_header, decode_request, encode_response, Request, Response, ReturnValue,
    FRAME_HEADER_SIZE,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Produces the answer to one request, or `None` to stay silent.
type Handler = Arc<dyn Fn(&Request) -> Option<Value> + Send + Sync>;

struct MockMainframe {
    addr: SocketAddr,
    _task: tokio::task::JoinHandle<()>,
}

impl MockMainframe {
    async fn start(handler: impl Fn(&Request) -> Option<Value> + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler: Handler = Arc::new(handler);

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, Arc::clone(&handler)));
            }
        });

        Self { addr, _task: task }
    }

    /// A mainframe speaking API version `version` that accepts every call.
    async fn with_api_version(version: u32) -> Self {
        Self::start(move |request| match request.method.as_str() {
            "Connect" => Some(json!({"GHSReturnValue": 1, "ServerAPIVersion": version})),
            "GetSlotCount" => Some(json!({"GHSReturnValue": 1, "SlotCount": 4})),
            "StartRecording" => None,
            _ => Some(json!(1)),
        })
        .await
    }

    fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn serve(mut stream: TcpStream, handler: Handler) {
    loop {
        let mut header = [0u8; FRAME_HEADER_SIZE];
        if stream.read_exact(&mut header).await.is_err() {
            return;
        }
        let Ok(header) = decode_header(&header) else {
            return;
        };
        let mut payload = vec![0u8; header.payload_len as usize];
        if stream.read_exact(&mut payload).await.is_err() {
            return;
        }
        let Ok(request) = decode_request(&payload) else {
            return;
        };

        if let Some(result) = handler(&request) {
            let frame = encode_response(&Response::result(request.id, result)).unwrap();
            if stream.write_all(&frame).await.is_err() {
                return;
            }
        }
    }
}

fn config() -> ConnectionConfig {
    ConnectionConfig::default()
        .with_connect_timeout(Duration::from_secs(2))
        .with_request_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn test_connect_handshake() {
    let mainframe = MockMainframe::with_api_version(4).await;
    let registry = ConnectionRegistry::new();
    let mut client = Client::new(Arc::clone(&registry), config());

    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::Ok
    );
    assert!(client.is_connected());
    assert_eq!(registry.open_connections(), 1);

    assert_eq!(client.slot_count().await.into_result(), Ok(4));

    assert_eq!(client.disconnect().await, ReturnValue::Ok);
    assert!(!client.is_connected());
    assert_eq!(registry.open_connections(), 0);
}

#[tokio::test]
async fn test_connect_by_hostname() {
    let mainframe = MockMainframe::with_api_version(4).await;
    let mut client = Client::new(ConnectionRegistry::new(), config());

    assert_eq!(
        client.connect("localhost", mainframe.port()).await,
        ReturnValue::Ok
    );
}

#[tokio::test]
async fn test_api_mismatch_closes_socket() {
    let mainframe = MockMainframe::with_api_version(3).await;
    let registry = ConnectionRegistry::new();
    let mut client = Client::new(Arc::clone(&registry), config());

    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::ApiMismatch
    );
    assert!(!client.is_connected());
    assert_eq!(registry.open_connections(), 0);
}

#[tokio::test]
async fn test_rejected_connect_closes_socket() {
    let mainframe = MockMainframe::start(|request| match request.method.as_str() {
        "Connect" => Some(json!(6)),
        _ => Some(json!(1)),
    })
    .await;
    let registry = ConnectionRegistry::new();
    let mut client = Client::new(Arc::clone(&registry), config());

    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::SystemNotIdle
    );
    assert!(!client.is_connected());
    assert_eq!(registry.open_connections(), 0);
}

#[tokio::test]
async fn test_already_connected() {
    let mainframe = MockMainframe::with_api_version(4).await;
    let registry = ConnectionRegistry::new();
    let mut client = Client::new(Arc::clone(&registry), config());

    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::Ok
    );
    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::AlreadyConnected
    );
    assert!(client.is_connected());
    assert_eq!(registry.open_connections(), 1);
}

#[tokio::test]
async fn test_connection_ceiling() {
    let mainframe = MockMainframe::with_api_version(4).await;
    let registry = ConnectionRegistry::new();

    let mut clients = Vec::new();
    for _ in 0..MAX_CONNECTIONS {
        let mut client = Client::new(Arc::clone(&registry), config());
        assert_eq!(
            client.connect("127.0.0.1", mainframe.port()).await,
            ReturnValue::Ok
        );
        clients.push(client);
    }
    assert_eq!(registry.open_connections(), 30);

    let mut extra = Client::new(Arc::clone(&registry), config());
    assert_eq!(
        extra.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::ConnectionFailed
    );
    assert!(!extra.is_connected());
    assert_eq!(registry.open_connections(), 30);

    assert_eq!(clients[0].disconnect().await, ReturnValue::Ok);
    assert_eq!(
        extra.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::Ok
    );
    assert_eq!(registry.open_connections(), 30);
}

#[tokio::test]
async fn test_dropped_client_releases_slot() {
    let mainframe = MockMainframe::with_api_version(4).await;
    let registry = ConnectionRegistry::with_limit(1);

    {
        let mut client = Client::new(Arc::clone(&registry), config());
        assert_eq!(
            client.connect("127.0.0.1", mainframe.port()).await,
            ReturnValue::Ok
        );
    }
    assert_eq!(registry.open_connections(), 0);
}

#[tokio::test]
async fn test_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let registry = ConnectionRegistry::new();
    let mut client = Client::new(Arc::clone(&registry), config());

    assert_eq!(
        client.connect("127.0.0.1", port).await,
        ReturnValue::NoConnection
    );
    assert!(!client.is_connected());
    assert_eq!(registry.open_connections(), 0);
}

#[tokio::test]
async fn test_unresolvable_host() {
    let registry = ConnectionRegistry::new();
    let mut client = Client::new(Arc::clone(&registry), config());

    assert_eq!(
        client.connect("no-such-host.invalid", 8006).await,
        ReturnValue::ConnectionFailed
    );
    assert!(!client.is_connected());
    assert_eq!(registry.open_connections(), 0);
}

/// A listener with a full accept queue drops further SYNs, so connecting to
/// it hangs until the deadline.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_connect_deadline() {
    let socket = tokio::net::TcpSocket::new_v4().unwrap();
    socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let listener = socket.listen(0).unwrap();
    let addr = listener.local_addr().unwrap();

    let mut backlog = Vec::new();
    for _ in 0..4 {
        if let Ok(Ok(stream)) =
            tokio::time::timeout(Duration::from_millis(100), TcpStream::connect(addr)).await
        {
            backlog.push(stream);
        }
    }

    let registry = ConnectionRegistry::new();
    let config = config().with_connect_timeout(Duration::from_millis(200));
    let mut client = Client::new(Arc::clone(&registry), config);

    assert_eq!(
        client.connect("127.0.0.1", addr.port()).await,
        ReturnValue::MainframeTimeout
    );
    assert!(!client.is_connected());
    assert_eq!(registry.open_connections(), 0);
    drop(listener);
}

#[tokio::test]
async fn test_idempotent_disconnect() {
    let mainframe = MockMainframe::with_api_version(4).await;
    let mut client = Client::new(ConnectionRegistry::new(), config());

    assert_eq!(client.disconnect().await, ReturnValue::NoConnection);
    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::Ok
    );
    assert_eq!(client.disconnect().await, ReturnValue::Ok);
    assert_eq!(client.disconnect().await, ReturnValue::NoConnection);
    assert_eq!(client.start_preview().await, ReturnValue::NoConnection);
}

#[tokio::test]
async fn test_timeout_tears_down_and_reconnects() {
    let mainframe = MockMainframe::with_api_version(4).await;
    let registry = ConnectionRegistry::new();
    let config = config().with_request_timeout(Duration::from_millis(100));
    let mut client = Client::new(Arc::clone(&registry), config);

    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::Ok
    );
    assert_eq!(client.start_recording().await, ReturnValue::MainframeTimeout);
    assert!(!client.is_connected());
    assert_eq!(registry.open_connections(), 0);
    assert_eq!(client.connection().last_request_id(), 2);

    assert_eq!(
        client.connect("127.0.0.1", mainframe.port()).await,
        ReturnValue::Ok
    );
    assert_eq!(client.connection().last_request_id(), 3);
    assert_eq!(client.slot_count().await.value, Some(4));
}
