//! Shared utilities for integration testing.
#![allow(dead_code)]

use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

use stellar_wallet_bridge::wallet::binding::{ExtensionError, ExtensionResult, FreighterApi, FreighterSignOptions};
use stellar_wallet_bridge::wallet::{SignedEnvelope, WalletAdapter, WalletConnection, WalletError, WalletKind, WalletResult};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(RecordedRequest { method, path, body })
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` sees each request and returns `(status, json body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            504 => "504 Gateway Timeout",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Mock backend that records every request and answers with a fixed reply.
pub async fn start_recording_backend(status: u16, body: &'static str) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();
    let addr = start_programmable_backend(move |req| {
        let seen = seen.clone();
        async move {
            seen.lock().unwrap().push(req);
            (status, body.to_string())
        }
    })
    .await;
    (addr, log)
}

/// Adapter with scripted outcomes and call counters.
pub struct ScriptedAdapter {
    pub kind: WalletKind,
    pub present: bool,
    pub public_key: String,
    /// When set, connect waits for a notification before answering.
    pub connect_gate: Option<Arc<Notify>>,
    pub connect_error: Option<WalletError>,
    pub sign_error: Option<WalletError>,
    pub disconnect_error: Option<WalletError>,
    pub connect_calls: AtomicU32,
    pub sign_calls: AtomicU32,
    pub disconnect_calls: AtomicU32,
}

impl ScriptedAdapter {
    pub fn new(kind: WalletKind) -> Self {
        Self {
            kind,
            present: true,
            public_key: format!("G{}", kind.as_str().to_uppercase()),
            connect_gate: None,
            connect_error: None,
            sign_error: None,
            disconnect_error: None,
            connect_calls: AtomicU32::new(0),
            sign_calls: AtomicU32::new(0),
            disconnect_calls: AtomicU32::new(0),
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.connect_gate = Some(gate);
        self
    }

    pub fn sign_calls(&self) -> u32 {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> u32 {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletAdapter for ScriptedAdapter {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    async fn detect(&self) -> bool {
        self.present
    }

    async fn connect(&self) -> WalletResult<WalletConnection> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.connect_gate {
            gate.notified().await;
        }
        match &self.connect_error {
            Some(e) => Err(e.clone()),
            None => Ok(WalletConnection::new(self.kind, self.public_key.clone(), "TESTNET")),
        }
    }

    async fn sign(&self, envelope: &str, _network: &str) -> WalletResult<SignedEnvelope> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        match &self.sign_error {
            Some(e) => Err(e.clone()),
            None => Ok(SignedEnvelope::new(format!("{}+sig", envelope))),
        }
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        match &self.disconnect_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

/// Freighter binding that has already granted site access.
pub struct FakeFreighter {
    pub public_key: String,
    pub network: String,
    pub sign_error: Option<ExtensionError>,
}

impl FakeFreighter {
    pub fn new(public_key: &str) -> Self {
        Self {
            public_key: public_key.to_string(),
            network: "TESTNET".to_string(),
            sign_error: None,
        }
    }
}

#[async_trait]
impl FreighterApi for FakeFreighter {
    async fn is_connected(&self) -> ExtensionResult<bool> {
        Ok(true)
    }

    async fn is_allowed(&self) -> ExtensionResult<bool> {
        Ok(true)
    }

    async fn set_allowed(&self) -> ExtensionResult<bool> {
        Ok(true)
    }

    async fn get_public_key(&self) -> ExtensionResult<String> {
        Ok(self.public_key.clone())
    }

    async fn get_network(&self) -> ExtensionResult<String> {
        Ok(self.network.clone())
    }

    async fn sign_transaction(&self, xdr: &str, _opts: FreighterSignOptions) -> ExtensionResult<String> {
        match &self.sign_error {
            Some(e) => Err(e.clone()),
            None => Ok(format!("{}+freighter", xdr)),
        }
    }
}
