//! Minimal HTTP/1.1 server standing in for a router or worker.
//!
//! Answers `GET /health` from a scripted status queue (200 once the queue is
//! drained) and `POST /start_profile` with a fixed status. Every request is
//! recorded. Connections are closed after each response.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Default)]
struct Script {
    health: VecDeque<u16>,
    start_profile: u16,
    requests: Vec<ReceivedRequest>,
}

pub struct FakeServer {
    addr: SocketAddr,
    script: Arc<Mutex<Script>>,
    task: JoinHandle<()>,
}

impl FakeServer {
    /// Healthy server accepting every profile request.
    pub async fn start() -> Self {
        Self::scripted(Vec::new(), 200).await
    }

    /// Answer the first health probes with `health`, then 200.
    pub async fn scripted(health: Vec<u16>, start_profile: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("fake server addr");
        let script = Arc::new(Mutex::new(Script {
            health: health.into(),
            start_profile,
            requests: Vec::new(),
        }));

        let shared = Arc::clone(&script);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let script = Arc::clone(&shared);
                tokio::spawn(async move {
                    let _ = handle(stream, script).await;
                });
            }
        });

        Self { addr, script, task }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// `host:port` form used in worker address lists.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port())
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address())
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.script.lock().expect("lock script").requests.clone()
    }

    pub fn health_probes(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == "GET" && r.path == "/health")
            .count()
    }

    pub fn profile_bodies(&self) -> Vec<serde_json::Value> {
        self.requests()
            .iter()
            .filter(|r| r.method == "POST" && r.path == "/start_profile")
            .map(|r| serde_json::from_str(&r.body).expect("profile body is JSON"))
            .collect()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A local port with nothing listening on it.
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    listener.local_addr().expect("probe port addr").port()
}

async fn handle(mut stream: TcpStream, script: Arc<Mutex<Script>>) -> std::io::Result<()> {
    let Some(request) = read_request(&mut stream).await? else {
        return Ok(());
    };

    let status = {
        let mut script = script.lock().expect("lock script");
        script.requests.push(request.clone());
        match (request.method.as_str(), request.path.as_str()) {
            ("GET", "/health") => script.health.pop_front().unwrap_or(200),
            ("POST", "/start_profile") => script.start_profile,
            _ => 404,
        }
    };

    let response =
        format!("HTTP/1.1 {status} Fake\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<ReceivedRequest>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    Ok(Some(ReceivedRequest { method, path, body }))
}
