//! Canned-response HTTP server for exercising probes end to end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: u16,
    content_type: String,
    body: String,
    stall: bool,
}

type Routes = Arc<HashMap<(String, String), CannedResponse>>;

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[derive(Default)]
pub struct MockServerBuilder {
    routes: HashMap<(String, String), CannedResponse>,
    hang: bool,
}

impl MockServerBuilder {
    /// JSON response for `method path`, path relative to `/api`.
    pub fn route(mut self, method: &str, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            CannedResponse {
                status,
                content_type: "application/json".to_string(),
                body: body.to_string(),
                stall: false,
            },
        );
        self
    }

    pub fn text_route(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            CannedResponse {
                status,
                content_type: "text/plain".to_string(),
                body: body.to_string(),
                stall: false,
            },
        );
        self
    }

    /// Record the request to `method path`, then never answer it.
    pub fn stalled_route(mut self, method: &str, path: &str) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            CannedResponse {
                status: 200,
                content_type: "application/json".to_string(),
                body: String::new(),
                stall: true,
            },
        );
        self
    }

    /// Accept connections but never answer.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub async fn start(self) -> MockServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes: Routes = Arc::new(self.routes);
        let hang = self.hang;

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    if hang {
                        let _held = stream;
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    }
                    let _ = handle(stream, routes, recorded).await;
                });
            }
        });

        MockServer {
            base_url: format!("http://{}{}", addr, API_PREFIX),
            requests,
        }
    }
}

impl MockServer {
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_to(&self, method: &str, path: &str) -> Option<RecordedRequest> {
        self.requests()
            .into_iter()
            .find(|r| r.method == method && r.path == path)
    }

    pub fn was_called(&self, method: &str, path: &str) -> bool {
        self.request_to(method, path).is_some()
    }
}

/// Base URL of a port nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, API_PREFIX)
}

async fn handle(
    mut stream: TcpStream,
    routes: Routes,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default();
    let path = target
        .strip_prefix(API_PREFIX)
        .unwrap_or(target)
        .to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    let response = routes
        .get(&(method.clone(), path.clone()))
        .cloned()
        .unwrap_or_else(|| CannedResponse {
            status: 404,
            content_type: "application/json".to_string(),
            body: r#"{"message":"Route not found"}"#.to_string(),
            stall: false,
        });

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if response.stall {
        tokio::time::sleep(Duration::from_secs(30)).await;
        return Ok(());
    }

    let raw = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.content_type,
        response.body.len(),
        response.body
    );
    stream.write_all(raw.as_bytes()).await?;
    stream.shutdown().await
}
