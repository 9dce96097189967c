//! Mock HTTP server
//!
//! Serves the [`MockResponder`] over plain HTTP/1.1, one request per connection.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::config::MockServerConfig;
use super::responder::{MockRequest, MockResponder, MockResponse, RequestOptions};
use crate::errors::TripmockError;
use crate::signals;

/// Upper bound on request head plus body
const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Logged request
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub timestamp: String,
    pub client_ip: String,
}

/// Mock HTTP server
pub struct MockServer {
    config: MockServerConfig,
    responder: MockResponder,
    request_log: Arc<RwLock<Vec<RequestRecord>>>,
}

impl MockServer {
    /// Create a new mock server from config
    pub fn new(config: MockServerConfig) -> Result<Self, TripmockError> {
        config.socket_addr()?;

        Ok(Self {
            config,
            responder: MockResponder::new(),
            request_log: Arc::new(RwLock::new(Vec::new())),
        })
    }

    pub fn config(&self) -> &MockServerConfig {
        &self.config
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener, TripmockError> {
        let addr = self.config.socket_addr()?;
        TcpListener::bind(addr)
            .await
            .map_err(|e| TripmockError::Server(format!("Failed to bind {}: {}", addr, e)))
    }

    /// Start the server and run until Ctrl+C
    pub async fn run(&self) -> Result<(), TripmockError> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;

        eprintln!("Mock server listening on http://{}", addr);
        eprintln!("Configured routes:");
        for route in self.responder.routes() {
            eprintln!("  {:<4} {:<24} {}", route.method, route.pattern, route.name);
        }

        self.serve(listener, signals::interrupted()).await
    }

    /// Accept connections on `listener` until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), TripmockError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Mock server shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer_addr)) => {
                            let responder = self.responder.clone();
                            let config = self.config.clone();
                            let log = Arc::clone(&self.request_log);

                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, peer_addr, &responder, &config, log).await {
                                    warn!(peer = %peer_addr, error = %e, "Connection error");
                                }
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "Accept error");
                        }
                    }
                }
            }
        }
    }

    /// Get the request log
    pub async fn requests(&self) -> Vec<RequestRecord> {
        self.request_log.read().await.clone()
    }

    /// Clear the request log
    pub async fn clear_requests(&self) {
        self.request_log.write().await.clear();
    }
}

/// Handle a single connection
async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    responder: &MockResponder,
    config: &MockServerConfig,
    log: Arc<RwLock<Vec<RequestRecord>>>,
) -> Result<(), TripmockError> {
    let raw = match read_request(&mut stream).await? {
        Some(RawRequest::Complete(raw)) => raw,
        Some(RawRequest::Rejected(response)) => {
            debug!(peer = %peer_addr, status = response.status(), "Request rejected before parsing");
            let bytes = render_response(Some(&response), config.cors);
            stream.write_all(&bytes).await?;
            stream.flush().await?;
            return Ok(());
        }
        None => return Ok(()),
    };

    let (method, path, response) = match parse_request(&raw) {
        Ok(request) => {
            let response = if config.cors && request.method.eq_ignore_ascii_case("OPTIONS") {
                None
            } else {
                Some(respond(responder, &request))
            };
            (request.method, request.path, response)
        }
        Err(e) => {
            debug!(peer = %peer_addr, error = %e, "Malformed request");
            (String::new(), String::new(), Some(MockResponse::message(400, "Bad request")))
        }
    };

    let status = response.as_ref().map(MockResponse::status).unwrap_or(204);

    if config.log_requests {
        info!(peer = %peer_addr, method = %method, path = %path, status, "Mock request");
        log.write().await.push(RequestRecord {
            method,
            path,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            client_ip: peer_addr.ip().to_string(),
        });
    }

    let bytes = render_response(response.as_ref(), config.cors);
    stream.write_all(&bytes).await?;
    stream.flush().await?;

    Ok(())
}

/// Bytes of one request, or the answer to send without dispatching it
enum RawRequest {
    Complete(Vec<u8>),
    Rejected(MockResponse),
}

/// Read the request head and a `Content-Length` body
async fn read_request(stream: &mut TcpStream) -> Result<Option<RawRequest>, TripmockError> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(if data.is_empty() { None } else { Some(RawRequest::Complete(data)) });
        }
        data.extend_from_slice(&buf[..n]);

        if let Some(head_end) = find_head_end(&data) {
            let declared = content_length(&String::from_utf8_lossy(&data[..head_end]));
            let body_len = match declared {
                Some(len) if len > MAX_REQUEST_BYTES => {
                    return Ok(Some(RawRequest::Rejected(MockResponse::message(413, "Payload too large"))))
                }
                Some(len) => len,
                None => return Ok(Some(RawRequest::Rejected(MockResponse::message(400, "Bad request")))),
            };

            let wanted = head_end.saturating_add(4).saturating_add(body_len);
            if data.len() >= wanted {
                data.truncate(wanted);
                return Ok(Some(RawRequest::Complete(data)));
            }
        }

        if data.len() > MAX_REQUEST_BYTES {
            return Ok(Some(RawRequest::Rejected(MockResponse::message(413, "Payload too large"))));
        }
    }
}

fn find_head_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Declared body length: `Some(0)` without the header, `None` when it is not a number
fn content_length(head: &str) -> Option<usize> {
    match head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
    {
        Some((_, value)) => value.trim().parse().ok(),
        None => Some(0),
    }
}

/// Parsed HTTP request
#[derive(Debug)]
struct ParsedRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Option<Value>,
}

/// Parse an HTTP request
fn parse_request(data: &[u8]) -> Result<ParsedRequest, TripmockError> {
    let (head, body) = match find_head_end(data) {
        Some(end) => (&data[..end], &data[end + 4..]),
        None => (data, &[][..]),
    };
    let head = String::from_utf8_lossy(head);
    let mut lines = head.lines();

    let request_line = lines.next()
        .ok_or_else(|| TripmockError::Argument("Empty request".to_string()))?;

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(TripmockError::Argument("Invalid request line".to_string()));
    }

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    // Non-JSON bodies are treated as absent
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(body).ok()
    };

    Ok(ParsedRequest {
        method: parts[0].to_uppercase(),
        path: parts[1].to_string(),
        headers,
        body,
    })
}

fn respond(responder: &MockResponder, request: &ParsedRequest) -> MockResponse {
    let options = RequestOptions {
        data: request.body.clone(),
        headers: request.headers.clone(),
    };
    responder.dispatch(&MockRequest::new(&request.method, &request.path, options))
}

/// Serialize a response, `None` meaning an empty CORS preflight answer
fn render_response(response: Option<&MockResponse>, cors: bool) -> Vec<u8> {
    let (status, body) = match response {
        Some(r) => (r.status(), serde_json::to_vec(r.body()).unwrap_or_else(|_| b"{}".to_vec())),
        None => (204, Vec::new()),
    };

    let mut head = format!("HTTP/1.1 {} {}\r\n", status, http_status_text(status));
    if response.is_some() {
        head.push_str("Content-Type: application/json\r\n");
    }
    if cors {
        head.push_str("Access-Control-Allow-Origin: *\r\n");
        head.push_str("Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n");
        head.push_str("Access-Control-Allow-Headers: *\r\n");
    }
    head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    head.push_str("Connection: close\r\n\r\n");

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(&body);
    bytes
}

/// Get HTTP status text
fn http_status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
