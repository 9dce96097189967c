//! Common test utilities for tripmock integration tests
//!
//! - Mock server start-up on an ephemeral port
//! - CLI invocation helpers

#![allow(dead_code)]

use std::net::SocketAddr;
use std::process::{Command, Stdio};
use std::sync::Arc;

use tokio::sync::oneshot;
use tripmock::mock::{MockServer, MockServerConfig};

/// A mock server running on a background task
pub struct RunningServer {
    pub addr: SocketAddr,
    pub server: Arc<MockServer>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Start the mock server on 127.0.0.1 with an OS-assigned port
pub async fn start_server(cors: bool) -> RunningServer {
    let config = MockServerConfig::new().with_port(0).with_cors(cors);
    let server = Arc::new(MockServer::new(config).expect("valid config"));
    let listener = server.bind().await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel::<()>();

    let task_server = Arc::clone(&server);
    tokio::spawn(async move {
        let _ = task_server
            .serve(listener, async {
                let _ = rx.await;
            })
            .await;
    });

    RunningServer {
        addr,
        server,
        shutdown: Some(tx),
    }
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the tripmock binary with a clean, mock-backed environment
pub fn tripmock(args: &[&str]) -> CliResponse {
    tripmock_with_env(args, &[])
}

pub fn tripmock_with_env(args: &[&str], env: &[(&str, &str)]) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tripmock"));
    cmd.args(args);
    for key in ["RUST_LOG", "API_BASE_URL", "CUSTOMER_EMAIL", "CUSTOMER_PASSWORD", "API_TIMEOUT", "TEST_WORKERS"] {
        cmd.env_remove(key);
    }
    cmd.env("USE_MOCK_API", "true");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().expect("Failed to run tripmock");
    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    }
}
