//! Shared fixtures for integration tests.
//!
//! `TestServer` runs the real `timechat-server` binary on a dedicated port with
//! its own data file, and kills it when dropped.

#![allow(dead_code)]

use std::{
    net::TcpStream,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream as TokioTcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Running server process
pub struct TestServer {
    port: u16,
    data_file: PathBuf,
    process: Child,
}

impl TestServer {
    /// Start a server with a fresh data file
    pub fn start(port: u16) -> Self {
        Self::start_with_data_file(port, temp_data_file())
    }

    /// Start a server on top of an existing (or not yet created) data file
    pub fn start_with_data_file(port: u16, data_file: PathBuf) -> Self {
        let process = Command::new(env!("CARGO_BIN_EXE_timechat-server"))
            .arg("--host")
            .arg("127.0.0.1")
            .arg("--port")
            .arg(port.to_string())
            .arg("--data-file")
            .arg(&data_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start timechat-server");

        let server = Self {
            port,
            data_file,
            process,
        };
        server.wait_until_ready();
        server
    }

    fn wait_until_ready(&self) {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        while Instant::now() < deadline {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("Server did not start on port {}", self.port);
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Stop the process and hand back the data file for a restart
    pub fn stop(mut self) -> PathBuf {
        self.kill();
        self.data_file.clone()
    }

    fn kill(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Path of a data file in a directory of its own under the system temp dir
pub fn temp_data_file() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("timechat-test-{}", uuid::Uuid::new_v4()));
    dir.join("timechat-data.json")
}

/// WebSocket client speaking JSON frames
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TokioTcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        Self { stream }
    }

    /// Connect and register under `alias`, consuming `registered` and returning `bootstrap`
    pub async fn register(server: &TestServer, alias: &str) -> (Self, Value) {
        let mut client = Self::connect(server).await;
        client
            .send(serde_json::json!({"type": "register", "alias": alias}))
            .await;
        let registered = client.recv().await;
        assert_eq!(registered["type"], "registered");
        let bootstrap = client.recv().await;
        assert_eq!(bootstrap["type"], "bootstrap");
        (client, bootstrap)
    }

    pub async fn send(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next text frame as JSON; panics after a timeout
    pub async fn recv(&mut self) -> Value {
        let text = self.recv_text().await;
        serde_json::from_str(&text).expect("Frame is not JSON")
    }

    pub async fn recv_text(&mut self) -> String {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let msg = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return text.to_string();
            }
        }
    }

    /// Next frame of the given type, skipping others
    pub async fn recv_type(&mut self, kind: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["type"] == kind {
                return frame;
            }
        }
    }

    /// Assert that nothing arrives within `wait`
    pub async fn assert_silent(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.stream.next()).await
        {
            panic!("Unexpected frame: {text}");
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
