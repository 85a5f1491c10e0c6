//! Common utilities for quill integration tests

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

pub const HELLO_RESPONSE: &str = r#"{"id":"msg_1","type":"message","role":"assistant","model":"claude-3-haiku-20240307","content":[{"type":"text","text":"Hello"}],"stop_reason":"end_turn","stop_sequence":null,"usage":{"input_tokens":10,"output_tokens":1}}"#;

/// Isolated environment for running the quill binary
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// A quill command with no credential, no user config and clipboard disabled.
    pub fn quill(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_quill"));
        cmd.env_remove("API_KEY")
            .env_remove("ANTHROPIC_API_KEY")
            .env_remove("QUILL_API_URL")
            .env_remove("QUILL_LOG")
            .env("QUILL_CONFIG", self.path("config.toml"))
            .env("QUILL_CLIPBOARD_COMMAND", "");
        cmd
    }

    /// A quill command pointed at `url` with a test key.
    pub fn quill_against(&self, url: &str) -> Command {
        let mut cmd = self.quill();
        cmd.env("API_KEY", "test-key").env("QUILL_API_URL", url);
        cmd
    }
}

/// One-shot HTTP server returning a canned response
pub struct MockServer {
    pub url: String,
    handle: JoinHandle<String>,
}

impl MockServer {
    pub fn start(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock server");
        let url = format!("http://{}/v1/messages", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Mock server accept failed");
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });

        Self { url, handle }
    }

    /// Wait for the request and return its body.
    pub fn request_body(self) -> String {
        self.handle.join().expect("Mock server panicked")
    }
}

fn read_request(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            return String::new();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + length {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf[head_end..]).to_string()
}

/// A URL where nothing is listening.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/v1/messages", listener.local_addr().unwrap());
    drop(listener);
    url
}

pub fn stdout(output: &Output) -> &str {
    std::str::from_utf8(&output.stdout).unwrap()
}

pub fn stderr(output: &Output) -> &str {
    std::str::from_utf8(&output.stderr).unwrap()
}

pub fn assert_no_panic(output: &Output) {
    let stderr = stderr(output);
    assert!(!stderr.contains("panicked"), "unexpected panic: {}", stderr);
    assert!(!stderr.contains("RUST_BACKTRACE"), "unexpected panic: {}", stderr);
}

#[allow(dead_code)]
pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
