//! In-memory fakes for client tests

use async_trait::async_trait;
use skylog_core::domain::key::ApiKey;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{ClientError, Result};
use crate::key_store::KeyStore;
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub const TEST_KEY: &str = "abcdefghijklmnopqrstuv";

/// Key store holding a fixed key
pub struct StaticKeyStore {
    key: Mutex<Option<String>>,
}

impl StaticKeyStore {
    pub fn new(key: Option<&str>) -> Self {
        Self {
            key: Mutex::new(key.map(str::to_string)),
        }
    }
}

impl KeyStore for StaticKeyStore {
    fn get_key(&self) -> Result<Option<String>> {
        Ok(self.key.lock().unwrap().clone())
    }

    fn store_key(&self, key: &ApiKey) -> Result<()> {
        *self.key.lock().unwrap() = Some(key.as_str().to_string());
        Ok(())
    }
}

/// Transport that records requests and replays queued responses
///
/// Once the queue is empty every request is answered with `200` and the
/// default body.
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    default_body: String,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::with_default_body("{}")
    }

    pub fn with_default_body(body: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            default_body: body.to_string(),
        }
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(ApiResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, error: ClientError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Parsed JSON bodies of every recorded request that had one
    pub fn bodies(&self) -> Vec<serde_json::Value> {
        self.requests()
            .iter()
            .filter_map(|r| r.body.as_deref())
            .map(|b| serde_json::from_str(b).unwrap())
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);

        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(ApiResponse {
                status: 200,
                body: self.default_body.clone(),
            }),
        }
    }
}

/// Collects formatted log output so tests can assert on warnings
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain-text subscriber writing DEBUG and above into this capture
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Captured lines logged at WARN
    pub fn warnings(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(" WARN "))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
