use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::config::RequestOptions;
use super::error::ProviderError;
use super::transport::Transport;

/// Transport answering every GET with a fixed body, or with a 500 when no
/// body is set. Records call count and requested URLs.
#[derive(Default)]
pub(crate) struct FakeTransport {
    body: Option<Value>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    options: Mutex<Vec<RequestOptions>>,
}

impl FakeTransport {
    pub(crate) fn with_body(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub(crate) fn options(&self) -> Vec<RequestOptions> {
        self.options.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.options.lock().unwrap().push(options.clone());
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => Err(ProviderError::Status {
                status: 500,
                url: url.to_string(),
            }),
        }
    }
}

pub(crate) fn read_test_file(provider: &str, file_name: &str) -> Value {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("src/provider/tests/test_data/");
    d.push(provider);
    d.push(file_name);
    let text = std::fs::read_to_string(d).unwrap();
    serde_json::from_str(&text).unwrap()
}

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
