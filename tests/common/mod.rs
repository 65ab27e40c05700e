use async_trait::async_trait;
use rusty_rift::client::UpstreamClient;
use rusty_rift::error::CoreError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves canned payloads by URL and counts every fetch. URLs with no
/// canned body fail the way a network error would.
pub struct StubUpstream {
    responses: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for StubUpstream {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| CoreError::Transport(format!("no stub response for {url}")))
    }
}
