//! In-memory collaborators shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use forgor_protocols::{BadgeError, BadgeSink, ClientError, RawResponse, RelevanceBackend};

/// Badge sink that records every write.
#[derive(Default)]
pub struct RecordingSink {
    writes: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingSink {
    pub fn last(&self) -> Option<(String, Option<String>)> {
        self.writes.lock().last().cloned()
    }

    pub fn last_text(&self) -> Option<String> {
        self.last().map(|(text, _)| text)
    }

    pub fn count(&self) -> usize {
        self.writes.lock().len()
    }
}

#[async_trait]
impl BadgeSink for RecordingSink {
    async fn set_badge(&self, text: &str, color: Option<&str>) -> Result<(), BadgeError> {
        self.writes
            .lock()
            .push((text.to_string(), color.map(str::to_string)));
        Ok(())
    }
}

/// Scripted relevance backend.
///
/// Replies are consumed in order; once exhausted the fallback is returned.
pub struct FakeBackend {
    session: AtomicBool,
    replies: Mutex<VecDeque<Result<RawResponse, ClientError>>>,
    fallback: Mutex<Result<RawResponse, ClientError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            session: AtomicBool::new(true),
            replies: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Ok(RawResponse::new(200, r#"{"images":[]}"#))),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_session(&self, active: bool) {
        self.session.store(active, Ordering::SeqCst);
    }

    pub fn push(&self, reply: Result<RawResponse, ClientError>) {
        self.replies.lock().push_back(reply);
    }

    pub fn push_ok(&self, body: &str) {
        self.push(Ok(RawResponse::new(200, body)));
    }

    pub fn always(&self, reply: Result<RawResponse, ClientError>) {
        *self.fallback.lock() = reply;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl RelevanceBackend for FakeBackend {
    async fn ensure_session(&self) -> bool {
        self.session.load(Ordering::SeqCst)
    }

    async fn check_text(&self, search_text: &str) -> Result<RawResponse, ClientError> {
        self.calls.lock().push(search_text.to_string());
        let next = self.replies.lock().pop_front();
        match next {
            Some(reply) => reply,
            None => self.fallback.lock().clone(),
        }
    }
}
