//! Deterministic `Provider` for tests. Records every call it receives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{LlmError, Provider, ToolSpec};

enum Reply {
    Object(Value),
    Text(String),
    Fail(String),
}

#[derive(Default)]
struct Seen {
    prompt: Option<String>,
    tool: Option<String>,
    max_tokens: Option<u32>,
}

pub struct StubProvider {
    reply: Reply,
    calls: AtomicUsize,
    seen: Mutex<Seen>,
}

impl StubProvider {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Seen::default()),
        }
    }

    /// Answers structured calls with `value`, verbatim.
    pub fn object(value: Value) -> Self {
        Self::new(Reply::Object(value))
    }

    pub fn text(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    /// Fails every call with an API error carrying `detail`.
    pub fn failing(detail: &str) -> Self {
        Self::new(Reply::Fail(detail.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.seen.lock().unwrap().prompt.clone()
    }

    pub fn last_tool(&self) -> Option<String> {
        self.seen.lock().unwrap().tool.clone()
    }

    pub fn last_max_tokens(&self) -> Option<u32> {
        self.seen.lock().unwrap().max_tokens
    }

    fn fail(detail: &str) -> LlmError {
        LlmError::Api {
            status: 500,
            message: detail.to_string(),
        }
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn generate_object(&self, prompt: &str, tool: ToolSpec<'_>) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut seen = self.seen.lock().unwrap();
            seen.prompt = Some(prompt.to_string());
            seen.tool = Some(tool.name.to_string());
        }
        match &self.reply {
            Reply::Object(value) => Ok(value.clone()),
            Reply::Text(_) => Err(LlmError::MissingToolCall(tool.name.to_string())),
            Reply::Fail(detail) => Err(Self::fail(detail)),
        }
    }

    async fn generate_text(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut seen = self.seen.lock().unwrap();
            seen.prompt = Some(prompt.to_string());
            seen.max_tokens = Some(max_tokens);
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Object(_) => Err(LlmError::EmptyContent),
            Reply::Fail(detail) => Err(Self::fail(detail)),
        }
    }
}
