use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use intellidoc_core::errors::GenerationError;
use intellidoc_core::provider::{GenerationOptions, Prompt, TextGenerator};

/// Pre-programmed responses for deterministic testing without API calls.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Text(String),
    Error(GenerationError),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

type Responder = dyn Fn(&Prompt) -> MockResponse + Send + Sync;

enum Script {
    Queue(Mutex<VecDeque<MockResponse>>),
    Responder(Arc<Responder>),
}

/// Generator that answers from a script and records every prompt it saw.
pub struct MockGenerator {
    script: Script,
    prompts: Mutex<Vec<Prompt>>,
    context_window: usize,
}

impl MockGenerator {
    /// Answer calls in order; calls past the end of the queue fail.
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            script: Script::Queue(Mutex::new(responses.into())),
            prompts: Mutex::new(Vec::new()),
            context_window: 131_072,
        }
    }

    /// Answer each call by inspecting the prompt.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&Prompt) -> MockResponse + Send + Sync + 'static,
    {
        Self {
            script: Script::Responder(Arc::new(responder)),
            prompts: Mutex::new(Vec::new()),
            context_window: 131_072,
        }
    }

    /// Echo a fixed text for every call.
    pub fn constant(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::with_responder(move |_| MockResponse::Text(text.clone()))
    }

    pub fn with_context_window(mut self, tokens: usize) -> Self {
        self.context_window = tokens;
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn context_window(&self) -> usize {
        self.context_window
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        _options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let idx = {
            let mut prompts = self.prompts.lock();
            prompts.push(prompt.clone());
            prompts.len() - 1
        };

        let response = match &self.script {
            Script::Queue(queue) => queue.lock().pop_front().ok_or_else(|| {
                GenerationError::InvalidRequest(format!(
                    "MockGenerator: no response configured for call {idx}"
                ))
            })?,
            Script::Responder(f) => f(prompt),
        };

        match response {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Error(e) => Err(e),
        }
    }
}
