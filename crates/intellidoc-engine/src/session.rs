use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use intellidoc_core::{GenerationOptions, Prompt, TextGenerator};
use intellidoc_store::{StoreError, SummaryLog};

use crate::error::EngineError;
use crate::generate::generate_or_placeholder;
use crate::prompts;

/// Context used when a session starts without a summary log.
pub const FALLBACK_CONTEXT: &str = "No summaries found. Please run the analysis first.";

/// Default number of past turns replayed into each prompt.
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Estimate token count for text content.
/// Approximation: chars / 4.
pub fn estimate_text_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// One question and its answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: String,
}

impl ConversationTurn {
    fn rendered(&self) -> String {
        format!("\nUser: {}\nAssistant: {}", self.user, self.assistant)
    }

    fn estimated_tokens(&self) -> usize {
        estimate_text_tokens(&self.rendered())
    }
}

/// Bounds the part of the transcript replayed into a prompt.
///
/// The newest turns are kept; older ones are dropped once either the turn
/// limit or the token budget is reached. The full history is still held by
/// the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscriptWindow {
    pub max_turns: usize,
    pub max_tokens: usize,
}

impl Default for TranscriptWindow {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            max_tokens: 4096,
        }
    }
}

impl TranscriptWindow {
    /// Budget what is left of `context_window` after the system prompt and the
    /// reserved output.
    pub fn fitting(context_window: usize, system: &str, max_new_tokens: u32) -> Self {
        let reserved = estimate_text_tokens(system) + max_new_tokens as usize;
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            max_tokens: context_window.saturating_sub(reserved),
        }
    }

    /// Most recent suffix of `turns` that fits, leaving room for `pending`.
    pub fn select<'t>(
        &self,
        turns: &'t [ConversationTurn],
        pending: &str,
    ) -> &'t [ConversationTurn] {
        let mut used = estimate_text_tokens(pending);
        let mut start = turns.len();
        for (i, turn) in turns.iter().enumerate().rev() {
            if turns.len() - i > self.max_turns {
                break;
            }
            used += turn.estimated_tokens();
            if used > self.max_tokens {
                break;
            }
            start = i;
        }
        &turns[start..]
    }
}

/// Question-and-answer session over the summaries of a finished run.
///
/// The context is read once and never changes; the session never writes to
/// the findings document or the summary log.
pub struct InteractiveSession {
    generator: Arc<dyn TextGenerator>,
    context: String,
    system: String,
    history: Vec<ConversationTurn>,
    window: TranscriptWindow,
    options: GenerationOptions,
}

impl InteractiveSession {
    pub fn new(generator: Arc<dyn TextGenerator>, context: impl Into<String>) -> Self {
        let context = context.into();
        let system = prompts::chat_system_prompt(&context);
        let options = GenerationOptions::default();
        let window =
            TranscriptWindow::fitting(generator.context_window(), &system, options.max_new_tokens);
        Self {
            generator,
            context,
            system,
            history: Vec::new(),
            window,
            options,
        }
    }

    /// Start from a run's summary log, falling back to [`FALLBACK_CONTEXT`]
    /// when the log does not exist.
    pub fn from_log(
        generator: Arc<dyn TextGenerator>,
        log: &SummaryLog,
    ) -> Result<Self, EngineError> {
        let context = match log.read_to_string() {
            Ok(text) => text,
            Err(StoreError::MissingArtifact(path)) => {
                warn!(path = %path.display(), "summary log not found, starting without context");
                FALLBACK_CONTEXT.to_string()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self::new(generator, context))
    }

    pub fn with_window(mut self, window: TranscriptWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn clear(&mut self) {
        debug!(turns = self.history.len(), "clearing conversation");
        self.history.clear();
    }

    /// The user prompt sent for `message`: the windowed transcript followed by
    /// the new question and an open assistant line.
    pub fn render_transcript(&self, message: &str) -> String {
        let pending = format!("\nUser: {message}\nAssistant:");
        let window = self.window.select(&self.history, &pending);
        let mut out: String = window.iter().map(ConversationTurn::rendered).collect();
        out.push_str(&pending);
        out
    }

    /// Ask one question. Failures answer with the placeholder and are still
    /// recorded as a turn.
    pub async fn ask(&mut self, message: &str) -> String {
        let prompt = Prompt::new(self.system.clone(), self.render_transcript(message));
        let generated =
            generate_or_placeholder(self.generator.as_ref(), &prompt, &self.options, "chat").await;
        info!(
            turn = self.history.len() + 1,
            placeholder = generated.placeholder,
            "chat turn answered"
        );
        self.history.push(ConversationTurn {
            user: message.to_string(),
            assistant: generated.text.clone(),
        });
        generated.text
    }
}
