use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;

/// A system + user prompt pair sent as one generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodingMethod {
    #[default]
    Greedy,
    Sample,
}

impl DecodingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Sample => "sample",
        }
    }
}

/// Options controlling generation behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationOptions {
    pub decoding_method: DecodingMethod,
    pub max_new_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            decoding_method: DecodingMethod::Greedy,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

/// A text-generation backend: one prompt in, one trimmed completion out.
///
/// Implementations authenticate before they are handed to the engine, so
/// `generate` never has to deal with credential exchange.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    fn context_window(&self) -> usize;

    async fn generate(
        &self,
        prompt: &Prompt,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}
