use tracing::{error, warn};

use intellidoc_core::{GenerationOptions, Prompt, TextGenerator};

use crate::prompts::PLACEHOLDER;

/// Text for one artifact, and whether it is the placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub placeholder: bool,
}

/// Issue one request; any failure collapses to [`PLACEHOLDER`].
///
/// There is no retry. Backend errors and empty results are not
/// distinguished in the returned text, only in the log line.
pub async fn generate_or_placeholder(
    generator: &dyn TextGenerator,
    prompt: &Prompt,
    options: &GenerationOptions,
    subject: &str,
) -> Generated {
    match generator.generate(prompt, options).await {
        Ok(text) => Generated {
            text,
            placeholder: false,
        },
        Err(e) => {
            if e.is_fatal() {
                error!(
                    subject,
                    kind = e.error_kind(),
                    error = %e,
                    "backend rejected credentials, substituting placeholder"
                );
            } else {
                warn!(
                    subject,
                    kind = e.error_kind(),
                    error = %e,
                    "generation failed, substituting placeholder"
                );
            }
            Generated {
                text: PLACEHOLDER.to_string(),
                placeholder: true,
            }
        }
    }
}
