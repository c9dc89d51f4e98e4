pub mod artifact;
pub mod errors;
pub mod provider;
pub mod run;
pub mod security;

pub use artifact::ArtifactKind;
pub use errors::GenerationError;
pub use provider::{DecodingMethod, GenerationOptions, Prompt, TextGenerator};
pub use run::{RunContext, RunId};
