//! Role-tagged prompt framing for Granite-style instruct models.
//!
//! The backend receives a single `input` string; the trailing assistant
//! marker has no content so the model completes from that point.

use intellidoc_core::Prompt;

pub const START_OF_ROLE: &str = "<|start_of_role|>";
pub const END_OF_ROLE: &str = "<|end_of_role|>";
pub const END_OF_TEXT: &str = "<|end_of_text|>";

pub fn frame_prompt(prompt: &Prompt) -> String {
    format!(
        "{START_OF_ROLE}system{END_OF_ROLE}{}{END_OF_TEXT}\n\
         {START_OF_ROLE}user{END_OF_ROLE}{}\
         {START_OF_ROLE}assistant{END_OF_ROLE}",
        prompt.system, prompt.user
    )
}
