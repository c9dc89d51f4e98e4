//! HTTP surface for an [`InteractiveSession`](intellidoc_engine::InteractiveSession).

pub mod handlers;
pub mod server;

pub use handlers::{ChatRequest, ChatResponse, ClearResponse};
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle, DEFAULT_CHAT_PORT};
