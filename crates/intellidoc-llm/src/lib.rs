pub mod auth;
pub mod framing;
pub mod models;
pub mod provider;

pub mod mock;

pub use auth::AuthError;
pub use mock::{MockGenerator, MockResponse};
pub use provider::{WatsonxConfig, WatsonxProvider};
