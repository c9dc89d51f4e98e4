use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument};

use intellidoc_core::security::{AccessToken, ApiKey, IBM_IAM};

/// Body of a successful IAM token exchange.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Absolute expiry, seconds since the epoch.
    #[serde(default)]
    pub expiration: Option<i64>,
    /// Relative lifetime in seconds; used when `expiration` is absent.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("credential exchange rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Exchange an API key for a short-lived bearer token.
///
/// Attempted exactly once; any non-success status is an error the caller
/// treats as fatal.
#[instrument(skip(client, api_key))]
pub async fn exchange_api_key(
    client: &Client,
    token_url: &str,
    api_key: &ApiKey,
) -> Result<AccessToken, AuthError> {
    let resp = client
        .post(token_url)
        .form(&[
            ("grant_type", IBM_IAM.grant_type),
            ("apikey", api_key.0.expose_secret()),
        ])
        .send()
        .await
        .map_err(|e| AuthError::Network(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::Rejected { status, body });
    }

    let body: TokenResponse = resp
        .json()
        .await
        .map_err(|e| AuthError::Parse(e.to_string()))?;

    if body.access_token.is_empty() {
        return Err(AuthError::Parse("empty access_token".into()));
    }

    let expires_at = body.expiration.or_else(|| {
        body.expires_in
            .map(|secs| chrono::Utc::now().timestamp() + secs)
    });

    info!(expires_at = ?expires_at, "obtained IAM access token");

    Ok(AccessToken {
        token: SecretString::from(body.access_token),
        expires_at,
    })
}
