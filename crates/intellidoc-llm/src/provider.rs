use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use intellidoc_core::errors::GenerationError;
use intellidoc_core::provider::{GenerationOptions, Prompt, TextGenerator};
use intellidoc_core::security::{AccessToken, ApiKey, IBM_IAM};

use crate::auth::{self, AuthError};
use crate::framing;
use crate::models;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Refresh the bearer token when it has less than this many seconds left.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Connection settings for a watsonx.ai text generation deployment.
#[derive(Clone, Debug)]
pub struct WatsonxConfig {
    pub api_key: ApiKey,
    /// Full text generation URL, including `?version=` if the region needs it.
    pub endpoint: String,
    pub project_id: String,
    pub model_id: String,
    pub iam_token_url: String,
}

impl WatsonxConfig {
    pub fn new(
        api_key: ApiKey,
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            model_id: models::default_model().id.to_string(),
            iam_token_url: IBM_IAM.token_url.to_string(),
        }
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    input: String,
    model_id: &'a str,
    project_id: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    decoding_method: &'static str,
    max_new_tokens: u32,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Deserialize)]
struct GenerationResult {
    #[serde(default)]
    generated_text: String,
}

/// Bearer-authenticated client for the watsonx text generation endpoint.
///
/// The IAM token is exchanged once at connect time and again only when it is
/// about to expire.
pub struct WatsonxProvider {
    client: Client,
    api_key: ApiKey,
    iam_token_url: String,
    token: RwLock<AccessToken>,
    endpoint: String,
    project_id: String,
    model_id: String,
}

impl WatsonxProvider {
    /// Authenticate once and return a ready provider.
    pub async fn connect(config: WatsonxConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let token = auth::exchange_api_key(&client, &config.iam_token_url, &config.api_key).await?;

        Ok(Self::with_token(client, token, config))
    }

    /// Build a provider around an already exchanged token.
    pub fn with_token(client: Client, token: AccessToken, config: WatsonxConfig) -> Self {
        Self {
            client,
            api_key: config.api_key,
            iam_token_url: config.iam_token_url,
            token: RwLock::new(token),
            endpoint: config.endpoint,
            project_id: config.project_id,
            model_id: config.model_id,
        }
    }

    /// Requested output budget, capped at the model's output limit when the
    /// model is in the catalogue.
    fn max_new_tokens(&self, options: &GenerationOptions) -> u32 {
        models::find_model(&self.model_id)
            .map_or(options.max_new_tokens, |m| options.max_new_tokens.min(m.max_output))
    }

    async fn bearer(&self) -> Result<SecretString, GenerationError> {
        let current = self.token.read().clone();
        let now = chrono::Utc::now().timestamp();
        if !current.expires_within(now, TOKEN_REFRESH_MARGIN_SECS) {
            return Ok(current.token);
        }

        debug!("access token about to expire, refreshing");
        let fresh = auth::exchange_api_key(&self.client, &self.iam_token_url, &self.api_key)
            .await
            .map_err(|e| GenerationError::AuthenticationFailed(e.to_string()))?;
        let token = fresh.token.clone();
        *self.token.write() = fresh;
        Ok(token)
    }

    fn build_body<'a>(
        &'a self,
        prompt: &Prompt,
        options: &GenerationOptions,
    ) -> GenerationRequest<'a> {
        GenerationRequest {
            input: framing::frame_prompt(prompt),
            model_id: &self.model_id,
            project_id: &self.project_id,
            parameters: GenerationParameters {
                decoding_method: options.decoding_method.as_str(),
                max_new_tokens: self.max_new_tokens(options),
            },
        }
    }
}

#[async_trait]
impl TextGenerator for WatsonxProvider {
    fn name(&self) -> &str {
        "watsonx"
    }

    fn model(&self) -> &str {
        &self.model_id
    }

    fn context_window(&self) -> usize {
        models::context_window_for(&self.model_id)
    }

    #[instrument(skip(self, prompt, options), fields(model = %self.model_id))]
    async fn generate(
        &self,
        prompt: &Prompt,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let body = self.build_body(prompt, options);
        let bearer = self.bearer().await?;

        let resp = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", bearer.expose_secret()),
            )
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::from_status(status, body));
        }

        let parsed: GenerationResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .results
            .into_iter()
            .next()
            .map(|r| r.generated_text.trim().to_string())
            .ok_or(GenerationError::EmptyResponse)?;

        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!(chars = text.len(), "generation complete");
        Ok(text)
    }
}
