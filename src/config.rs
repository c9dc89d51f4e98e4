use std::path::{Path, PathBuf};

use secrecy::SecretString;

use intellidoc_core::security::{env_vars, ApiKey};
use intellidoc_llm::WatsonxConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("target folder {} does not exist or is not a directory", .0.display())]
    InvalidTarget(PathBuf),
}

/// Backend settings resolved from the environment.
#[derive(Debug)]
pub struct AppConfig {
    pub watsonx: WatsonxConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let api_key = require(env_vars::IBM_API_KEY)?;
        let endpoint = require(env_vars::REGION_ENDPOINT)?;
        let project_id = get(env_vars::PROJECT_ID).unwrap_or_default();
        if project_id.is_empty() {
            tracing::warn!("{} is not set; the backend may reject requests", env_vars::PROJECT_ID);
        }

        let api_key = ApiKey(SecretString::from(api_key));
        let mut watsonx = WatsonxConfig::new(api_key, endpoint, project_id);
        if let Some(model_id) = get(env_vars::MODEL_ID) {
            watsonx.model_id = model_id;
        }
        if let Some(url) = get(env_vars::IAM_TOKEN_URL) {
            watsonx.iam_token_url = url;
        }
        Ok(Self { watsonx })
    }
}

/// Absolute, symlink-free path of an existing directory.
pub fn resolve_target(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.canonicalize() {
        Ok(p) if p.is_dir() => Ok(p),
        _ => Err(ConfigError::InvalidTarget(path.to_path_buf())),
    }
}

/// Absolute output root; it may not exist yet.
pub fn resolve_output(path: &Path) -> std::io::Result<PathBuf> {
    if let Ok(p) = path.canonicalize() {
        return Ok(p);
    }
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
