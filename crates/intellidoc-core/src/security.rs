use secrecy::SecretString;

/// Wraps an API key with secrecy protection (zeroized on drop, redacted in Debug).
#[derive(Clone)]
pub struct ApiKey(pub SecretString);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Short-lived bearer token obtained from the IAM exchange.
#[derive(Clone)]
pub struct AccessToken {
    pub token: SecretString,
    /// Unix timestamp in seconds, when the issuer reports one.
    pub expires_at: Option<i64>,
}

impl AccessToken {
    /// True when the token expires within `margin_secs` of `now`. Tokens
    /// without a reported expiry never count as expiring.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|at| at.saturating_sub(now) <= margin_secs)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub struct IamConfig {
    pub token_url: &'static str,
    pub grant_type: &'static str,
}

pub const IBM_IAM: IamConfig = IamConfig {
    token_url: "https://iam.cloud.ibm.com/identity/token",
    grant_type: "urn:ibm:params:oauth:grant-type:apikey",
};

/// Environment variable names read at startup.
pub mod env_vars {
    pub const IBM_API_KEY: &str = "IBM_API_KEY";
    pub const REGION_ENDPOINT: &str = "REGION_ENDPOINT";
    pub const PROJECT_ID: &str = "PROJECT_ID";
    pub const MODEL_ID: &str = "MODEL_ID";
    pub const IAM_TOKEN_URL: &str = "IAM_TOKEN_URL";
}
