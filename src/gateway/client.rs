//! HTTP client for the watsonx.ai text-generation service.
//!
//! Exchanges the account API key for a short-lived IAM bearer token, then
//! posts generation requests and extracts the generated text.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Deserialize;

use crate::config::{GatewayConfig, ResolvedCredentials};
use crate::error::{Result, VerdantError};

use super::{GenParams, InferenceGateway};

const IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const GENERATION_API_VERSION: &str = "2024-05-31";

/// Renew the bearer token this long before it actually expires.
const TOKEN_EXPIRY_SLACK_SECS: u64 = 60;

pub struct WatsonxClient {
    base_url: String,
    iam_url: String,
    api_key: String,
    project_id: String,
    model_id: String,
    client: reqwest::blocking::Client,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl WatsonxClient {
    /// Build a client for one model from resolved credentials.
    pub fn new(
        credentials: &ResolvedCredentials,
        model_id: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs.max(1));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| VerdantError::Config(format!("gateway http client: {err}")))?;
        Ok(Self {
            base_url: format!("https://{}.ml.cloud.ibm.com", credentials.region),
            iam_url: IAM_URL.to_string(),
            api_key: credentials.api_key.clone(),
            project_id: credentials.project_id.clone(),
            model_id: model_id.into(),
            client,
            token: Mutex::new(None),
        })
    }

    /// Build a client for the configured text model.
    pub fn text_from_config(config: &GatewayConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        Self::new(&credentials, config.text_model.clone(), config.timeout_secs)
    }

    /// Build a client for the configured verification model.
    pub fn verify_from_config(config: &GatewayConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        Self::new(
            &credentials,
            config.verify_model.clone(),
            config.timeout_secs,
        )
    }

    /// Override the generation endpoint base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the IAM token endpoint.
    #[must_use]
    pub fn with_iam_url(mut self, url: impl Into<String>) -> Self {
        self.iam_url = url.into();
        self
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn bearer_token(&self) -> Result<String> {
        let mut cached = self.token.lock();
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .client
            .post(&self.iam_url)
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .map_err(|err| VerdantError::Gateway(format!("token exchange failed: {err}")))?;

        if !response.status().is_success() {
            return Err(VerdantError::Gateway(format!(
                "token exchange HTTP {}",
                response.status()
            )));
        }

        let token: IamTokenResponse = response
            .json()
            .map_err(|err| VerdantError::Gateway(format!("token response parse: {err}")))?;

        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_SLACK_SECS);
        let entry = CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        };
        *cached = Some(entry);
        Ok(token.access_token)
    }

    fn generate_text(&self, prompt: &str, params: &GenParams) -> Result<String> {
        let token = self.bearer_token()?;
        let url = format!(
            "{}/ml/v1/text/generation?version={GENERATION_API_VERSION}",
            self.base_url
        );
        let body = serde_json::json!({
            "model_id": self.model_id,
            "project_id": self.project_id,
            "input": prompt,
            "parameters": params,
        });

        tracing::debug!(model = %self.model_id, "generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .map_err(|err| VerdantError::Gateway(format!("generation request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(VerdantError::Gateway(format!(
                "generation HTTP {}",
                response.status()
            )));
        }

        let response: GenerationResponse = response
            .json()
            .map_err(|err| VerdantError::Gateway(format!("generation response parse: {err}")))?;

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| VerdantError::Gateway("empty generation response".to_string()))?;

        Ok(result.generated_text.trim().to_string())
    }
}

impl InferenceGateway for WatsonxClient {
    fn generate(&self, prompt: &str, params: &GenParams) -> Result<String> {
        self.generate_text(prompt, params)
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    #[serde(default)]
    generated_text: String,
}
