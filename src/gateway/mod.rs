//! Inference gateway: the seam between verdant and the hosted model service.
//!
//! Everything that needs generated text depends on the [`InferenceGateway`]
//! trait; [`WatsonxClient`] is the production adapter.

pub mod client;
pub mod limiter;

pub use client::WatsonxClient;
pub use limiter::RateLimiter;

use serde::Serialize;

use crate::error::Result;

/// A hosted text-generation service.
///
/// Failures are transport or auth problems surfaced as
/// [`crate::VerdantError::Gateway`]; callers do not retry on failure.
pub trait InferenceGateway: Send + Sync {
    fn generate(&self, prompt: &str, params: &GenParams) -> Result<String>;
}

/// Generation parameters forwarded to the inference service.
#[derive(Debug, Clone, Serialize)]
pub struct GenParams {
    pub max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 80,
            temperature: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop_sequences: Vec::new(),
        }
    }
}

impl GenParams {
    #[must_use]
    pub fn max_new_tokens(tokens: u32) -> Self {
        Self {
            max_new_tokens: tokens,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    #[must_use]
    pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    #[must_use]
    pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    #[must_use]
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = sequences;
        self
    }
}
