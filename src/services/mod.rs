//! Assistant services: prompt assembly over the inference gateway.
//!
//! Each operation owns its own rate limiter, so a burst of summaries never
//! starves report drafting. Blank required inputs come back as validation
//! guidance, not failures.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerdantError};
use crate::gateway::{GenParams, InferenceGateway, RateLimiter};

/// Longest base64 payload embedded in a proof-description prompt.
const PROOF_PAYLOAD_LIMIT: usize = 100_000;

/// Outcome of a proof-image description request.
///
/// Gateway failures are folded into `valid: false` rather than propagated;
/// an unreadable proof is a verdict, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofVerdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Yes/no-with-reason verdict on whether a tip was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipApplicationVerdict {
    pub verdict: String,
}

pub struct Assistant {
    text: Arc<dyn InferenceGateway>,
    verify: Arc<dyn InferenceGateway>,
    summarize_limiter: RateLimiter,
    report_limiter: RateLimiter,
    trend_limiter: RateLimiter,
    proof_limiter: RateLimiter,
    verify_limiter: RateLimiter,
}

impl Assistant {
    /// `text` serves the drafting operations; `verify` is the model used for
    /// tip-application verdicts.
    pub fn new(
        text: Arc<dyn InferenceGateway>,
        verify: Arc<dyn InferenceGateway>,
        calls_per_minute: u32,
    ) -> Self {
        Self {
            text,
            verify,
            summarize_limiter: RateLimiter::per_minute(calls_per_minute),
            report_limiter: RateLimiter::per_minute(calls_per_minute),
            trend_limiter: RateLimiter::per_minute(calls_per_minute),
            proof_limiter: RateLimiter::per_minute(calls_per_minute),
            verify_limiter: RateLimiter::per_minute(calls_per_minute),
        }
    }

    /// Two-sentence professional summary of arbitrary text.
    pub fn summarize(&self, text: &str) -> Result<String> {
        let text = required(text, "Please paste the text to summarize.")?;
        let prompt =
            format!("Summarize the following text into two clear, professional sentences:\n{text}\n");
        self.summarize_limiter.acquire();
        self.text.generate(&prompt, &GenParams::max_new_tokens(150))
    }

    /// Concise report with intro, key points, and conclusion.
    pub fn draft_report(&self, topic: &str) -> Result<String> {
        let topic = required(topic, "Report topic cannot be empty.")?;
        let prompt =
            format!("Draft a concise report on '{topic}' with intro, key points, and conclusion.");
        self.report_limiter.acquire();
        self.text.generate(&prompt, &GenParams::max_new_tokens(800))
    }

    /// One actionable innovation for the given role.
    pub fn innovation_trend(&self, role: &str) -> Result<String> {
        let role = required(role, "Role cannot be empty.")?;
        let prompt = format!("Identify one cutting-edge innovation for {role} with actionable insight.");
        self.trend_limiter.acquire();
        self.text.generate(&prompt, &GenParams::max_new_tokens(120))
    }

    /// Describe a proof image, looking for safety or sustainability content.
    ///
    /// The image bytes are base64-embedded in the prompt, truncated to
    /// [`PROOF_PAYLOAD_LIMIT`] characters with a trailing ellipsis.
    pub fn describe_proof(&self, image: &[u8]) -> Result<ProofVerdict> {
        if image.is_empty() {
            return Err(VerdantError::Validation(
                "Proof image is empty.".to_string(),
            ));
        }

        let mut payload = BASE64.encode(image);
        if payload.len() > PROOF_PAYLOAD_LIMIT {
            payload.truncate(PROOF_PAYLOAD_LIMIT);
            payload.push_str("...");
        }

        let prompt = format!(
            "You are the Verdant vision assistant. Describe this truncated \
             base64-encoded image focusing on safety improvements or \
             sustainability actions: {payload}"
        );
        let params = GenParams::max_new_tokens(150).with_temperature(0.5);

        self.proof_limiter.acquire();
        match self.text.generate(&prompt, &params) {
            Ok(description) => Ok(ProofVerdict {
                valid: true,
                description: Some(description),
                error: None,
            }),
            Err(err) => Ok(ProofVerdict {
                valid: false,
                description: None,
                error: Some(err.to_string()),
            }),
        }
    }

    /// Did the employee apply the tip, judging from the image description?
    pub fn verify_tip_application(
        &self,
        tip: &str,
        image_description: &str,
    ) -> Result<TipApplicationVerdict> {
        let tip = required(tip, "Tip cannot be empty.")?;
        let image_description = required(
            image_description,
            "Image description cannot be empty.",
        )?;

        let prompt = format!(
            "The following sustainability tip was given to an employee:\n\
             Tip: {tip}\n\n\
             And the employee submitted this image description:\n\
             Description: {image_description}\n\n\
             Based on the description, did the employee apply the tip? \
             Reply with 'Yes' or 'No' and a short reason."
        );

        self.verify_limiter.acquire();
        let verdict = self.verify.generate(&prompt, &GenParams::default())?;
        Ok(TipApplicationVerdict { verdict })
    }
}

fn required<'a>(value: &'a str, guidance: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VerdantError::Validation(guidance.to_string()));
    }
    Ok(trimmed)
}
