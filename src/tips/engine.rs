//! Tip deduplication engine.
//!
//! Produces one eco-action tip per user per calendar day, novel for the user
//! and for the role/environment cohort, with bounded generation retry. When
//! every attempt collides with history the last candidate is accepted anyway
//! rather than failing the request; callers get best-effort novelty only.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Local;

use crate::config::TipsConfig;
use crate::error::{Result, VerdantError};
use crate::gateway::{GenParams, InferenceGateway, RateLimiter};
use crate::history::{HistoryStore, Scope, TipRecord};

pub struct TipEngine {
    gateway: Arc<dyn InferenceGateway>,
    store: Arc<dyn HistoryStore>,
    limiter: RateLimiter,
    max_attempts: u32,
    temperature: f32,
    max_new_tokens: u32,
    objective: String,
}

impl TipEngine {
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        store: Arc<dyn HistoryStore>,
        tips: &TipsConfig,
        calls_per_minute: u32,
    ) -> Self {
        Self {
            gateway,
            store,
            limiter: RateLimiter::per_minute(calls_per_minute),
            max_attempts: tips.max_attempts.max(1),
            temperature: tips.temperature,
            max_new_tokens: tips.max_new_tokens,
            objective: tips.objective.clone(),
        }
    }

    /// Generate or retrieve the daily tip for (user, role, environment).
    ///
    /// Idempotent per calendar day: once a tip has been issued, repeated
    /// calls on the same date return it without touching the gateway or the
    /// histories.
    pub fn daily_tip(&self, user_id: &str, role: &str, environment: &str) -> Result<String> {
        let user_id = required(user_id, "Employee ID cannot be empty.")?;
        let role = required(role, "Role cannot be empty.")?;
        let environment = required(environment, "Environment cannot be empty.")?;

        let today = Local::now().date_naive();

        let user_history = self.store.load(Scope::User, user_id, environment)?;
        if let Some(last) = user_history.last() {
            if last.date == today {
                tracing::debug!(user = user_id, "returning already-issued tip for today");
                return Ok(last.tip.clone());
            }
        }

        let role_history = self.store.load(Scope::Role, role, environment)?;
        let seen: HashSet<&str> = user_history
            .iter()
            .chain(role_history.iter())
            .map(|record| record.tip.as_str())
            .collect();

        let prompt = self.tip_prompt(role, environment);
        let params = GenParams::max_new_tokens(self.max_new_tokens)
            .with_temperature(self.temperature);

        let mut tip = String::new();
        let mut novel = false;
        for attempt in 1..=self.max_attempts {
            self.limiter.acquire();
            tip = self.gateway.generate(&prompt, &params)?;
            if !seen.contains(tip.as_str()) {
                novel = true;
                break;
            }
            tracing::debug!(attempt, "generated tip already issued, retrying");
        }
        if !novel {
            // Duplicate-tolerant fallback: keep the last candidate.
            tracing::warn!(
                attempts = self.max_attempts,
                "no novel tip found, issuing a repeat"
            );
        }

        let record = TipRecord {
            date: today,
            tip: tip.clone(),
        };
        self.store
            .append(Scope::User, user_id, environment, record.clone())?;
        self.store.append(Scope::Role, role, environment, record)?;

        Ok(tip)
    }

    fn tip_prompt(&self, role: &str, environment: &str) -> String {
        format!(
            "Generate one short eco-action tip for a {role} working in a {environment}, {}.",
            self.objective
        )
    }
}

fn required<'a>(value: &'a str, guidance: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VerdantError::Validation(guidance.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use crate::history::JsonHistoryStore;

    use super::*;

    /// Gateway returning canned responses in order; repeats the last one
    /// when the script runs out.
    struct ScriptedGateway {
        responses: Vec<String>,
        calls: Mutex<usize>,
    }

    impl ScriptedGateway {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: responses.iter().map(|s| (*s).to_string()).collect(),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl InferenceGateway for ScriptedGateway {
        fn generate(&self, _prompt: &str, _params: &GenParams) -> Result<String> {
            let mut calls = self.calls.lock().unwrap();
            let index = (*calls).min(self.responses.len() - 1);
            *calls += 1;
            Ok(self.responses[index].clone())
        }
    }

    fn engine_with(
        gateway: Arc<ScriptedGateway>,
        store: Arc<JsonHistoryStore>,
    ) -> TipEngine {
        // High call rate keeps the limiter out of the way in tests.
        TipEngine::new(gateway, store, &TipsConfig::default(), 6000)
    }

    #[test]
    fn test_first_call_generates_and_appends_both_scopes() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonHistoryStore::new(dir.path()));
        let gateway = Arc::new(ScriptedGateway::new(&["Use a reusable mug."]));
        let engine = engine_with(gateway.clone(), store.clone());

        let tip = engine.daily_tip("emp-1", "barista", "cafe").unwrap();
        assert_eq!(tip, "Use a reusable mug.");
        assert_eq!(gateway.call_count(), 1);

        assert_eq!(store.load(Scope::User, "emp-1", "cafe").unwrap().len(), 1);
        assert_eq!(store.load(Scope::Role, "barista", "cafe").unwrap().len(), 1);
    }

    #[test]
    fn test_same_day_second_call_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonHistoryStore::new(dir.path()));
        let gateway = Arc::new(ScriptedGateway::new(&["Tip A", "Tip B"]));
        let engine = engine_with(gateway.clone(), store.clone());

        let first = engine.daily_tip("emp-1", "clerk", "office").unwrap();
        let second = engine.daily_tip("emp-1", "clerk", "office").unwrap();

        assert_eq!(first, second);
        // Gateway untouched the second time, one append per history in total.
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(store.load(Scope::User, "emp-1", "office").unwrap().len(), 1);
        assert_eq!(store.load(Scope::Role, "clerk", "office").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_candidates_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonHistoryStore::new(dir.path()));

        // A tip the cohort has already seen on an earlier date.
        store
            .append(
                Scope::Role,
                "clerk",
                "office",
                TipRecord {
                    date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                    tip: "Stale tip".to_string(),
                },
            )
            .unwrap();

        let gateway = Arc::new(ScriptedGateway::new(&["Stale tip", "Fresh tip"]));
        let engine = engine_with(gateway.clone(), store.clone());

        let tip = engine.daily_tip("emp-2", "clerk", "office").unwrap();
        assert_eq!(tip, "Fresh tip");
        assert_eq!(gateway.call_count(), 2);
    }

    #[test]
    fn test_exhausted_attempts_fall_back_to_repeat() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonHistoryStore::new(dir.path()));

        store
            .append(
                Scope::User,
                "emp-3",
                "plant",
                TipRecord {
                    date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                    tip: "Only tip".to_string(),
                },
            )
            .unwrap();

        // Every attempt produces the known duplicate.
        let gateway = Arc::new(ScriptedGateway::new(&["Only tip"]));
        let engine = engine_with(gateway.clone(), store.clone());

        let tip = engine.daily_tip("emp-3", "welder", "plant").unwrap();
        assert_eq!(tip, "Only tip");
        assert_eq!(gateway.call_count(), 5);

        // The repeat is still appended to both histories.
        assert_eq!(store.load(Scope::User, "emp-3", "plant").unwrap().len(), 2);
        assert_eq!(store.load(Scope::Role, "welder", "plant").unwrap().len(), 1);
    }

    #[test]
    fn test_blank_inputs_rejected_with_guidance() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonHistoryStore::new(dir.path()));
        let gateway = Arc::new(ScriptedGateway::new(&["x"]));
        let engine = engine_with(gateway, store);

        let err = engine.daily_tip("  ", "clerk", "office").unwrap_err();
        assert!(matches!(err, VerdantError::Validation(_)));
        assert_eq!(err.to_string(), "Employee ID cannot be empty.");
    }
}
