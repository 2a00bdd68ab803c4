//! End-to-end tip flow over the JSON-backed history store.

use std::sync::{Arc, Mutex};

use verdant::config::TipsConfig;
use verdant::error::Result;
use verdant::gateway::{GenParams, InferenceGateway};
use verdant::history::{HistoryStore, JsonHistoryStore, Scope, TipRecord};
use verdant::tips::TipEngine;

/// Gateway returning canned responses in order; repeats the last one when
/// the script runs out.
struct ScriptedGateway {
    responses: Vec<String>,
    calls: Mutex<usize>,
}

impl ScriptedGateway {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: responses.iter().map(|s| (*s).to_string()).collect(),
            calls: Mutex::new(0),
        })
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

fn engine(gateway: Arc<ScriptedGateway>, store: Arc<JsonHistoryStore>) -> TipEngine {
    TipEngine::new(gateway, store, &TipsConfig::default(), 6000)
}

#[test]
fn same_day_idempotence_survives_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonHistoryStore::new(dir.path()));

    let first_gateway = ScriptedGateway::new(&["Carpool on Fridays."]);
    let first = engine(first_gateway.clone(), store.clone())
        .daily_tip("emp-1", "driver", "depot")
        .unwrap();

    // A fresh engine over the same store must return the persisted tip
    // without calling its gateway.
    let second_gateway = ScriptedGateway::new(&["Something else entirely."]);
    let second = engine(second_gateway.clone(), store.clone())
        .daily_tip("emp-1", "driver", "depot")
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first_gateway.call_count(), 1);
    assert_eq!(second_gateway.call_count(), 0);

    // Exactly one append per history in total.
    assert_eq!(store.load(Scope::User, "emp-1", "depot").unwrap().len(), 1);
    assert_eq!(store.load(Scope::Role, "driver", "depot").unwrap().len(), 1);
}

#[test]
fn cohort_history_blocks_repeats_across_users() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonHistoryStore::new(dir.path()));

    let gateway_a = ScriptedGateway::new(&["Switch off hall lights."]);
    let tip_a = engine(gateway_a, store.clone())
        .daily_tip("emp-a", "cleaner", "office")
        .unwrap();

    // The second user's gateway first proposes the cohort's tip, then a
    // fresh one; the engine must skip the repeat.
    let gateway_b = ScriptedGateway::new(&["Switch off hall lights.", "Reuse mop water."]);
    let tip_b = engine(gateway_b.clone(), store.clone())
        .daily_tip("emp-b", "cleaner", "office")
        .unwrap();

    assert_eq!(tip_a, "Switch off hall lights.");
    assert_eq!(tip_b, "Reuse mop water.");
    assert_eq!(gateway_b.call_count(), 2);

    // Both accepted tips land in the shared role history.
    let role = store.load(Scope::Role, "cleaner", "office").unwrap();
    assert_eq!(role.len(), 2);
}

#[test]
fn accepted_tip_is_novel_for_user_and_cohort() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonHistoryStore::new(dir.path()));

    let earlier = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    store
        .append(
            Scope::User,
            "emp-1",
            "lab",
            TipRecord {
                date: earlier,
                tip: "Old user tip".to_string(),
            },
        )
        .unwrap();
    store
        .append(
            Scope::Role,
            "chemist",
            "lab",
            TipRecord {
                date: earlier,
                tip: "Old role tip".to_string(),
            },
        )
        .unwrap();

    let gateway = ScriptedGateway::new(&["Old user tip", "Old role tip", "Fume hood sashes down."]);
    let tip = engine(gateway, store.clone())
        .daily_tip("emp-1", "chemist", "lab")
        .unwrap();

    assert_eq!(tip, "Fume hood sashes down.");

    let user = store.load(Scope::User, "emp-1", "lab").unwrap();
    let prior: Vec<&str> = user[..user.len() - 1].iter().map(|r| r.tip.as_str()).collect();
    assert!(!prior.contains(&tip.as_str()));
}

#[test]
fn environments_are_tracked_independently() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonHistoryStore::new(dir.path()));

    let gateway = ScriptedGateway::new(&["Same tip text."]);
    let engine = engine(gateway.clone(), store.clone());

    let office = engine.daily_tip("emp-1", "analyst", "office").unwrap();
    let home = engine.daily_tip("emp-1", "analyst", "home-office").unwrap();

    // The same text may be issued in different environments; each history
    // tracks its own novelty set.
    assert_eq!(office, home);
    assert_eq!(store.load(Scope::User, "emp-1", "office").unwrap().len(), 1);
    assert_eq!(
        store.load(Scope::User, "emp-1", "home-office").unwrap().len(),
        1
    );
}
