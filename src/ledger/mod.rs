//! Action ledger: per-user dated action records, badges, leaderboard.
//!
//! Records are append-only; badges are derived from counts at read time and
//! never stored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerdantError};

/// Actions of one kind needed before its badge is awarded.
pub const BADGE_THRESHOLD: usize = 5;

/// Badge shown when no threshold has been met yet.
pub const PLACEHOLDER_BADGE: &str = "Participant";

const BADGE_RULES: &[(&str, &str)] = &[
    ("sustainability", "Green Champion"),
    ("safety", "Safety Star"),
    ("learning", "Learning Leader"),
];

/// One recorded workplace action. Never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub proof: String,
}

/// Leaderboard row: user and total action count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub actions: usize,
}

/// File-backed append-only ledger of user actions.
///
/// The whole document is read, modified, and rewritten per operation;
/// concurrent writers to the same file can lose updates (last writer wins).
pub struct ActionLedger {
    path: PathBuf,
}

impl ActionLedger {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an action with today's date, persisting before returning.
    pub fn record(&self, user_id: &str, kind: &str, proof: &str) -> Result<()> {
        let user_id = required(user_id, "Employee ID cannot be empty.")?;
        let kind = required(kind, "Action type cannot be empty.")?;

        let mut actions = self.load()?;
        actions
            .entry(user_id.to_string())
            .or_default()
            .push(ActionRecord {
                date: Local::now().date_naive(),
                kind: kind.to_string(),
                proof: proof.to_string(),
            });
        self.save(&actions)
    }

    /// All recorded actions for one user, oldest first.
    pub fn actions(&self, user_id: &str) -> Result<Vec<ActionRecord>> {
        Ok(self.load()?.remove(user_id.trim()).unwrap_or_default())
    }

    /// Badges derived from the user's full history. Falls back to the
    /// placeholder badge when no threshold is met.
    pub fn badges(&self, user_id: &str) -> Result<Vec<String>> {
        let actions = self.actions(user_id)?;

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for action in &actions {
            *counts.entry(action.kind.as_str()).or_insert(0) += 1;
        }

        let badges: Vec<String> = BADGE_RULES
            .iter()
            .filter(|(kind, _)| counts.get(kind).copied().unwrap_or(0) >= BADGE_THRESHOLD)
            .map(|(_, label)| (*label).to_string())
            .collect();

        if badges.is_empty() {
            Ok(vec![PLACEHOLDER_BADGE.to_string()])
        } else {
            Ok(badges)
        }
    }

    /// Users ranked by total action count descending. Ties keep the
    /// deterministic store order (alphabetical by user id).
    pub fn leaderboard(&self, top_n: usize) -> Result<Vec<LeaderboardEntry>> {
        let actions = self.load()?;
        let mut entries: Vec<LeaderboardEntry> = actions
            .into_iter()
            .map(|(user_id, records)| LeaderboardEntry {
                user_id,
                actions: records.len(),
            })
            .collect();
        entries.sort_by(|a, b| b.actions.cmp(&a.actions));
        entries.truncate(top_n);
        Ok(entries)
    }

    fn load(&self) -> Result<BTreeMap<String, Vec<ActionRecord>>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let actions = serde_json::from_str(&raw)
            .map_err(|err| VerdantError::Serialization(format!("action ledger parse: {err}")))?;
        Ok(actions)
    }

    fn save(&self, actions: &BTreeMap<String, Vec<ActionRecord>>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(actions)
            .map_err(|err| VerdantError::Serialization(format!("action ledger serialize: {err}")))?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

fn required<'a>(value: &'a str, guidance: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VerdantError::Validation(guidance.to_string()));
    }
    Ok(trimmed)
}
