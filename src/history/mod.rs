//! Tip history: append-only logs of previously issued tips.
//!
//! Histories are keyed by (scope, subject, environment) where the subject is
//! a user id or a role name. The engine consults both scopes so a tip is
//! never repeated for one user nor across a role/environment cohort.

pub mod json_store;

pub use json_store::JsonHistoryStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One issued tip. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipRecord {
    pub date: NaiveDate,
    pub tip: String,
}

/// Whether a history belongs to a single user or a role cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    User,
    Role,
}

impl Scope {
    /// Key prefix keeping user ids and role names in disjoint key spaces.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
        }
    }
}

/// Append-only log store keyed by (scope, subject, environment).
///
/// `load` never fails for a missing key; `append` is durable before it
/// returns, so an immediate reload observes the new record.
pub trait HistoryStore: Send + Sync {
    fn load(&self, scope: Scope, subject: &str, environment: &str) -> Result<Vec<TipRecord>>;

    fn append(
        &self,
        scope: Scope,
        subject: &str,
        environment: &str,
        record: TipRecord,
    ) -> Result<()>;
}

/// Normalize a subject or environment for use as a storage key component:
/// whitespace and anything outside `[A-Za-z0-9._-]` becomes `_`.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_key("warehouse-3"), "warehouse-3");
        assert_eq!(normalize_key("emp.42"), "emp.42");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_key("shift supervisor"), "shift_supervisor");
        assert_eq!(normalize_key("  open office  "), "open_office");
    }

    #[test]
    fn test_normalize_path_separators() {
        assert_eq!(normalize_key("a/b\\c"), "a_b_c");
        assert_eq!(normalize_key("lab#2 (night)"), "lab_2__night_");
    }

    #[test]
    fn test_scope_prefixes_disjoint() {
        assert_ne!(Scope::User.prefix(), Scope::Role.prefix());
    }
}
