//! JSON file persistence for tip histories.
//!
//! One document per (scope, subject, environment) key, written whole on each
//! append so per-key reads and writes stay atomic.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VerdantError};

use super::{HistoryStore, Scope, TipRecord, normalize_key};

pub struct JsonHistoryStore {
    dir: PathBuf,
}

impl JsonHistoryStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, scope: Scope, subject: &str, environment: &str) -> PathBuf {
        let file = format!(
            "{}_{}_{}.json",
            scope.prefix(),
            normalize_key(subject),
            normalize_key(environment)
        );
        self.dir.join(file)
    }

    fn load_file(path: &Path) -> Result<Vec<TipRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<TipRecord> = serde_json::from_str(&raw)
            .map_err(|err| VerdantError::Serialization(format!("tip history parse: {err}")))?;
        Ok(records)
    }

    fn save_file(path: &Path, records: &[TipRecord]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(records)
            .map_err(|err| VerdantError::Serialization(format!("tip history serialize: {err}")))?;
        fs::write(path, payload)?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self, scope: Scope, subject: &str, environment: &str) -> Result<Vec<TipRecord>> {
        Self::load_file(&self.key_path(scope, subject, environment))
    }

    fn append(
        &self,
        scope: Scope,
        subject: &str,
        environment: &str,
        record: TipRecord,
    ) -> Result<()> {
        let path = self.key_path(scope, subject, environment);
        let mut records = Self::load_file(&path)?;
        records.push(record);
        Self::save_file(&path, &records)
    }
}
