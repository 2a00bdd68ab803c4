use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, VerdantError};
use crate::gateway::WatsonxClient;
use crate::history::JsonHistoryStore;
use crate::ledger::ActionLedger;
use crate::services::Assistant;
use crate::tips::TipEngine;

pub struct AppContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub ledger: ActionLedger,
    pub history: Arc<JsonHistoryStore>,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&root));
        let config = Config::load(cli.config.as_deref(), &root)?;

        let ledger = ActionLedger::new(root.join(&config.storage.actions_file));
        let history = Arc::new(JsonHistoryStore::new(root.join(&config.storage.tip_log_dir)));

        Ok(Self {
            root,
            config_path,
            config,
            ledger,
            history,
            robot_mode: cli.robot,
            verbosity: cli.verbose,
        })
    }

    /// Build the tip engine. Requires gateway credentials.
    pub fn tip_engine(&self) -> Result<TipEngine> {
        let gateway = Arc::new(WatsonxClient::text_from_config(&self.config.gateway)?);
        Ok(TipEngine::new(
            gateway,
            self.history.clone(),
            &self.config.tips,
            self.config.limits.calls_per_minute,
        ))
    }

    /// Build the assistant services. Requires gateway credentials.
    pub fn assistant(&self) -> Result<Assistant> {
        let text = Arc::new(WatsonxClient::text_from_config(&self.config.gateway)?);
        let verify = Arc::new(WatsonxClient::verify_from_config(&self.config.gateway)?);
        Ok(Assistant::new(
            text,
            verify,
            self.config.limits.calls_per_minute,
        ))
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("VERDANT_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".verdant")? {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| VerdantError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("verdant"))
    }
}

fn default_config_path(root: &Path) -> PathBuf {
    if root.ends_with(".verdant") {
        root.join("config.toml")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| root.to_path_buf())
            .join("verdant/config.toml")
    }
}

fn find_upwards(start: &Path, name: &str) -> Result<Option<PathBuf>> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Ok(Some(candidate));
        }
        current = dir.parent();
    }
    Ok(None)
}
