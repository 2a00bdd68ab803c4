use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::{Result, VerdantError};

const CONFIG_TEMPLATE: &str = r#"# verdant configuration

[gateway]
# api_key = "..."        # or set VERDANT_API_KEY
# project_id = "..."     # or set VERDANT_PROJECT_ID
# region = "us-south"

[limits]
# calls_per_minute = 30

[tips]
# max_attempts = 5
# temperature = 0.7
# max_new_tokens = 100
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Initialize in the user data directory instead of the current directory
    #[arg(long)]
    pub global: bool,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    run_without_context(ctx.robot_mode, args)
}

/// Init must work before any data directory exists, so it does not build an
/// [`AppContext`].
pub fn run_without_context(robot: bool, args: &InitArgs) -> Result<()> {
    let root = if args.global {
        dirs::data_dir()
            .ok_or_else(|| VerdantError::MissingConfig("data directory not found".to_string()))?
            .join("verdant")
    } else {
        std::env::current_dir()?.join(".verdant")
    };

    std::fs::create_dir_all(root.join("tip_logs"))?;

    let config_path = root.join("config.toml");
    let created = if config_path.exists() {
        false
    } else {
        std::fs::write(&config_path, CONFIG_TEMPLATE)?;
        true
    };

    if robot {
        emit_robot(&robot_ok(serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Initialized")
            .kv("Root", &root.display().to_string())
            .kv(
                "Config",
                if created {
                    "created"
                } else {
                    "already present"
                },
            );
        emit_human(layout);
        Ok(())
    }
}
