use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct TrendArgs {
    /// Job role to find an innovation for
    pub role: String,
}

pub fn run(ctx: &AppContext, args: &TrendArgs) -> Result<()> {
    let assistant = ctx.assistant()?;
    let trend = assistant.innovation_trend(&args.role)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(serde_json::json!({
            "role": args.role,
            "trend": trend,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout.title("Innovation Trend").kv("Role", &args.role).blank().push_line(trend);
        emit_human(layout);
        Ok(())
    }
}
