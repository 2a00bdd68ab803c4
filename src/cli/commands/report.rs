use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Report topic
    pub topic: String,
}

pub fn run(ctx: &AppContext, args: &ReportArgs) -> Result<()> {
    let assistant = ctx.assistant()?;
    let report = assistant.draft_report(&args.topic)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(serde_json::json!({
            "topic": args.topic,
            "report": report,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout.title(&format!("Report: {}", args.topic)).push_line(report);
        emit_human(layout);
        Ok(())
    }
}
