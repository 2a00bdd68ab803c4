use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Employee identifier
    pub user: String,

    /// Action type (sustainability, safety, learning, ...)
    pub action_type: String,

    /// Optional proof reference (file name, note)
    #[arg(long, default_value = "")]
    pub proof: String,
}

pub fn run(ctx: &AppContext, args: &RecordArgs) -> Result<()> {
    ctx.ledger.record(&args.user, &args.action_type, &args.proof)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(serde_json::json!({
            "user": args.user,
            "action_type": args.action_type,
            "recorded": true,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Action Recorded")
            .kv("Employee", &args.user)
            .kv("Type", &args.action_type);
        if !args.proof.is_empty() {
            layout.kv("Proof", &args.proof);
        }
        emit_human(layout);
        Ok(())
    }
}
