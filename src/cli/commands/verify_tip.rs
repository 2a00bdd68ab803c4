use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct VerifyTipArgs {
    /// The tip that was issued
    #[arg(long)]
    pub tip: String,

    /// Description of the submitted proof image
    #[arg(long)]
    pub description: String,
}

pub fn run(ctx: &AppContext, args: &VerifyTipArgs) -> Result<()> {
    let assistant = ctx.assistant()?;
    let verdict = assistant.verify_tip_application(&args.tip, &args.description)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(&verdict))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Tip Application")
            .kv("Tip", &args.tip)
            .blank()
            .push_line(verdict.verdict);
        emit_human(layout);
        Ok(())
    }
}
