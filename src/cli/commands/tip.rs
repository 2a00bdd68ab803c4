use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct TipArgs {
    /// Employee identifier
    pub user: String,

    /// Job role
    #[arg(long)]
    pub role: String,

    /// Work environment
    #[arg(long, short)]
    pub environment: String,
}

pub fn run(ctx: &AppContext, args: &TipArgs) -> Result<()> {
    let engine = ctx.tip_engine()?;
    let tip = engine.daily_tip(&args.user, &args.role, &args.environment)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(serde_json::json!({
            "user": args.user,
            "role": args.role,
            "environment": args.environment,
            "tip": tip,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Daily Tip")
            .kv("Employee", &args.user)
            .kv("Role", &args.role)
            .kv("Environment", &args.environment)
            .blank()
            .push_line(tip);
        emit_human(layout);
        Ok(())
    }
}
