use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct BadgesArgs {
    /// Employee identifier
    pub user: String,
}

pub fn run(ctx: &AppContext, args: &BadgesArgs) -> Result<()> {
    let badges = ctx.ledger.badges(&args.user)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(serde_json::json!({
            "user": args.user,
            "badges": badges,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout.title(&format!("Badges: {}", args.user));
        for badge in &badges {
            layout.bullet(badge);
        }
        emit_human(layout);
        Ok(())
    }
}
