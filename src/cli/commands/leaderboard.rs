use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct LeaderboardArgs {
    /// Number of users to show
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

pub fn run(ctx: &AppContext, args: &LeaderboardArgs) -> Result<()> {
    let entries = ctx.ledger.leaderboard(args.top)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(serde_json::json!({ "leaderboard": entries })))
    } else {
        let mut layout = HumanLayout::new();
        layout.title("Leaderboard");
        if entries.is_empty() {
            layout.bullet("No actions recorded yet.");
        }
        for (rank, entry) in entries.iter().enumerate() {
            layout.push_line(format!(
                "{:>2}. {}  ({} actions)",
                rank + 1,
                entry.user_id,
                entry.actions
            ));
        }
        emit_human(layout);
        Ok(())
    }
}
