//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod badges;
pub mod init;
pub mod leaderboard;
pub mod record;
pub mod report;
pub mod summarize;
pub mod tip;
pub mod trend;
pub mod verify_proof;
pub mod verify_tip;

use crate::app::AppContext;
use crate::error::Result;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Tip(args) => tip::run(ctx, args),
        Commands::Summarize(args) => summarize::run(ctx, args),
        Commands::Report(args) => report::run(ctx, args),
        Commands::Trend(args) => trend::run(ctx, args),
        Commands::VerifyProof(args) => verify_proof::run(ctx, args),
        Commands::VerifyTip(args) => verify_tip::run(ctx, args),
        Commands::Record(args) => record::run(ctx, args),
        Commands::Badges(args) => badges::run(ctx, args),
        Commands::Leaderboard(args) => leaderboard::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a verdant data directory
    Init(init::InitArgs),

    /// Get or generate today's eco-action tip
    Tip(tip::TipArgs),

    /// Summarize text into two professional sentences
    Summarize(summarize::SummarizeArgs),

    /// Draft a concise report on a topic
    Report(report::ReportArgs),

    /// Surface one innovation trend for a role
    Trend(trend::TrendArgs),

    /// Describe a proof image for sustainability or safety content
    VerifyProof(verify_proof::VerifyProofArgs),

    /// Judge whether a tip was applied, from an image description
    VerifyTip(verify_tip::VerifyTipArgs),

    /// Record a workplace action for a user
    Record(record::RecordArgs),

    /// Show a user's earned badges
    Badges(badges::BadgesArgs),

    /// Rank users by total recorded actions
    Leaderboard(leaderboard::LeaderboardArgs),
}
