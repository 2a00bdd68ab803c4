use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct VerifyProofArgs {
    /// Path to the proof image
    pub image: PathBuf,
}

pub fn run(ctx: &AppContext, args: &VerifyProofArgs) -> Result<()> {
    let bytes = std::fs::read(&args.image)?;

    let assistant = ctx.assistant()?;
    let verdict = assistant.describe_proof(&bytes)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(&verdict))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Proof Verification")
            .kv("Image", &args.image.display().to_string())
            .kv("Valid", if verdict.valid { "yes" } else { "no" });
        if let Some(description) = &verdict.description {
            layout.blank().push_line(description.clone());
        }
        if let Some(error) = &verdict.error {
            layout.blank().kv("Error", error);
        }
        emit_human(layout);
        Ok(())
    }
}
