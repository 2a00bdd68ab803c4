use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Text to summarize
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &SummarizeArgs) -> Result<()> {
    let text = match (&args.text, &args.file) {
        (_, Some(path)) => std::fs::read_to_string(path)?,
        (Some(text), None) => text.clone(),
        (None, None) => String::new(),
    };

    let assistant = ctx.assistant()?;
    let summary = assistant.summarize(&text)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(serde_json::json!({ "summary": summary })))
    } else {
        let mut layout = HumanLayout::new();
        layout.title("Summary").push_line(summary);
        emit_human(layout);
        Ok(())
    }
}
