//! `crew diff`: show unified diffs for what sync would write.

use anyhow::{Context, Result};
use clap::Args;

use crew_sync::diff;

use super::TargetArgs;

/// Arguments for `crew diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let agents = self.target.load_roster()?;
        let options = self.target.sync_options(true)?;
        let diffs = diff(&agents, &options).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
