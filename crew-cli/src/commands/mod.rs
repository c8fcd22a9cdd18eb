pub mod agents;
pub mod diff;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crew_core::{roster::load_roster_at, AgentProfile, GatewayConfig, SyncOptions};

/// Path flags shared by `sync` and `diff`.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Roster file (YAML or JSON) listing the agents.
    #[arg(long)]
    pub agents: PathBuf,

    /// Directory holding one workspace per agent [default: ~/.openclaw/workspaces].
    #[arg(long)]
    pub workspace_root: Option<PathBuf>,

    /// Runtime config file to generate [default: ~/.openclaw/openclaw.json].
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Workspace root as the runtime sees it, when it differs from --workspace-root.
    #[arg(long)]
    pub config_workspace_root: Option<PathBuf>,

    /// File whose content replaces the built-in AGENTS.md.
    #[arg(long = "agents-md")]
    pub agents_md: Option<PathBuf>,
}

impl TargetArgs {
    pub fn load_roster(&self) -> Result<Vec<AgentProfile>> {
        load_agents(&self.agents)
    }

    pub fn sync_options(&self, dry_run: bool) -> Result<SyncOptions> {
        let workspace_root = match &self.workspace_root {
            Some(path) => path.clone(),
            None => openclaw_home()?.join("workspaces"),
        };
        let config_path = match &self.config_path {
            Some(path) => path.clone(),
            None => openclaw_home()?.join("openclaw.json"),
        };
        let mut options = SyncOptions::new(workspace_root, config_path);
        options.config_workspace_root = self.config_workspace_root.clone();
        options.agents_md_path = self.agents_md.clone();
        options.gateway = GatewayConfig::from_env();
        options.dry_run = dry_run;
        Ok(options)
    }
}

pub fn load_agents(path: &Path) -> Result<Vec<AgentProfile>> {
    load_roster_at(path).with_context(|| format!("failed to load roster {}", path.display()))
}

fn openclaw_home() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".openclaw"))
}
