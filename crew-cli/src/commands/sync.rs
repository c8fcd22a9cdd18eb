//! `crew sync`: materialize agent workspaces and write the runtime config.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crew_sync::{reconcile, ReconcileReport, WriteResult};

use super::TargetArgs;

/// Arguments for `crew sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit a machine-readable report.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let agents = self.target.load_roster()?;
        let options = self.target.sync_options(self.dry_run)?;
        let report = reconcile(&agents, &options).context("sync failed")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&ReportJson::from(&report))
                    .context("failed to serialize sync report")?
            );
        } else {
            print_report(&report, self.dry_run);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ReportJson {
    config_changed: bool,
    agents: Vec<String>,
    skipped: Vec<SkippedJson>,
    skipped_skills: Vec<SkippedSkillJson>,
    writes: Vec<WriteJson>,
}

#[derive(Serialize)]
struct SkippedJson {
    id: String,
    slug: String,
    reason: String,
}

#[derive(Serialize)]
struct SkippedSkillJson {
    agent_slug: String,
    skill_id: String,
    reason: String,
}

#[derive(Serialize)]
struct WriteJson {
    path: String,
    status: &'static str,
}

impl From<&ReconcileReport> for ReportJson {
    fn from(report: &ReconcileReport) -> Self {
        ReportJson {
            config_changed: report.config_changed,
            agents: report.agents.clone(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedJson {
                    id: s.id.clone(),
                    slug: s.slug.clone(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            skipped_skills: report
                .skipped_skills
                .iter()
                .map(|s| SkippedSkillJson {
                    agent_slug: s.agent_slug.clone(),
                    skill_id: s.skill_id.clone(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            writes: report
                .writes
                .iter()
                .map(|w| WriteJson {
                    path: w.path().display().to_string(),
                    status: status_key(w),
                })
                .collect(),
        }
    }
}

fn status_key(write: &WriteResult) -> &'static str {
    match write {
        WriteResult::Written { .. } => "written",
        WriteResult::WouldWrite { .. } => "would_write",
        WriteResult::Unchanged { .. } => "unchanged",
    }
}

fn print_report(report: &ReconcileReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = report.writes.iter().filter(|w| w.is_change()).count();
    let unchanged = report.writes.len() - changed;

    println!(
        "{prefix}✓ {} agent(s) synced ({} written, {} unchanged)",
        report.agents.len(),
        changed,
        unchanged
    );
    for w in &report.writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }

    for skipped in &report.skipped {
        println!(
            "{} agent {} ({:?}): {}",
            "skipped".yellow().bold(),
            skipped.id,
            skipped.slug,
            skipped.reason
        );
    }
    for skipped in &report.skipped_skills {
        println!(
            "{} skill {} of {}: {}",
            "skipped".yellow().bold(),
            skipped.skill_id,
            skipped.agent_slug,
            skipped.reason
        );
    }

    let config = if report.config_changed {
        "changed".green().to_string()
    } else {
        "unchanged".bright_black().to_string()
    };
    println!("{prefix}config {config}");
}
