//! Reconciliation pass: agent records in, workspaces and runtime config out.
//!
//! 1. Resolve the roots to absolute paths and ensure `workspace_root`
//!    exists (fatal on failure).
//! 2. Validate each agent; skip and log the ones that fail.
//! 3. Plan and apply each valid agent's workspace.
//! 4. Build the config from the materialized set and write it hash-gated.
//!
//! Only infrastructure failures abort the pass. Re-running with the same
//! input is a no-op on disk and reports `config_changed == false`.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};

use crew_core::{AgentProfile, SyncOptions};

use crate::config::{build_config, render_config};
use crate::error::{io_err, SyncError};
use crate::workspace::{
    apply_plan, normalize_path, validate_agent, AgentPlan, MaterializedAgent, Materializer,
    SkipReason, SkippedSkill, ValidatedAgent,
};
use crate::writer::{ensure_dir, write_if_changed, WriteResult};

/// An agent left out of the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAgent {
    pub id: String,
    pub name: String,
    /// Slug as supplied, before validation.
    pub slug: String,
    pub reason: SkipReason,
}

/// Outcome of one reconciliation pass.
#[derive(Debug)]
pub struct ReconcileReport {
    /// Whether the config file's content changed (or would, in dry-run).
    pub config_changed: bool,
    /// Slugs of materialized agents, in input order.
    pub agents: Vec<String>,
    pub skipped: Vec<SkippedAgent>,
    pub skipped_skills: Vec<SkippedSkill>,
    /// Every file outcome, config last.
    pub writes: Vec<WriteResult>,
}

pub(crate) struct PassPlan<'a> {
    pub planned: Vec<(ValidatedAgent<'a>, AgentPlan)>,
    pub skipped: Vec<SkippedAgent>,
}

impl PassPlan<'_> {
    pub fn materialized(&self) -> Vec<MaterializedAgent> {
        self.planned
            .iter()
            .map(|(validated, plan)| MaterializedAgent::new(validated, plan))
            .collect()
    }
}

/// Read the `AGENTS.md` override. Unreadable overrides fall back to the
/// built-in document.
pub(crate) fn load_agents_guide(path: Option<&Path>) -> Option<String> {
    let path = path?;
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            tracing::warn!(
                "cannot read AGENTS.md override {} ({err}); using built-in",
                path.display()
            );
            None
        }
    }
}

/// Copy of `options` with both workspace roots absolute and normalised.
///
/// The config is read by another process, so recorded paths must not depend
/// on this process's working directory.
pub(crate) fn resolve_roots(options: &SyncOptions) -> Result<SyncOptions, SyncError> {
    let absolute = |path: &Path| {
        std::path::absolute(path)
            .map(|abs| normalize_path(&abs))
            .map_err(|e| io_err(path, e))
    };
    let mut resolved = options.clone();
    resolved.workspace_root = absolute(options.workspace_root.as_path())?;
    resolved.config_workspace_root = options
        .config_workspace_root
        .as_deref()
        .map(absolute)
        .transpose()?;
    Ok(resolved)
}

/// Validate and plan every agent without writing anything.
pub(crate) fn plan_pass<'a>(
    agents: &'a [AgentProfile],
    options: &SyncOptions,
    now: DateTime<Utc>,
) -> Result<PassPlan<'a>, SyncError> {
    let materializer = Materializer::new(
        load_agents_guide(options.agents_md_path.as_deref()),
        now,
    )?;
    let mut seen = HashSet::new();
    let mut planned = Vec::new();
    let mut skipped = Vec::new();

    for agent in agents {
        let validated = validate_agent(agent, &options.workspace_root, options.config_root())
            .and_then(|v| {
                if seen.insert(v.slug.clone()) {
                    Ok(v)
                } else {
                    Err(SkipReason::DuplicateSlug {
                        slug: v.slug.to_string(),
                    })
                }
            });
        match validated {
            Ok(validated) => {
                let plan = materializer.plan(&validated)?;
                planned.push((validated, plan));
            }
            Err(reason) => {
                tracing::warn!("skipping agent {} ({}): {reason}", agent.id, agent.name);
                skipped.push(SkippedAgent {
                    id: agent.id.clone(),
                    name: agent.name.clone(),
                    slug: agent.slug.clone(),
                    reason,
                });
            }
        }
    }

    Ok(PassPlan { planned, skipped })
}

/// Reconcile `agents` into workspaces and the runtime config, using `now`
/// for the daily-note window.
pub fn reconcile_at(
    agents: &[AgentProfile],
    options: &SyncOptions,
    now: DateTime<Utc>,
) -> Result<ReconcileReport, SyncError> {
    let options = &resolve_roots(options)?;
    ensure_dir(&options.workspace_root, options.dry_run)?;

    let pass = plan_pass(agents, options, now)?;
    let mut writes = Vec::new();
    let mut skipped_skills = Vec::new();
    for (_, plan) in &pass.planned {
        writes.extend(apply_plan(plan, options.dry_run)?);
        skipped_skills.extend(plan.skipped_skills.iter().cloned());
    }

    let materialized = pass.materialized();
    let config = build_config(&materialized, &options.gateway);
    let json = render_config(&config)?;
    let config_write = write_if_changed(&options.config_path, &json, options.dry_run)?;
    let config_changed = config_write.is_change();
    writes.push(config_write);

    tracing::info!(
        "reconciled {} agent(s), skipped {}; config {}",
        materialized.len(),
        pass.skipped.len(),
        if config_changed { "changed" } else { "unchanged" }
    );

    Ok(ReconcileReport {
        config_changed,
        agents: materialized.iter().map(|a| a.slug.to_string()).collect(),
        skipped: pass.skipped,
        skipped_skills,
        writes,
    })
}

/// `reconcile_at` with the current time.
pub fn reconcile(
    agents: &[AgentProfile],
    options: &SyncOptions,
) -> Result<ReconcileReport, SyncError> {
    reconcile_at(agents, options, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn agent(id: &str, slug: &str) -> AgentProfile {
        AgentProfile {
            id: id.into(),
            name: id.to_uppercase(),
            slug: slug.into(),
            role: String::new(),
            openclaw_config: None,
            soul_content: "soul".into(),
            user_content: "user".into(),
            identity_content: "identity".into(),
            skills: vec![],
        }
    }

    #[test]
    fn duplicate_slugs_keep_first() {
        let tmp = TempDir::new().unwrap();
        let opts = SyncOptions::new(tmp.path().join("ws"), tmp.path().join("cfg.json"));
        let agents = vec![agent("a", "shared"), agent("b", "/shared/")];
        let report = reconcile(&agents, &opts).unwrap();
        assert_eq!(report.agents, vec!["shared"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, "b");
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::DuplicateSlug { .. }
        ));
    }

    #[test]
    fn unreadable_override_falls_back() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_agents_guide(Some(tmp.path().join("missing.md").as_path())), None);
        assert_eq!(load_agents_guide(None), None);

        let path = tmp.path().join("AGENTS.md");
        std::fs::write(&path, "# ours").unwrap();
        assert_eq!(load_agents_guide(Some(path.as_path())).as_deref(), Some("# ours"));
    }

    #[test]
    fn config_is_last_write() {
        let tmp = TempDir::new().unwrap();
        let opts = SyncOptions::new(tmp.path().join("ws"), tmp.path().join("cfg.json"));
        let report = reconcile(&[agent("a", "a")], &opts).unwrap();
        assert_eq!(
            report.writes.last().unwrap().path(),
            tmp.path().join("cfg.json")
        );
    }

    #[test]
    fn relative_roots_become_absolute() {
        let mut opts = SyncOptions::new("ws/.", "cfg.json");
        opts.config_workspace_root = Some("data/./ws".into());
        let resolved = resolve_roots(&opts).unwrap();

        assert!(resolved.workspace_root.is_absolute());
        assert!(resolved.workspace_root.ends_with("ws"));
        assert!(!resolved
            .workspace_root
            .components()
            .any(|c| c == std::path::Component::CurDir));
        let config_root = resolved.config_workspace_root.unwrap();
        assert!(config_root.is_absolute());
        assert!(config_root.ends_with("data/ws"));
        assert_eq!(resolved.config_path, opts.config_path);
    }

    #[test]
    fn workspace_root_creation_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let opts = SyncOptions::new(file.join("ws"), tmp.path().join("cfg.json"));
        let err = reconcile(&[agent("a", "a")], &opts).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }
}
