//! Per-agent workspace materialization.
//!
//! ```text
//! <workspace_root>/<slug>/
//!   SOUL.md  USER.md  IDENTITY.md  AGENTS.md     upsert, hash-gated
//!   skills/<skill_slug>/SKILL.md                  upsert, frontmatter ensured
//!   MEMORY.md                                     create once
//!   memory/WORKING.md                             create once
//!   memory/<yesterday|today|tomorrow>.md          create once (UTC dates)
//!   deliverables/                                 ensured
//! ```
//!
//! Each agent goes through `validate → plan → apply`. Validation and path
//! resolution happen before anything is written, so a rejected agent leaves
//! no trace on disk.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crew_core::{validate_slug, AgentProfile, Slug, SlugError};
use crew_renderer::{ensure_frontmatter, frontmatter_name, DocKind, Renderer, TemplateContext};

use crate::error::SyncError;
use crate::writer::{ensure_dir, write_if_changed, write_if_missing, WriteResult};

pub const SOUL_FILE: &str = "SOUL.md";
pub const USER_FILE: &str = "USER.md";
pub const IDENTITY_FILE: &str = "IDENTITY.md";
pub const SKILLS_DIR: &str = "skills";
pub const SKILL_FILE: &str = "SKILL.md";
pub const DELIVERABLES_DIR: &str = "deliverables";

// ---------------------------------------------------------------------------
// Skips
// ---------------------------------------------------------------------------

/// Why an agent or skill was left out of the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("invalid slug {raw:?}: {source}")]
    InvalidSlug { raw: String, source: SlugError },

    #[error("{} resolves outside the workspace root", .path.display())]
    OutsideWorkspace { path: PathBuf },

    #[error("slug {slug:?} is already taken by an earlier entry")]
    DuplicateSlug { slug: String },
}

/// A skill dropped from an otherwise valid agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSkill {
    pub agent_slug: String,
    pub skill_id: String,
    pub reason: SkipReason,
}

// ---------------------------------------------------------------------------
// Path containment
// ---------------------------------------------------------------------------

/// Lexically normalise `path`: drop `.`, fold `..` into its parent.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `base/<slug>`, provided it normalises to a strict descendant of `base`.
pub fn resolve_within(base: &Path, slug: &Slug) -> Result<PathBuf, SkipReason> {
    let base = normalize_path(base);
    let candidate = normalize_path(&base.join(slug.as_str()));
    if candidate == base || !candidate.starts_with(&base) {
        return Err(SkipReason::OutsideWorkspace { path: candidate });
    }
    Ok(candidate)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// An agent whose slug passed validation, with its resolved directories.
#[derive(Debug, Clone)]
pub struct ValidatedAgent<'a> {
    pub profile: &'a AgentProfile,
    pub slug: Slug,
    /// Directory on this machine's filesystem.
    pub agent_dir: PathBuf,
    /// Directory as recorded in the generated config.
    pub config_dir: PathBuf,
}

/// Validate `agent`'s slug and resolve its directories.
pub fn validate_agent<'a>(
    agent: &'a AgentProfile,
    workspace_root: &Path,
    config_root: &Path,
) -> Result<ValidatedAgent<'a>, SkipReason> {
    let slug = validate_slug(&agent.slug).map_err(|source| SkipReason::InvalidSlug {
        raw: agent.slug.clone(),
        source,
    })?;
    let agent_dir = resolve_within(workspace_root, &slug)?;
    let config_dir = normalize_path(config_root).join(slug.as_str());
    Ok(ValidatedAgent {
        profile: agent,
        slug,
        agent_dir,
        config_dir,
    })
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// How a planned file is reconciled with what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Rewritten whenever content differs.
    Upsert,
    /// Written only if absent.
    CreateOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub content: String,
    pub policy: WritePolicy,
}

/// A content-bearing skill as it lands in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedSkill {
    /// Canonical identifier: frontmatter `name`, else the slug.
    pub key: String,
    pub slug: Slug,
    pub path: PathBuf,
}

/// Everything one agent needs on disk, computed before any write.
#[derive(Debug, Clone)]
pub struct AgentPlan {
    pub files: Vec<PlannedFile>,
    pub dirs: Vec<PathBuf>,
    pub skills: Vec<MaterializedSkill>,
    pub skipped_skills: Vec<SkippedSkill>,
}

/// An agent that made it onto disk; input to the config builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedAgent {
    pub id: String,
    pub name: String,
    pub slug: Slug,
    /// Raw model id, mapped at config-build time.
    pub model: Option<String>,
    pub agent_dir: PathBuf,
    pub config_dir: PathBuf,
    pub skills: Vec<MaterializedSkill>,
}

impl MaterializedAgent {
    pub fn new(validated: &ValidatedAgent<'_>, plan: &AgentPlan) -> Self {
        MaterializedAgent {
            id: validated.profile.id.clone(),
            name: validated.profile.name.clone(),
            slug: validated.slug.clone(),
            model: validated.profile.model().map(str::to_string),
            agent_dir: validated.agent_dir.clone(),
            config_dir: validated.config_dir.clone(),
            skills: plan.skills.clone(),
        }
    }

    /// Skills directory as the runtime sees it.
    pub fn config_skills_dir(&self) -> PathBuf {
        self.config_dir.join(SKILLS_DIR)
    }
}

/// UTC dates of the rolling daily-note window around `now`.
pub fn daily_note_dates(now: DateTime<Utc>) -> Vec<NaiveDate> {
    let today = now.date_naive();
    [today.pred_opt(), Some(today), today.succ_opt()]
        .into_iter()
        .flatten()
        .collect()
}

/// Builds [`AgentPlan`]s. Holds the renderer and per-pass inputs.
pub struct Materializer {
    renderer: Renderer,
    agents_guide: Option<String>,
    now: DateTime<Utc>,
}

impl Materializer {
    /// `agents_guide` replaces the built-in `AGENTS.md` when set.
    pub fn new(agents_guide: Option<String>, now: DateTime<Utc>) -> Result<Self, SyncError> {
        Ok(Materializer {
            renderer: Renderer::new()?,
            agents_guide,
            now,
        })
    }

    /// Compute files, directories and skills for a validated agent.
    pub fn plan(&self, agent: &ValidatedAgent<'_>) -> Result<AgentPlan, SyncError> {
        let profile = agent.profile;
        let dir = &agent.agent_dir;
        let ctx = TemplateContext::from_agent(profile, &agent.slug);

        let mut files = vec![
            upsert(dir.join(SOUL_FILE), profile.soul_content.clone()),
            upsert(dir.join(USER_FILE), profile.user_content.clone()),
            upsert(dir.join(IDENTITY_FILE), profile.identity_content.clone()),
        ];

        let guide = match &self.agents_guide {
            Some(content) => content.clone(),
            None => self.renderer.render(&ctx, DocKind::AgentsGuide)?,
        };
        files.push(upsert(DocKind::AgentsGuide.output_path(dir), guide));

        let (skills, skipped_skills) = self.plan_skills(agent, &mut files);

        let mut scaffold = vec![DocKind::Memory, DocKind::Working];
        scaffold.extend(daily_note_dates(self.now).into_iter().map(DocKind::DailyNote));
        for doc in scaffold {
            files.push(PlannedFile {
                path: doc.output_path(dir),
                content: self.renderer.render(&ctx, doc)?,
                policy: if doc.is_scaffold() {
                    WritePolicy::CreateOnly
                } else {
                    WritePolicy::Upsert
                },
            });
        }

        Ok(AgentPlan {
            files,
            dirs: vec![dir.join(DELIVERABLES_DIR)],
            skills,
            skipped_skills,
        })
    }

    fn plan_skills(
        &self,
        agent: &ValidatedAgent<'_>,
        files: &mut Vec<PlannedFile>,
    ) -> (Vec<MaterializedSkill>, Vec<SkippedSkill>) {
        let skills_root = agent.agent_dir.join(SKILLS_DIR);
        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        let mut skipped = Vec::new();

        for skill in &agent.profile.skills {
            let Some(content) = skill.content() else {
                continue;
            };
            let resolved = validate_slug(&skill.slug)
                .map_err(|source| SkipReason::InvalidSlug {
                    raw: skill.slug.clone(),
                    source,
                })
                .and_then(|slug| {
                    if seen.insert(slug.clone()) {
                        Ok(slug)
                    } else {
                        Err(SkipReason::DuplicateSlug {
                            slug: slug.to_string(),
                        })
                    }
                })
                .and_then(|slug| resolve_within(&skills_root, &slug).map(|dir| (slug, dir)));

            let (slug, skill_dir) = match resolved {
                Ok(found) => found,
                Err(reason) => {
                    tracing::warn!(
                        "skipping skill {} of agent {}: {reason}",
                        skill.id,
                        agent.slug
                    );
                    skipped.push(SkippedSkill {
                        agent_slug: agent.slug.to_string(),
                        skill_id: skill.id.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let merged = ensure_frontmatter(content, slug.as_str(), skill.description.as_deref());
            let key = frontmatter_name(&merged).unwrap_or_else(|| slug.to_string());
            let path = skill_dir.join(SKILL_FILE);
            files.push(upsert(path.clone(), merged));
            skills.push(MaterializedSkill { key, slug, path });
        }
        (skills, skipped)
    }
}

fn upsert(path: PathBuf, content: String) -> PlannedFile {
    PlannedFile {
        path,
        content,
        policy: WritePolicy::Upsert,
    }
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// Write a plan to disk. Filesystem errors are fatal for the pass.
pub fn apply_plan(plan: &AgentPlan, dry_run: bool) -> Result<Vec<WriteResult>, SyncError> {
    for dir in &plan.dirs {
        ensure_dir(dir, dry_run)?;
    }
    plan.files
        .iter()
        .map(|file| match file.policy {
            WritePolicy::Upsert => write_if_changed(&file.path, &file.content, dry_run),
            WritePolicy::CreateOnly => write_if_missing(&file.path, &file.content, dry_run),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
