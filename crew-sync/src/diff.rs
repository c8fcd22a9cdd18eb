//! Unified diffs of what a reconciliation pass would change, for `crew diff`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use similar::TextDiff;

use crew_core::{AgentProfile, SyncOptions};

use crate::config::{build_config, render_config};
use crate::reconcile::{plan_pass, resolve_roots};
use crate::workspace::WritePolicy;
use crate::writer::{normalize_line_endings, read_existing};
use crate::SyncError;

/// A single file that would change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Plan a pass and diff every target against its on-disk content.
///
/// Create-once files appear only while missing. Nothing is written.
pub fn diff_at(
    agents: &[AgentProfile],
    options: &SyncOptions,
    now: DateTime<Utc>,
) -> Result<Vec<FileDiff>, SyncError> {
    let options = &resolve_roots(options)?;
    let pass = plan_pass(agents, options, now)?;
    let mut diffs = Vec::new();

    for (_, plan) in &pass.planned {
        for file in &plan.files {
            let existing = read_existing(&file.path);
            if file.policy == WritePolicy::CreateOnly && existing.is_some() {
                continue;
            }
            let label = file
                .path
                .strip_prefix(&options.workspace_root)
                .unwrap_or(file.path.as_path());
            diffs.extend(file_diff(&file.path, label, existing, &file.content));
        }
    }

    let json = render_config(&build_config(&pass.materialized(), &options.gateway))?;
    let label = options
        .config_path
        .file_name()
        .map(Path::new)
        .unwrap_or(options.config_path.as_path());
    diffs.extend(file_diff(
        &options.config_path,
        label,
        read_existing(&options.config_path),
        &json,
    ));

    Ok(diffs)
}

/// `diff_at` with the current time.
pub fn diff(agents: &[AgentProfile], options: &SyncOptions) -> Result<Vec<FileDiff>, SyncError> {
    diff_at(agents, options, Utc::now())
}

fn file_diff(
    path: &Path,
    label: &Path,
    existing: Option<Vec<u8>>,
    desired: &str,
) -> Option<FileDiff> {
    let old = existing
        .map(|bytes| normalize_line_endings(&String::from_utf8_lossy(&bytes)))
        .unwrap_or_default();
    let new = normalize_line_endings(desired);
    if old == new {
        return None;
    }
    let old_header = format!("a/{}", label.display());
    let new_header = format!("b/{}", label.display());
    let unified_diff = TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();
    Some(FileDiff {
        path: path.to_path_buf(),
        unified_diff,
    })
}
