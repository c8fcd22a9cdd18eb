//! Domain types for agent reconciliation.
//!
//! Input records mirror the camelCase shape handed over by the agent data
//! store. All path fields use `PathBuf`; never `&str` or `String` for
//! filesystem paths.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::GatewayConfig;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A path-safe identifier that passed [`crate::slug::validate_slug`].
///
/// Only ASCII letters, digits, `-` and `_`; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slug(pub(crate) String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// Runtime settings embedded in an agent record.
///
/// Unknown keys are kept in `extra` so records round-trip without loss.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A skill assigned to an agent.
///
/// Without `content_markdown` the skill is metadata-only and produces no file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSkill {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_markdown: Option<String>,
}

impl ResolvedSkill {
    /// Markdown body, if the skill carries any non-blank content.
    pub fn content(&self) -> Option<&str> {
        self.content_markdown
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }
}

/// A declarative agent record, read-only for the duration of one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openclaw_config: Option<RuntimeOverrides>,
    pub soul_content: String,
    pub user_content: String,
    pub identity_content: String,
    #[serde(default)]
    pub skills: Vec<ResolvedSkill>,
}

impl AgentProfile {
    /// Raw model identifier from the embedded runtime settings.
    pub fn model(&self) -> Option<&str> {
        self.openclaw_config
            .as_ref()
            .and_then(|c| c.model.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Inputs controlling where a reconciliation pass writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Real filesystem root under which per-agent directories are created.
    pub workspace_root: PathBuf,
    /// Generated runtime config file.
    pub config_path: PathBuf,
    /// Root recorded inside the config when the runtime sees a different
    /// mount than this process (host vs. container).
    pub config_workspace_root: Option<PathBuf>,
    /// Replacement for the built-in `AGENTS.md`.
    pub agents_md_path: Option<PathBuf>,
    pub gateway: GatewayConfig,
    /// Report what would be written without touching disk.
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new(workspace_root: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            config_path: config_path.into(),
            config_workspace_root: None,
            agents_md_path: None,
            gateway: GatewayConfig::default(),
            dry_run: false,
        }
    }

    /// Root path as the external runtime sees it.
    pub fn config_root(&self) -> &PathBuf {
        self.config_workspace_root
            .as_ref()
            .unwrap_or(&self.workspace_root)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
