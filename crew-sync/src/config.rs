//! Generated runtime config.
//!
//! Shape consumed by the external agent runtime:
//!
//! ```json
//! {
//!   "agents": {
//!     "defaults": { "skipBootstrap": true },
//!     "list": [ { "id": "engineer", "name": "Engineer", "workspace": "/ws/engineer", "model": "openai/gpt-5-nano" } ]
//!   },
//!   "skills": {
//!     "load": { "extraDirs": [ "/ws/engineer/skills" ] },
//!     "entries": { "review": { "enabled": true } }
//!   }
//! }
//! ```
//!
//! Field order is fixed by the structs and `entries` is a `BTreeMap`, so
//! serialization is byte-stable for equal input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crew_core::{map_model, GatewayConfig};

use crate::error::SyncError;
use crate::workspace::MaterializedAgent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub agents: AgentsSection,
    pub skills: SkillsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsSection {
    pub defaults: AgentDefaults,
    pub list: Vec<AgentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefaults {
    pub skip_bootstrap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub id: String,
    pub name: String,
    pub workspace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsSection {
    pub load: SkillsLoad,
    pub entries: BTreeMap<String, SkillEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsLoad {
    pub extra_dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub enabled: bool,
}

/// Assemble the config from successfully materialized agents. No I/O.
pub fn build_config(agents: &[MaterializedAgent], gateway: &GatewayConfig) -> RuntimeConfig {
    let list = agents
        .iter()
        .map(|agent| AgentEntry {
            id: agent.slug.to_string(),
            name: agent.name.clone(),
            workspace: agent.config_dir.display().to_string(),
            model: map_model(agent.model.as_deref(), gateway),
        })
        .collect();

    let extra_dirs = agents
        .iter()
        .map(|agent| agent.config_skills_dir().display().to_string())
        .collect();

    let entries = agents
        .iter()
        .flat_map(|agent| agent.skills.iter())
        .map(|skill| (skill.key.clone(), SkillEntry { enabled: true }))
        .collect();

    RuntimeConfig {
        agents: AgentsSection {
            defaults: AgentDefaults {
                skip_bootstrap: true,
            },
            list,
        },
        skills: SkillsSection {
            load: SkillsLoad { extra_dirs },
            entries,
        },
    }
}

/// Pretty JSON with a trailing newline.
pub fn render_config(config: &RuntimeConfig) -> Result<String, SyncError> {
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');
    Ok(json)
}
