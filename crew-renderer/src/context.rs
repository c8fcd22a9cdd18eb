//! Template context: serializable rendering payload built from [`AgentProfile`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crew_core::{AgentProfile, Slug};

use crate::error::RenderError;

/// Rendering payload for the built-in workspace documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    pub agent: AgentCtx,
    /// ISO date (`YYYY-MM-DD`), set only for daily notes.
    pub date: Option<String>,
}

/// Agent identity as seen by templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCtx {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub role: String,
}

impl TemplateContext {
    /// Build a context for `agent`, whose slug has already been validated.
    pub fn from_agent(agent: &AgentProfile, slug: &Slug) -> Self {
        TemplateContext {
            agent: AgentCtx {
                id: agent.id.clone(),
                name: agent.name.clone(),
                slug: slug.to_string(),
                role: agent.role.trim().to_string(),
            },
            date: None,
        }
    }

    /// Copy of this context scoped to one calendar date.
    pub fn with_date(&self, date: NaiveDate) -> Self {
        let mut ctx = self.clone();
        ctx.date = Some(date.format("%Y-%m-%d").to_string());
        ctx
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
