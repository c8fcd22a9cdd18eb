//! Tera rendering engine: [`DocKind`] enum and [`Renderer`].
//!
//! # Path mapping (relative to the agent directory)
//!
//! | Doc          | Output path             | Policy       |
//! |--------------|-------------------------|--------------|
//! | AgentsGuide  | `AGENTS.md`             | upsert       |
//! | Memory       | `MEMORY.md`             | create once  |
//! | Working      | `memory/WORKING.md`     | create once  |
//! | DailyNote    | `memory/YYYY-MM-DD.md`  | create once  |

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tera::Tera;

use crate::context::TemplateContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("agents.md.tera", include_str!("templates/agents.md.tera")),
    ("memory.md.tera", include_str!("templates/memory.md.tera")),
    ("working.md.tera", include_str!("templates/working.md.tera")),
    ("daily_note.md.tera", include_str!("templates/daily_note.md.tera")),
];

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// DocKind
// ---------------------------------------------------------------------------

/// Built-in documents placed in every agent workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKind {
    /// Operating manual; replaced by a caller override when one is supplied.
    AgentsGuide,
    Memory,
    Working,
    DailyNote(NaiveDate),
}

impl DocKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            DocKind::AgentsGuide => "agents.md.tera",
            DocKind::Memory => "memory.md.tera",
            DocKind::Working => "working.md.tera",
            DocKind::DailyNote(_) => "daily_note.md.tera",
        }
    }

    /// Output path under `agent_dir`.
    pub fn output_path(&self, agent_dir: &Path) -> PathBuf {
        match self {
            DocKind::AgentsGuide => agent_dir.join("AGENTS.md"),
            DocKind::Memory => agent_dir.join("MEMORY.md"),
            DocKind::Working => agent_dir.join("memory").join("WORKING.md"),
            DocKind::DailyNote(date) => agent_dir
                .join("memory")
                .join(format!("{}.md", date.format("%Y-%m-%d"))),
        }
    }

    /// Scaffold documents are written once and never overwritten.
    pub fn is_scaffold(&self) -> bool {
        !matches!(self, DocKind::AgentsGuide)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for the built-in documents.
///
/// Uses embedded templates only. Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { tera: build_tera()? })
    }

    /// Render `doc` for the agent described by `ctx`.
    ///
    /// Daily notes get their date injected into the context.
    pub fn render(&self, ctx: &TemplateContext, doc: DocKind) -> Result<String, RenderError> {
        let tera_ctx = match doc {
            DocKind::DailyNote(date) => ctx.with_date(date).to_tera_context()?,
            _ => ctx.to_tera_context()?,
        };
        let rendered = self.tera.render(doc.template_name(), &tera_ctx)?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crew_core::{validate_slug, AgentProfile};

    fn make_ctx(role: &str) -> TemplateContext {
        let agent = AgentProfile {
            id: "a1".into(),
            name: "Research Bot".into(),
            slug: "research".into(),
            role: role.into(),
            openclaw_config: None,
            soul_content: String::new(),
            user_content: String::new(),
            identity_content: String::new(),
            skills: vec![],
        };
        let slug = validate_slug(&agent.slug).unwrap();
        TemplateContext::from_agent(&agent, &slug)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn all_docs_render_agent_name() {
        let renderer = Renderer::new().unwrap();
        let ctx = make_ctx("Digs up sources");
        for doc in [DocKind::AgentsGuide, DocKind::Memory, DocKind::Working] {
            let content = renderer
                .render(&ctx, doc)
                .unwrap_or_else(|e| panic!("render failed for {doc:?}: {e}"));
            assert!(content.contains("Research Bot"), "{doc:?} should name the agent");
        }
    }

    #[test]
    fn agents_guide_documents_workflow() {
        let renderer = Renderer::new().unwrap();
        let content = renderer
            .render(&make_ctx("Digs up sources"), DocKind::AgentsGuide)
            .unwrap();
        assert!(content.contains("Role: Digs up sources"));
        for needle in ["in_progress", "blocked", "review", "Evidence", "deliverables/"] {
            assert!(content.contains(needle), "AGENTS.md should mention {needle}");
        }
    }

    #[test]
    fn empty_role_line_is_omitted() {
        let renderer = Renderer::new().unwrap();
        let content = renderer.render(&make_ctx(""), DocKind::AgentsGuide).unwrap();
        assert!(!content.contains("Role:"));
    }

    #[test]
    fn daily_note_is_titled_with_its_date() {
        let renderer = Renderer::new().unwrap();
        let content = renderer.render(&make_ctx(""), DocKind::DailyNote(date())).unwrap();
        assert!(content.starts_with("# 2026-01-31"));
    }

    #[test]
    fn output_paths_are_correct() {
        let root = PathBuf::from("/ws/research");
        assert_eq!(DocKind::AgentsGuide.output_path(&root), root.join("AGENTS.md"));
        assert_eq!(DocKind::Memory.output_path(&root), root.join("MEMORY.md"));
        assert_eq!(
            DocKind::Working.output_path(&root),
            root.join("memory").join("WORKING.md")
        );
        assert_eq!(
            DocKind::DailyNote(date()).output_path(&root),
            root.join("memory").join("2026-01-31.md")
        );
    }

    #[test]
    fn only_agents_guide_is_upserted() {
        assert!(!DocKind::AgentsGuide.is_scaffold());
        assert!(DocKind::Memory.is_scaffold());
        assert!(DocKind::Working.is_scaffold());
        assert!(DocKind::DailyNote(date()).is_scaffold());
    }
}
