//! # crew-renderer
//!
//! Built-in agent workspace documents and `SKILL.md` frontmatter handling.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use crew_core::{validate_slug, AgentProfile};
//! use crew_renderer::{DocKind, Renderer, TemplateContext};
//!
//! fn render_guide(agent: &AgentProfile) {
//!     let Ok(slug) = validate_slug(&agent.slug) else { return };
//!     if let Ok(renderer) = Renderer::new() {
//!         let ctx = TemplateContext::from_agent(agent, &slug);
//!         if let Ok(content) = renderer.render(&ctx, DocKind::AgentsGuide) {
//!             let path = DocKind::AgentsGuide.output_path(Path::new("/ws").join(slug.as_str()).as_path());
//!             println!("{}: {} bytes", path.display(), content.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod frontmatter;

pub use context::TemplateContext;
pub use engine::{DocKind, Renderer};
pub use error::RenderError;
pub use frontmatter::{ensure_frontmatter, frontmatter_name};
