//! crew core library: domain types, slug rules, model mapping, roster loading.
//!
//! - [`types`]: agent records and [`SyncOptions`]
//! - [`slug`]: [`validate_slug`] for path-segment identifiers
//! - [`model`]: [`map_model`] and [`GatewayConfig`]
//! - [`roster`]: load agent records from YAML/JSON
//! - [`error`]: [`ProfileError`]

pub mod error;
pub mod model;
pub mod roster;
pub mod slug;
pub mod types;

pub use error::ProfileError;
pub use model::{map_model, GatewayConfig, GatewaySource};
pub use slug::{validate_slug, SlugError};
pub use types::{AgentProfile, ResolvedSkill, RuntimeOverrides, Slug, SyncOptions};
