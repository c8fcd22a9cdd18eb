//! # crew-sync
//!
//! Hash-gated workspace materialization and runtime-config generation.
//!
//! Call [`reconcile`] with the current agent roster to bring every agent
//! workspace and the runtime config in line with it, or [`diff_at`] to see
//! what that would change without writing anything.

pub mod config;
pub mod diff;
pub mod error;
pub mod reconcile;
pub mod workspace;
pub mod writer;

pub use config::{build_config, render_config, RuntimeConfig};
pub use diff::{diff, diff_at, FileDiff};
pub use error::SyncError;
pub use reconcile::{reconcile, reconcile_at, ReconcileReport, SkippedAgent};
pub use workspace::{MaterializedAgent, SkipReason, SkippedSkill};
pub use writer::{content_hash, write_if_changed, WriteResult};
