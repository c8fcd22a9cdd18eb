//! Agent roster files.
//!
//! A roster is a YAML or JSON document holding the agent records for one
//! reconciliation pass. Two shapes are accepted:
//!
//! ```text
//! - id: a1            agents:
//!   slug: engineer      - id: a1
//!   ...                   slug: engineer
//! ```
//!
//! JSON parses through the same path since YAML is a superset.

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::ProfileError;
use crate::types::AgentProfile;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterCompat {
    Wrapped { agents: Vec<AgentProfile> },
    Bare(Vec<AgentProfile>),
}

/// Parse roster text. `path` is only used for error context.
pub fn parse_roster(path: &Path, contents: &str) -> Result<Vec<AgentProfile>, ProfileError> {
    if contents.trim().is_empty() {
        return Ok(vec![]);
    }
    match serde_yaml::from_str::<RosterCompat>(contents) {
        Ok(RosterCompat::Wrapped { agents }) => Ok(agents),
        Ok(RosterCompat::Bare(agents)) => Ok(agents),
        // Re-parse as the bare shape so the error carries line context
        // instead of serde's generic untagged-enum message.
        Err(_) => serde_yaml::from_str::<Vec<AgentProfile>>(contents).map_err(|e| {
            ProfileError::Parse {
                path: path.to_path_buf(),
                source: e,
            }
        }),
    }
}

/// Load a roster from `path`.
///
/// Returns `ProfileError::RosterNotFound` if absent,
/// `ProfileError::Parse` (with path + line context) if malformed.
pub fn load_roster_at(path: &Path) -> Result<Vec<AgentProfile>, ProfileError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ProfileError::RosterNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(ProfileError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_roster(path, &contents)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
