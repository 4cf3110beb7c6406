use serde::{Deserialize, Serialize};

use crate::stats::PlayerStats;

/// Roster entry. Identity fields come from the roster collaborator and are
/// never altered by the core; the `stats` bucket is wholly owned by the
/// stat accumulator and replaced on every recompute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub jersey: u8,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stats: Option<PlayerStats>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, jersey: u8, position: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            jersey,
            position: position.into(),
            stats: None,
        }
    }
}
