use serde::{Deserialize, Serialize};

use crate::models::game::Game;
use crate::models::player::Player;

/// A season: the roster plus the ordered collection of games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub year: u16,
    pub team_name: String,
    /// Roster in depth-chart order. This ordering is the documented
    /// tie-break for season category leaders.
    pub roster: Vec<Player>,
    pub games: Vec<Game>,
}

impl Season {
    pub fn new(year: u16, team_name: impl Into<String>) -> Self {
        Self {
            year,
            team_name: team_name.into(),
            roster: Vec::new(),
            games: Vec::new(),
        }
    }
}
