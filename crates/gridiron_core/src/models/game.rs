use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::drive::DriveState;
use crate::models::play::Play;
use crate::models::player::Player;
use crate::stats::{recompute_game, GameSnapshot};

/// Win/loss/tie from the scorekeeping team's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Win,
    Loss,
    Tie,
}

/// One game: the ordered play log plus everything derived from it.
///
/// `home_score` and `opp_score` are never hand-set; they are overwritten
/// by [`Game::recompute`] after every log mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: String,
    pub date: DateTime<Utc>,
    pub opponent: String,
    /// Ordered play log; appended, edited or removed, never reordered.
    pub plays: Vec<Play>,
    pub home_score: u16,
    pub opp_score: u16,
    pub home_roster: Vec<Player>,
    pub away_roster: Vec<Player>,
    pub drive: DriveState,
}

impl Game {
    pub fn new(opponent: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            opponent: opponent.into(),
            plays: Vec::new(),
            home_score: 0,
            opp_score: 0,
            home_roster: Vec::new(),
            away_roster: Vec::new(),
            drive: DriveState::new(),
        }
    }

    pub fn with_rosters(mut self, home: Vec<Player>, away: Vec<Player>) -> Self {
        self.home_roster = home;
        self.away_roster = away;
        self
    }

    /// Pure snapshot of the current log; does not touch `self`.
    pub fn snapshot(&self) -> GameSnapshot {
        recompute_game(&self.plays, &self.home_roster, &self.away_roster)
    }

    /// Full recompute: refresh the derived scores and wholly replace every
    /// rostered player's stats bucket from the snapshot.
    pub fn recompute(&mut self) -> GameSnapshot {
        let snapshot = self.snapshot();
        self.home_score = snapshot.home_score;
        self.opp_score = snapshot.opp_score;
        for player in self.home_roster.iter_mut().chain(self.away_roster.iter_mut()) {
            player.stats =
                Some(snapshot.player_stats.get(&player.id).cloned().unwrap_or_default());
        }
        snapshot
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.home_score.cmp(&self.opp_score) {
            std::cmp::Ordering::Greater => GameOutcome::Win,
            std::cmp::Ordering::Less => GameOutcome::Loss,
            std::cmp::Ordering::Equal => GameOutcome::Tie,
        }
    }
}
