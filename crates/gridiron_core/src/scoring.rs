//! Score engine: one table, one evaluation point.
//!
//! Every scoring rule lives in [`score_delta`]; the timeline and final
//! score are prefix sums over it, so `score_timeline(plays)` always ends
//! at the sum of the individual deltas.

use serde::{Deserialize, Serialize};

use crate::models::play::{Play, PlayType, TeamSide};

/// Points awarded to each side by a single play.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreDelta {
    pub home: u16,
    pub opp: u16,
}

/// Cumulative score at some point in the game.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub home: u16,
    pub opp: u16,
}

fn award(side: TeamSide, points: u16) -> ScoreDelta {
    match side {
        TeamSide::Home => ScoreDelta { home: points, opp: 0 },
        TeamSide::Away => ScoreDelta { home: 0, opp: points },
    }
}

/// Score effect of one play.
pub fn score_delta(play: &Play) -> ScoreDelta {
    match play.play_type {
        PlayType::RushTouchdown | PlayType::PassTouchdown => award(play.team_side, 6),
        PlayType::FieldGoalMade => award(play.team_side, 3),
        PlayType::ExtraPointMade => award(play.team_side, 1),
        PlayType::TwoPointMade => award(play.team_side, 2),
        // A safety is scored against the team that snapped the ball.
        PlayType::Safety => award(play.team_side.opponent(), 2),
        PlayType::Rush
        | PlayType::PassComplete
        | PlayType::PassIncomplete
        | PlayType::Reception
        | PlayType::Tackle
        | PlayType::TackleForLoss
        | PlayType::Sack
        | PlayType::Interception
        | PlayType::FumbleRecovery
        | PlayType::PassDefensed
        | PlayType::ForcedFumble
        | PlayType::FieldGoalMissed
        | PlayType::ExtraPointMissed
        | PlayType::TwoPointFailed
        | PlayType::Kickoff
        | PlayType::KickoffReturn
        | PlayType::Punt
        | PlayType::PuntReturn
        | PlayType::Penalty
        | PlayType::Timeout
        | PlayType::Other => ScoreDelta::default(),
    }
}

/// Running cumulative score after each play (used for "score at time of
/// play" displays).
pub fn score_timeline(plays: &[Play]) -> Vec<Score> {
    let mut running = Score::default();
    plays
        .iter()
        .map(|play| {
            let delta = score_delta(play);
            running.home += delta.home;
            running.opp += delta.opp;
            running
        })
        .collect()
}

/// Final score of the log; zero for an empty log.
pub fn final_score(plays: &[Play]) -> Score {
    score_timeline(plays).last().copied().unwrap_or_default()
}
