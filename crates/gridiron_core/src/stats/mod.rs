//! Per-game stat accumulation.
//!
//! [`recompute_game`] is pure, deterministic and idempotent: it always
//! rebuilds every bucket from the full ordered play log, so historical
//! edits and deletes can never leave stale residual counters behind.

pub mod rates;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::play::{ParticipantRole, Play, PlayType, TeamSide, NO_ATTRIBUTION};
use crate::models::player::Player;
use crate::scoring;

/// Per-player stat bucket. Wholly replaced on every recompute; no other
/// component writes these fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerStats {
    // Rushing
    pub rush_attempts: u32,
    pub rush_yards: i32,
    pub rush_longest: i32,
    pub rush_touchdowns: u32,
    // Passing
    pub pass_attempts: u32,
    pub pass_completions: u32,
    pub pass_yards: i32,
    pub pass_longest: i32,
    pub pass_touchdowns: u32,
    pub pass_interceptions: u32,
    // Receiving
    pub receptions: u32,
    pub receiving_yards: i32,
    pub receiving_longest: i32,
    pub receiving_touchdowns: u32,
    // Defense
    pub tackles: f32,
    pub tackles_for_loss: u32,
    pub sacks: u32,
    pub interceptions: u32,
    pub interception_return_yards: i32,
    pub fumbles_recovered: u32,
    pub forced_fumbles: u32,
    pub passes_defensed: u32,
    // Kicking
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub extra_points_made: u32,
    pub extra_points_attempted: u32,
    // Returns
    pub kick_returns: u32,
    pub kick_return_yards: i32,
    pub punt_returns: u32,
    pub punt_return_yards: i32,
    // Scoring
    pub points: u32,
}

impl PlayerStats {
    /// True when every counter is still at its zero value.
    pub fn is_empty(&self) -> bool {
        *self == PlayerStats::default()
    }

    /// Fold another bucket into this one (used for season totals).
    pub fn merge(&mut self, other: &PlayerStats) {
        self.rush_attempts += other.rush_attempts;
        self.rush_yards += other.rush_yards;
        self.rush_longest = self.rush_longest.max(other.rush_longest);
        self.rush_touchdowns += other.rush_touchdowns;
        self.pass_attempts += other.pass_attempts;
        self.pass_completions += other.pass_completions;
        self.pass_yards += other.pass_yards;
        self.pass_longest = self.pass_longest.max(other.pass_longest);
        self.pass_touchdowns += other.pass_touchdowns;
        self.pass_interceptions += other.pass_interceptions;
        self.receptions += other.receptions;
        self.receiving_yards += other.receiving_yards;
        self.receiving_longest = self.receiving_longest.max(other.receiving_longest);
        self.receiving_touchdowns += other.receiving_touchdowns;
        self.tackles += other.tackles;
        self.tackles_for_loss += other.tackles_for_loss;
        self.sacks += other.sacks;
        self.interceptions += other.interceptions;
        self.interception_return_yards += other.interception_return_yards;
        self.fumbles_recovered += other.fumbles_recovered;
        self.forced_fumbles += other.forced_fumbles;
        self.passes_defensed += other.passes_defensed;
        self.field_goals_made += other.field_goals_made;
        self.field_goals_attempted += other.field_goals_attempted;
        self.extra_points_made += other.extra_points_made;
        self.extra_points_attempted += other.extra_points_attempted;
        self.kick_returns += other.kick_returns;
        self.kick_return_yards += other.kick_return_yards;
        self.punt_returns += other.punt_returns;
        self.punt_return_yards += other.punt_return_yards;
        self.points += other.points;
    }

    pub fn completion_pct(&self) -> f64 {
        rates::pct(self.pass_completions as f64, self.pass_attempts as f64)
    }

    pub fn passer_rating(&self) -> f64 {
        rates::passer_rating(
            self.pass_completions,
            self.pass_attempts,
            self.pass_yards,
            self.pass_touchdowns,
            self.pass_interceptions,
        )
    }

    pub fn yards_per_carry(&self) -> f64 {
        rates::ratio(self.rush_yards as f64, self.rush_attempts as f64)
    }

    pub fn yards_per_reception(&self) -> f64 {
        rates::ratio(self.receiving_yards as f64, self.receptions as f64)
    }

    pub fn field_goal_pct(&self) -> f64 {
        rates::pct(self.field_goals_made as f64, self.field_goals_attempted as f64)
    }
}

/// Team-level totals for one side of a game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    pub points_for: u16,
    pub points_against: u16,
    pub rush_yards: i32,
    pub pass_yards: i32,
    pub total_yards: i32,
    pub turnovers: u32,
    pub penalties: u32,
    pub penalty_yards: i32,
}

/// Immutable result of one full recompute over a game's play log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub home_score: u16,
    pub opp_score: u16,
    /// Buckets keyed by player id; ordered map so identical logs always
    /// serialize identically.
    pub player_stats: BTreeMap<String, PlayerStats>,
    pub home_team: TeamStats,
    pub away_team: TeamStats,
}

/// Rebuild scores and every stat bucket from the ordered play log.
///
/// Total over any syntactically valid log: an empty log yields a zeroed
/// snapshot with a default bucket for every rostered player.
pub fn recompute_game(
    plays: &[Play],
    home_roster: &[Player],
    away_roster: &[Player],
) -> GameSnapshot {
    let mut snapshot = GameSnapshot::default();

    for player in home_roster.iter().chain(away_roster) {
        snapshot.player_stats.insert(player.id.clone(), PlayerStats::default());
    }

    for play in plays {
        accumulate_play(&mut snapshot, play);
    }

    let score = scoring::final_score(plays);
    snapshot.home_score = score.home;
    snapshot.opp_score = score.opp;
    snapshot.home_team.points_for = score.home;
    snapshot.home_team.points_against = score.opp;
    snapshot.away_team.points_for = score.opp;
    snapshot.away_team.points_against = score.home;
    for side in [TeamSide::Home, TeamSide::Away] {
        let team = team_mut(&mut snapshot, side);
        team.total_yards = team.rush_yards + team.pass_yards;
    }

    snapshot
}

fn team_mut(snapshot: &mut GameSnapshot, side: TeamSide) -> &mut TeamStats {
    match side {
        TeamSide::Home => &mut snapshot.home_team,
        TeamSide::Away => &mut snapshot.away_team,
    }
}

/// Bucket lookup that silently excludes the no-attribution sentinel.
fn bucket<'a>(
    snapshot: &'a mut GameSnapshot,
    player_id: &str,
) -> Option<&'a mut PlayerStats> {
    if player_id == NO_ATTRIBUTION {
        return None;
    }
    Some(snapshot.player_stats.entry(player_id.to_string()).or_default())
}

fn credited<'a>(play: &'a Play, role: ParticipantRole) -> Option<&'a str> {
    play.participant_with_role(role)
        .or_else(|| play.participants.first())
        .map(|p| p.player_id.as_str())
}

/// Yards gained on an interception return, derived from the three-spot
/// model when both spots were recorded, otherwise from the play's yardage.
fn interception_return_yards(play: &Play) -> i32 {
    match (play.spot, play.return_spot) {
        (Some(spot), Some(end)) => (i32::from(spot) - i32::from(end)).abs(),
        _ => i32::from(play.yards),
    }
}

fn accumulate_play(snapshot: &mut GameSnapshot, play: &Play) {
    let yards = i32::from(play.yards);
    match play.play_type {
        PlayType::Rush | PlayType::RushTouchdown => {
            team_mut(snapshot, play.team_side).rush_yards += yards;
            if let Some(stats) = credited(play, ParticipantRole::Rusher)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.rush_attempts += 1;
                stats.rush_yards += yards;
                stats.rush_longest = stats.rush_longest.max(yards);
                if play.play_type == PlayType::RushTouchdown {
                    stats.rush_touchdowns += 1;
                    stats.points += 6;
                }
            }
        }
        PlayType::PassComplete | PlayType::PassTouchdown => {
            team_mut(snapshot, play.team_side).pass_yards += yards;
            let touchdown = play.play_type == PlayType::PassTouchdown;
            if let Some(stats) = play
                .participant_with_role(ParticipantRole::Passer)
                .map(|p| p.player_id.clone())
                .and_then(|id| bucket(snapshot, &id))
            {
                stats.pass_attempts += 1;
                stats.pass_completions += 1;
                stats.pass_yards += yards;
                stats.pass_longest = stats.pass_longest.max(yards);
                if touchdown {
                    stats.pass_touchdowns += 1;
                }
            }
            if let Some(stats) = play
                .participant_with_role(ParticipantRole::Receiver)
                .map(|p| p.player_id.clone())
                .and_then(|id| bucket(snapshot, &id))
            {
                stats.receptions += 1;
                stats.receiving_yards += yards;
                stats.receiving_longest = stats.receiving_longest.max(yards);
                if touchdown {
                    stats.receiving_touchdowns += 1;
                    stats.points += 6;
                }
            }
        }
        PlayType::PassIncomplete => {
            if let Some(stats) = credited(play, ParticipantRole::Passer)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.pass_attempts += 1;
            }
        }
        PlayType::Reception => {
            if let Some(stats) = credited(play, ParticipantRole::Receiver)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.receptions += 1;
                stats.receiving_yards += yards;
                stats.receiving_longest = stats.receiving_longest.max(yards);
            }
        }
        PlayType::Tackle | PlayType::TackleForLoss => {
            let for_loss = play.play_type == PlayType::TackleForLoss;
            let credits: Vec<(String, f32)> = play
                .tackle_credits()
                .into_iter()
                .map(|(id, credit)| (id.to_string(), credit))
                .collect();
            for (id, credit) in credits {
                if let Some(stats) = bucket(snapshot, &id) {
                    stats.tackles += credit;
                    if for_loss {
                        stats.tackles_for_loss += 1;
                    }
                }
            }
        }
        PlayType::Sack => {
            // Sack yardage counts against the offense's passing total.
            team_mut(snapshot, play.team_side).pass_yards += yards;
            let credits: Vec<(String, f32)> = play
                .tackle_credits()
                .into_iter()
                .map(|(id, credit)| (id.to_string(), credit))
                .collect();
            for (id, credit) in credits {
                if let Some(stats) = bucket(snapshot, &id) {
                    stats.sacks += 1;
                    stats.tackles += credit;
                }
            }
        }
        PlayType::Interception => {
            team_mut(snapshot, play.team_side).turnovers += 1;
            let return_yards = interception_return_yards(play);
            if let Some(stats) = play
                .participant_with_role(ParticipantRole::Interceptor)
                .map(|p| p.player_id.clone())
                .and_then(|id| bucket(snapshot, &id))
            {
                stats.interceptions += 1;
                stats.interception_return_yards += return_yards;
            }
            // Interceptions thrown are tracked separately, by role.
            if let Some(stats) = play
                .participant_with_role(ParticipantRole::Passer)
                .map(|p| p.player_id.clone())
                .and_then(|id| bucket(snapshot, &id))
            {
                stats.pass_attempts += 1;
                stats.pass_interceptions += 1;
            }
        }
        PlayType::FumbleRecovery => {
            team_mut(snapshot, play.team_side).turnovers += 1;
            if let Some(stats) = credited(play, ParticipantRole::Recoverer)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.fumbles_recovered += 1;
            }
        }
        PlayType::ForcedFumble => {
            if let Some(stats) = credited(play, ParticipantRole::Defender)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.forced_fumbles += 1;
            }
        }
        PlayType::PassDefensed => {
            if let Some(stats) = credited(play, ParticipantRole::Defender)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.passes_defensed += 1;
            }
        }
        PlayType::FieldGoalMade | PlayType::FieldGoalMissed => {
            let made = play.play_type == PlayType::FieldGoalMade;
            if let Some(stats) = credited(play, ParticipantRole::Kicker)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.field_goals_attempted += 1;
                if made {
                    stats.field_goals_made += 1;
                    stats.points += 3;
                }
            }
        }
        PlayType::ExtraPointMade | PlayType::ExtraPointMissed => {
            let made = play.play_type == PlayType::ExtraPointMade;
            if let Some(stats) = credited(play, ParticipantRole::Kicker)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.extra_points_attempted += 1;
                if made {
                    stats.extra_points_made += 1;
                    stats.points += 1;
                }
            }
        }
        PlayType::TwoPointMade => {
            if let Some(stats) = play
                .participants
                .first()
                .map(|p| p.player_id.clone())
                .and_then(|id| bucket(snapshot, &id))
            {
                stats.points += 2;
            }
        }
        PlayType::KickoffReturn => {
            if let Some(stats) = credited(play, ParticipantRole::Returner)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.kick_returns += 1;
                stats.kick_return_yards += yards;
            }
        }
        PlayType::PuntReturn => {
            if let Some(stats) = credited(play, ParticipantRole::Returner)
                .and_then(|id| bucket(snapshot, id))
            {
                stats.punt_returns += 1;
                stats.punt_return_yards += yards;
            }
        }
        PlayType::Penalty => {
            let team = team_mut(snapshot, play.team_side);
            team.penalties += 1;
            team.penalty_yards += yards;
        }
        // No stat effect: scoring is handled by the score engine, the
        // rest are drive bookkeeping or unclassifiable records.
        PlayType::TwoPointFailed
        | PlayType::Safety
        | PlayType::Kickoff
        | PlayType::Punt
        | PlayType::Timeout
        | PlayType::Other => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::play::PlayParticipant;

    fn roster(ids: &[&str]) -> Vec<Player> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Player::new(*id, format!("Player {id}"), i as u8 + 1, "ATH"))
            .collect()
    }

    #[test]
    fn empty_log_yields_zeroed_snapshot() {
        let snapshot = recompute_game(&[], &roster(&["a", "b"]), &[]);
        assert_eq!(snapshot.home_score, 0);
        assert_eq!(snapshot.opp_score, 0);
        assert!(snapshot.player_stats["a"].is_empty());
        assert!(snapshot.player_stats["b"].is_empty());
    }

    #[test]
    fn rush_touchdown_from_the_35_credits_65_yards() {
        let play = Play::new(PlayType::RushTouchdown, TeamSide::Home)
            .at(1, 10, 35)
            .with_yards(65)
            .with_participant("rb", ParticipantRole::Rusher);
        let snapshot = recompute_game(&[play], &roster(&["rb"]), &[]);
        assert_eq!(snapshot.home_score, 6);
        let stats = &snapshot.player_stats["rb"];
        assert_eq!(stats.rush_touchdowns, 1);
        assert_eq!(stats.rush_yards, 65);
        assert_eq!(stats.rush_longest, 65);
        assert_eq!(stats.points, 6);
    }

    #[test]
    fn interception_credits_defender_and_charges_passer() {
        let mut play = Play::new(PlayType::Interception, TeamSide::Home).at(2, 8, 40);
        play.spot = Some(40);
        play.return_spot = Some(10);
        play.participants.push(PlayParticipant::new("qb", ParticipantRole::Passer));
        play.participants.push(PlayParticipant::new("db", ParticipantRole::Interceptor));
        let snapshot = recompute_game(&[play], &roster(&["qb"]), &roster(&["db"]));
        assert_eq!(snapshot.player_stats["db"].interceptions, 1);
        assert_eq!(snapshot.player_stats["db"].interception_return_yards, 30);
        assert_eq!(snapshot.player_stats["qb"].pass_interceptions, 1);
        assert_eq!(snapshot.home_team.turnovers, 1);
    }

    #[test]
    fn shared_tackle_splits_credit_but_not_counts() {
        let play = Play::new(PlayType::TackleForLoss, TeamSide::Away)
            .with_yards(-3)
            .with_participant("lb1", ParticipantRole::Tackler)
            .with_participant("lb2", ParticipantRole::Tackler);
        let snapshot = recompute_game(&[play], &roster(&["lb1", "lb2"]), &[]);
        assert_eq!(snapshot.player_stats["lb1"].tackles, 0.5);
        assert_eq!(snapshot.player_stats["lb2"].tackles, 0.5);
        assert_eq!(snapshot.player_stats["lb1"].tackles_for_loss, 1);
        assert_eq!(snapshot.player_stats["lb2"].tackles_for_loss, 1);
    }

    #[test]
    fn sentinel_attribution_is_excluded_from_individual_buckets() {
        let play = Play::new(PlayType::Rush, TeamSide::Home)
            .with_yards(7)
            .with_participant(NO_ATTRIBUTION, ParticipantRole::Rusher);
        let snapshot = recompute_game(&[play], &roster(&["rb"]), &[]);
        assert!(!snapshot.player_stats.contains_key(NO_ATTRIBUTION));
        assert!(snapshot.player_stats["rb"].is_empty());
        // The team total still sees the yardage.
        assert_eq!(snapshot.home_team.rush_yards, 7);
    }

    #[test]
    fn field_goal_adds_three_regardless_of_distance() {
        for yard_line in [60, 75, 97] {
            let play = Play::new(PlayType::FieldGoalMade, TeamSide::Home)
                .at(4, 5, yard_line)
                .with_participant("k", ParticipantRole::Kicker);
            let snapshot = recompute_game(&[play], &roster(&["k"]), &[]);
            assert_eq!(snapshot.home_score, 3);
            assert_eq!(snapshot.opp_score, 0);
            assert_eq!(snapshot.player_stats["k"].field_goals_made, 1);
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let plays = vec![
            Play::new(PlayType::Rush, TeamSide::Home)
                .with_yards(12)
                .with_participant("rb", ParticipantRole::Rusher),
            Play::new(PlayType::PassComplete, TeamSide::Home)
                .with_yards(23)
                .with_participant("qb", ParticipantRole::Passer)
                .with_participant("wr", ParticipantRole::Receiver),
        ];
        let first = recompute_game(&plays, &roster(&["rb", "qb", "wr"]), &[]);
        let second = recompute_game(&plays, &roster(&["rb", "qb", "wr"]), &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn longest_never_decreases_across_the_log() {
        let plays = vec![
            Play::new(PlayType::Rush, TeamSide::Home)
                .with_yards(30)
                .with_participant("rb", ParticipantRole::Rusher),
            Play::new(PlayType::Rush, TeamSide::Home)
                .with_yards(-4)
                .with_participant("rb", ParticipantRole::Rusher),
        ];
        let snapshot = recompute_game(&plays, &roster(&["rb"]), &[]);
        assert_eq!(snapshot.player_stats["rb"].rush_longest, 30);
        assert_eq!(snapshot.player_stats["rb"].rush_yards, 26);
    }
}
