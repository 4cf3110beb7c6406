//! Season aggregation.
//!
//! Rolls per-game recompute results into season totals, the schedule,
//! category leaders and per-game detail breakdowns. Every per-game figure
//! is derived independently from that game's play log; nothing is carried
//! over between games. The serde shape of [`SeasonSummary`] is the
//! contract consumed by the external report generator, so field names and
//! nesting stay stable.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::game::{Game, GameOutcome};
use crate::models::season::Season;
use crate::stats::{GameSnapshot, PlayerStats};

/// One row of the schedule, sorted by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub game_id: String,
    pub date: DateTime<Utc>,
    pub opponent: String,
    pub home_score: u16,
    pub opp_score: u16,
    pub outcome: GameOutcome,
}

/// Rates derived from season totals at read time; never stored as
/// independent state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DerivedRates {
    pub completion_pct: f64,
    pub passer_rating: f64,
    pub yards_per_carry: f64,
    pub yards_per_reception: f64,
    pub field_goal_pct: f64,
}

impl DerivedRates {
    fn from_totals(totals: &PlayerStats) -> Self {
        Self {
            completion_pct: totals.completion_pct(),
            passer_rating: totals.passer_rating(),
            yards_per_carry: totals.yards_per_carry(),
            yards_per_reception: totals.yards_per_reception(),
            field_goal_pct: totals.field_goal_pct(),
        }
    }
}

/// Season totals for one rostered player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSeasonLine {
    pub player_id: String,
    pub name: String,
    pub jersey: u8,
    pub position: String,
    pub games_played: u32,
    pub totals: PlayerStats,
    pub rates: DerivedRates,
}

/// Season team totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamSeasonTotals {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub total_yards: i32,
    pub rush_yards: i32,
    pub pass_yards: i32,
    pub turnovers: u32,
}

/// Stat categories a season leader is published for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum LeaderCategory {
    RushingYards,
    PassingYards,
    ReceivingYards,
    Tackles,
    Sacks,
    Interceptions,
    Points,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 7] = [
        LeaderCategory::RushingYards,
        LeaderCategory::PassingYards,
        LeaderCategory::ReceivingYards,
        LeaderCategory::Tackles,
        LeaderCategory::Sacks,
        LeaderCategory::Interceptions,
        LeaderCategory::Points,
    ];

    fn value(self, totals: &PlayerStats) -> f64 {
        match self {
            LeaderCategory::RushingYards => totals.rush_yards as f64,
            LeaderCategory::PassingYards => totals.pass_yards as f64,
            LeaderCategory::ReceivingYards => totals.receiving_yards as f64,
            LeaderCategory::Tackles => f64::from(totals.tackles),
            LeaderCategory::Sacks => f64::from(totals.sacks),
            LeaderCategory::Interceptions => f64::from(totals.interceptions),
            LeaderCategory::Points => f64::from(totals.points),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderEntry {
    pub category: LeaderCategory,
    pub player_id: String,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RushingLine {
    pub player_id: String,
    pub name: String,
    pub attempts: u32,
    pub yards: i32,
    pub average: f64,
    pub longest: i32,
    pub touchdowns: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassingLine {
    pub player_id: String,
    pub name: String,
    pub completions: u32,
    pub attempts: u32,
    pub yards: i32,
    pub touchdowns: u32,
    pub interceptions: u32,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceivingLine {
    pub player_id: String,
    pub name: String,
    pub receptions: u32,
    pub yards: i32,
    pub average: f64,
    pub touchdowns: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefenseLine {
    pub player_id: String,
    pub name: String,
    pub tackles: f32,
    pub tackles_for_loss: u32,
    pub sacks: u32,
    pub interceptions: u32,
    pub forced_fumbles: u32,
    pub fumbles_recovered: u32,
    pub passes_defensed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KickingLine {
    pub player_id: String,
    pub name: String,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub extra_points_made: u32,
    pub extra_points_attempted: u32,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringLine {
    pub player_id: String,
    pub name: String,
    pub points: u32,
}

/// Category tables for one game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameBreakdown {
    pub rushing: Vec<RushingLine>,
    pub passing: Vec<PassingLine>,
    pub receiving: Vec<ReceivingLine>,
    pub defense: Vec<DefenseLine>,
    pub kicking: Vec<KickingLine>,
    pub scoring: Vec<ScoringLine>,
}

/// Everything the reports need about a single game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameDetail {
    pub game_id: String,
    pub date: DateTime<Utc>,
    pub opponent: String,
    pub home_score: u16,
    pub opp_score: u16,
    pub outcome: GameOutcome,
    /// Per-player stat lines for this game only.
    pub player_stats: BTreeMap<String, PlayerStats>,
    pub breakdown: GameBreakdown,
}

/// The full report contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonSummary {
    pub year: u16,
    pub team_name: String,
    pub schedule: Vec<ScheduleEntry>,
    pub team: TeamSeasonTotals,
    /// Roster order, which is also the leader tie-break order.
    pub players: Vec<PlayerSeasonLine>,
    pub leaders: Vec<LeaderEntry>,
    pub game_details: Vec<GameDetail>,
}

/// Eligibility knobs for category leaders.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderOptions {
    /// Minimum games played to qualify; 0 disables the threshold.
    pub min_games: u32,
}

/// Roll a season's games into the full report shape.
pub fn summarize_season(season: &Season) -> SeasonSummary {
    summarize_season_with(season, LeaderOptions::default())
}

pub fn summarize_season_with(season: &Season, options: LeaderOptions) -> SeasonSummary {
    let mut games: Vec<&Game> = season.games.iter().collect();
    games.sort_by_key(|game| game.date);

    let names = name_index(season);
    let mut schedule = Vec::new();
    let mut game_details = Vec::new();
    let mut team = TeamSeasonTotals::default();
    let mut totals: BTreeMap<String, PlayerStats> = BTreeMap::new();
    let mut games_played: HashMap<String, u32> = HashMap::new();

    for game in &games {
        // Always re-derive from the log; stored scores may predate an edit.
        let snapshot = game.snapshot();
        let outcome = outcome_of(&snapshot);

        schedule.push(ScheduleEntry {
            game_id: game.id.clone(),
            date: game.date,
            opponent: game.opponent.clone(),
            home_score: snapshot.home_score,
            opp_score: snapshot.opp_score,
            outcome,
        });

        match outcome {
            GameOutcome::Win => team.wins += 1,
            GameOutcome::Loss => team.losses += 1,
            GameOutcome::Tie => team.ties += 1,
        }
        team.points_for += u32::from(snapshot.home_score);
        team.points_against += u32::from(snapshot.opp_score);
        team.total_yards += snapshot.home_team.total_yards;
        team.rush_yards += snapshot.home_team.rush_yards;
        team.pass_yards += snapshot.home_team.pass_yards;
        team.turnovers += snapshot.home_team.turnovers;

        for (player_id, stats) in &snapshot.player_stats {
            totals.entry(player_id.clone()).or_default().merge(stats);
        }
        for player_id in participants_of(game) {
            *games_played.entry(player_id).or_insert(0) += 1;
        }

        game_details.push(GameDetail {
            game_id: game.id.clone(),
            date: game.date,
            opponent: game.opponent.clone(),
            home_score: snapshot.home_score,
            opp_score: snapshot.opp_score,
            outcome,
            breakdown: breakdown_of(&snapshot, &names),
            player_stats: snapshot.player_stats,
        });
    }

    let players: Vec<PlayerSeasonLine> = season
        .roster
        .iter()
        .map(|player| {
            let player_totals = totals.get(&player.id).cloned().unwrap_or_default();
            PlayerSeasonLine {
                player_id: player.id.clone(),
                name: player.name.clone(),
                jersey: player.jersey,
                position: player.position.clone(),
                games_played: games_played.get(&player.id).copied().unwrap_or(0),
                rates: DerivedRates::from_totals(&player_totals),
                totals: player_totals,
            }
        })
        .collect();

    let leaders = leaders_of(&players, options);

    SeasonSummary {
        year: season.year,
        team_name: season.team_name.clone(),
        schedule,
        team,
        players,
        leaders,
        game_details,
    }
}

fn outcome_of(snapshot: &GameSnapshot) -> GameOutcome {
    match snapshot.home_score.cmp(&snapshot.opp_score) {
        std::cmp::Ordering::Greater => GameOutcome::Win,
        std::cmp::Ordering::Less => GameOutcome::Loss,
        std::cmp::Ordering::Equal => GameOutcome::Tie,
    }
}

/// Every player a game's log references as a participant, once each.
fn participants_of(game: &Game) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for play in &game.plays {
        for participant in &play.participants {
            if seen.insert(participant.player_id.clone()) {
                ids.push(participant.player_id.clone());
            }
        }
    }
    ids
}

fn name_index(season: &Season) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for player in &season.roster {
        names.insert(player.id.clone(), player.name.clone());
    }
    for game in &season.games {
        for player in game.home_roster.iter().chain(&game.away_roster) {
            names.entry(player.id.clone()).or_insert_with(|| player.name.clone());
        }
    }
    names
}

fn display_name(names: &HashMap<String, String>, player_id: &str) -> String {
    names.get(player_id).cloned().unwrap_or_else(|| player_id.to_string())
}

/// Category leaders: linear scan in roster order, value must be positive,
/// optional minimum-games threshold. A strict `>` comparison means the
/// first eligible player in roster order wins ties, which is the
/// documented deterministic tie-break.
fn leaders_of(players: &[PlayerSeasonLine], options: LeaderOptions) -> Vec<LeaderEntry> {
    let mut leaders = Vec::new();
    for category in LeaderCategory::ALL {
        let mut best: Option<&PlayerSeasonLine> = None;
        let mut best_value = 0.0;
        for player in players {
            if options.min_games > 0 && player.games_played < options.min_games {
                continue;
            }
            let value = category.value(&player.totals);
            if value > 0.0 && value > best_value {
                best = Some(player);
                best_value = value;
            }
        }
        if let Some(player) = best {
            leaders.push(LeaderEntry {
                category,
                player_id: player.player_id.clone(),
                name: player.name.clone(),
                value: best_value,
            });
        }
    }
    leaders
}

/// Per-category tables for one game, derived from its snapshot alone.
fn breakdown_of(snapshot: &GameSnapshot, names: &HashMap<String, String>) -> GameBreakdown {
    let mut breakdown = GameBreakdown::default();
    for (player_id, stats) in &snapshot.player_stats {
        let name = display_name(names, player_id);
        if stats.rush_attempts > 0 {
            breakdown.rushing.push(RushingLine {
                player_id: player_id.clone(),
                name: name.clone(),
                attempts: stats.rush_attempts,
                yards: stats.rush_yards,
                average: stats.yards_per_carry(),
                longest: stats.rush_longest,
                touchdowns: stats.rush_touchdowns,
            });
        }
        if stats.pass_attempts > 0 {
            breakdown.passing.push(PassingLine {
                player_id: player_id.clone(),
                name: name.clone(),
                completions: stats.pass_completions,
                attempts: stats.pass_attempts,
                yards: stats.pass_yards,
                touchdowns: stats.pass_touchdowns,
                interceptions: stats.pass_interceptions,
                rating: stats.passer_rating(),
            });
        }
        if stats.receptions > 0 {
            breakdown.receiving.push(ReceivingLine {
                player_id: player_id.clone(),
                name: name.clone(),
                receptions: stats.receptions,
                yards: stats.receiving_yards,
                average: stats.yards_per_reception(),
                touchdowns: stats.receiving_touchdowns,
            });
        }
        if stats.tackles > 0.0
            || stats.sacks > 0
            || stats.interceptions > 0
            || stats.forced_fumbles > 0
            || stats.fumbles_recovered > 0
            || stats.passes_defensed > 0
        {
            breakdown.defense.push(DefenseLine {
                player_id: player_id.clone(),
                name: name.clone(),
                tackles: stats.tackles,
                tackles_for_loss: stats.tackles_for_loss,
                sacks: stats.sacks,
                interceptions: stats.interceptions,
                forced_fumbles: stats.forced_fumbles,
                fumbles_recovered: stats.fumbles_recovered,
                passes_defensed: stats.passes_defensed,
            });
        }
        if stats.field_goals_attempted > 0 || stats.extra_points_attempted > 0 {
            breakdown.kicking.push(KickingLine {
                player_id: player_id.clone(),
                name: name.clone(),
                field_goals_made: stats.field_goals_made,
                field_goals_attempted: stats.field_goals_attempted,
                extra_points_made: stats.extra_points_made,
                extra_points_attempted: stats.extra_points_attempted,
                points: stats.field_goals_made * 3 + stats.extra_points_made,
            });
        }
        if stats.points > 0 {
            breakdown.scoring.push(ScoringLine {
                player_id: player_id.clone(),
                name,
                points: stats.points,
            });
        }
    }
    breakdown
}
