//! Wire-shape contracts for the report/export boundary.
//!
//! The external report generator consumes these serde shapes by field
//! name; these tests pin the names so a refactor cannot silently break
//! the contract.

use chrono::Utc;
use serde_json::Value;

use crate::models::game::Game;
use crate::models::play::{ParticipantRole, Play, PlayType, TeamSide};
use crate::models::player::Player;
use crate::models::season::Season;
use crate::season::summarize_season;

fn assert_keys(value: &Value, expected: &[&str]) {
    let keys: std::collections::BTreeSet<&str> =
        value.as_object().unwrap().keys().map(String::as_str).collect();
    let expected: std::collections::BTreeSet<&str> = expected.iter().copied().collect();
    assert_eq!(keys, expected);
}

#[test]
fn play_serializes_with_type_key_and_snake_case_code() {
    let play = Play::new(PlayType::PassComplete, TeamSide::Away)
        .with_yards(18)
        .with_participant("qb7", ParticipantRole::Passer);
    let value = serde_json::to_value(&play).unwrap();
    assert_eq!(value["type"], "pass_complete");
    assert_eq!(value["team_side"], "away");
    assert_eq!(value["participants"][0]["role"], "passer");
    // Optional fields stay off the wire when unset.
    assert!(value.get("return_spot").is_none());
}

#[test]
fn game_snapshot_shape_is_stable() {
    let mut game = Game::new("Rivals", Utc::now())
        .with_rosters(vec![Player::new("rb", "Back", 22, "RB")], Vec::new());
    game.plays.push(
        Play::new(PlayType::Rush, TeamSide::Home)
            .with_yards(9)
            .with_participant("rb", ParticipantRole::Rusher),
    );
    let value = serde_json::to_value(game.snapshot()).unwrap();
    for key in ["home_score", "opp_score", "player_stats", "home_team", "away_team"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    let bucket = &value["player_stats"]["rb"];
    for key in ["rush_attempts", "rush_yards", "rush_longest", "tackles", "points"] {
        assert!(bucket.get(key).is_some(), "missing bucket field {key}");
    }
}

#[test]
fn season_summary_shape_is_stable() {
    let mut season = Season::new(2025, "Hornets");
    season.roster.push(Player::new("rb", "Back", 22, "RB"));
    let mut game = Game::new("Rivals", Utc::now());
    game.plays.push(
        Play::new(PlayType::RushTouchdown, TeamSide::Home)
            .with_yards(10)
            .with_participant("rb", ParticipantRole::Rusher),
    );
    season.games.push(game);

    let value = serde_json::to_value(summarize_season(&season)).unwrap();
    assert_keys(
        &value,
        &["year", "team_name", "schedule", "team", "players", "leaders", "game_details"],
    );
    let entry = &value["schedule"][0];
    for key in ["game_id", "date", "opponent", "home_score", "opp_score", "outcome"] {
        assert!(entry.get(key).is_some(), "missing schedule field {key}");
    }
    let player = &value["players"][0];
    for key in ["player_id", "name", "jersey", "position", "games_played", "totals", "rates"] {
        assert!(player.get(key).is_some(), "missing player field {key}");
    }
    let detail = &value["game_details"][0];
    for key in ["breakdown", "player_stats", "outcome"] {
        assert!(detail.get(key).is_some(), "missing detail field {key}");
    }
    for key in ["rushing", "passing", "receiving", "defense", "kicking", "scoring"] {
        assert!(detail["breakdown"].get(key).is_some(), "missing table {key}");
    }
    assert_eq!(value["leaders"][0]["category"], "rushing_yards");
}

#[test]
fn player_stats_bucket_is_wholly_replaced_on_recompute() {
    let mut game = Game::new("Rivals", Utc::now())
        .with_rosters(vec![Player::new("rb", "Back", 22, "RB")], Vec::new());
    game.plays.push(
        Play::new(PlayType::Rush, TeamSide::Home)
            .with_yards(50)
            .with_participant("rb", ParticipantRole::Rusher),
    );
    game.recompute();
    assert_eq!(game.home_roster[0].stats.as_ref().unwrap().rush_yards, 50);

    // Deleting the play must leave no residual counters behind.
    game.plays.clear();
    game.recompute();
    assert!(game.home_roster[0].stats.as_ref().unwrap().is_empty());
}
