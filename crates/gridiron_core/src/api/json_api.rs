//! JSON boundary for embedding hosts.
//!
//! Requests carry a `schema_version` and may contain legacy-shaped plays;
//! everything is pushed through the `normalize` boundary before the core
//! sees it. Errors are returned as `CODE: message` strings.

use serde::Deserialize;

use crate::models::player::Player;
use crate::models::season::Season;
use crate::normalize::{normalize_plays, RawPlay};
use crate::season::{summarize_season_with, LeaderOptions};
use crate::stats::recompute_game;

pub mod error_codes {
    pub const INVALID_REQUEST: &str = "E_INVALID_REQUEST";
    pub const SCHEMA_VERSION: &str = "E_SCHEMA_VERSION";
    pub const SERIALIZE: &str = "E_SERIALIZE";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn check_schema(found: u8) -> Result<(), String> {
    if found == crate::SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(
            error_codes::SCHEMA_VERSION,
            format!("found {found}, expected {}", crate::SCHEMA_VERSION),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct RecomputeRequest {
    pub schema_version: u8,
    pub plays: Vec<RawPlay>,
    #[serde(default)]
    pub home_roster: Vec<Player>,
    #[serde(default)]
    pub away_roster: Vec<Player>,
}

/// Recompute a game snapshot from a (possibly legacy-shaped) play log.
pub fn recompute_game_json(input: &str) -> Result<String, String> {
    let request: RecomputeRequest =
        serde_json::from_str(input).map_err(|e| err_code(error_codes::INVALID_REQUEST, e))?;
    check_schema(request.schema_version)?;
    let plays = normalize_plays(request.plays);
    let snapshot = recompute_game(&plays, &request.home_roster, &request.away_roster);
    serde_json::to_string(&snapshot).map_err(|e| err_code(error_codes::SERIALIZE, e))
}

#[derive(Debug, Deserialize)]
pub struct SeasonRequest {
    pub schema_version: u8,
    pub season: Season,
    /// Minimum games played for leader eligibility; 0 disables it.
    #[serde(default)]
    pub min_games: u32,
}

/// Produce the full season report shape.
pub fn season_summary_json(input: &str) -> Result<String, String> {
    let request: SeasonRequest =
        serde_json::from_str(input).map_err(|e| err_code(error_codes::INVALID_REQUEST, e))?;
    check_schema(request.schema_version)?;
    let summary =
        summarize_season_with(&request.season, LeaderOptions { min_games: request.min_games });
    serde_json::to_string(&summary).map_err(|e| err_code(error_codes::SERIALIZE, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recompute_accepts_legacy_shaped_plays() {
        let request = json!({
            "schema_version": 1,
            "plays": [
                { "type": "rushing touchdown", "yards": 65, "participants": ["rb22"] },
                { "type": "extra_point_made", "team_side": "home", "participants": [
                    { "playerId": "k3", "role": "kicker" }
                ]},
            ],
            "home_roster": [
                { "id": "rb22", "name": "Avery Brooks", "jersey": 22, "position": "RB" },
                { "id": "k3", "name": "Casey Tran", "jersey": 3, "position": "K" },
            ],
        });
        let output = recompute_game_json(&request.to_string()).unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(snapshot["home_score"], 7);
        assert_eq!(snapshot["player_stats"]["rb22"]["rush_touchdowns"], 1);
        assert_eq!(snapshot["player_stats"]["k3"]["extra_points_made"], 1);
    }

    #[test]
    fn schema_mismatch_is_rejected_with_a_code() {
        let request = json!({ "schema_version": 9, "plays": [] });
        let error = recompute_game_json(&request.to_string()).unwrap_err();
        assert!(error.starts_with(error_codes::SCHEMA_VERSION), "{error}");
    }

    #[test]
    fn malformed_request_is_rejected_with_a_code() {
        let error = recompute_game_json("not json").unwrap_err();
        assert!(error.starts_with(error_codes::INVALID_REQUEST), "{error}");
    }

    #[test]
    fn season_summary_round_trips() {
        let request = json!({
            "schema_version": 1,
            "season": {
                "year": 2025,
                "team_name": "Hornets",
                "roster": [],
                "games": [],
            },
        });
        let output = season_summary_json(&request.to_string()).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(summary["year"], 2025);
        assert!(summary["schedule"].as_array().unwrap().is_empty());
    }
}
