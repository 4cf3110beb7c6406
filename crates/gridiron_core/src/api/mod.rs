pub mod json_api;

pub use json_api::{recompute_game_json, season_summary_json, RecomputeRequest, SeasonRequest};
