//! # gridiron_core - Football Scorekeeping Rules & Aggregation Engine
//!
//! Records discrete plays of a football game and derives, from the ordered
//! play log alone, the running score, the live drive state and per-game /
//! per-season player and team statistics.
//!
//! ## Design
//! - The play log is the single source of truth: every mutation triggers a
//!   full, pure, idempotent recompute (`O(plays)`, play counts are small)
//! - One drive state machine with an explicit pending-action union, not
//!   scattered flags
//! - Legacy record shapes are normalized once, at the `normalize` boundary
//! - Deterministic: identical ordered play lists always recompute to
//!   identical snapshots

pub mod api;
pub mod drive;
pub mod error;
pub mod models;
pub mod normalize;
pub mod scoring;
pub mod season;
pub mod stats;
pub mod store;

pub use api::{recompute_game_json, season_summary_json};
pub use drive::{DriveEvent, DriveInput, DriveState, PendingAction};
pub use error::{GameError, Result};
pub use models::{
    Game, GameOutcome, ParticipantRole, Play, PlayParticipant, PlayType, Player, Season,
    TeamSide, NO_ATTRIBUTION,
};
pub use normalize::{infer_play_type, normalize_play, normalize_plays};
pub use scoring::{final_score, score_delta, score_timeline, Score, ScoreDelta};
pub use season::{summarize_season, summarize_season_with, LeaderOptions, SeasonSummary};
pub use stats::{recompute_game, GameSnapshot, PlayerStats, TeamStats};
pub use store::{GameLog, GameRepository, MemoryRepository};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
