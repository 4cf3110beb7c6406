//! Ingestion boundary for legacy-shaped records.
//!
//! Older logs carry free-text play types, missing team sides and two
//! different roster-reference shapes. Everything loose is mapped onto the
//! canonical model here, once; the rest of the core only ever sees
//! [`Play`]. The keyword-matching fallback for free-text types lives in
//! [`infer_play_type`] and is not re-implemented anywhere else.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::models::play::{ParticipantRole, Play, PlayParticipant, PlayType, TeamSide};

/// Loosely-shaped play record as found in stored documents.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlay {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub play_type: RawPlayType,
    #[serde(default)]
    pub yards: i16,
    #[serde(default = "one")]
    pub quarter: u8,
    #[serde(default = "one")]
    pub down: u8,
    #[serde(default = "ten")]
    pub distance: u8,
    #[serde(default = "thirty_five", alias = "yardLine")]
    pub yard_line: u8,
    #[serde(default, alias = "teamSide")]
    pub team_side: Option<TeamSide>,
    #[serde(default)]
    pub participants: Vec<RawParticipant>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, alias = "clockRemaining")]
    pub clock_remaining: Option<u16>,
    #[serde(default)]
    pub spot: Option<u8>,
    #[serde(default, alias = "returnSpot")]
    pub return_spot: Option<u8>,
    #[serde(default)]
    pub note: Option<String>,
}

fn one() -> u8 {
    1
}
fn ten() -> u8 {
    10
}
fn thirty_five() -> u8 {
    35
}

/// Either a canonical code or legacy free text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPlayType {
    Code(PlayType),
    Text(String),
}

/// The two roster-reference shapes: a full participant object or a bare
/// player id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawParticipant {
    Object(RawParticipantObject),
    Id(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParticipantObject {
    #[serde(alias = "playerId")]
    pub player_id: String,
    #[serde(default)]
    pub role: Option<ParticipantRole>,
    #[serde(default)]
    pub credit: Option<f32>,
}

/// Best-effort classification of a legacy free-text play type.
///
/// Token checks only; returns `None` when no heuristic matches so the
/// caller can surface a diagnostic.
pub fn infer_play_type(text: &str) -> Option<PlayType> {
    let text = text.to_lowercase();
    let has = |token: &str| text.contains(token);
    let failed = has("miss") || has("fail") || has("no good");

    if has("timeout") || has("time out") {
        return Some(PlayType::Timeout);
    }
    if has("penalty") || has("flag") {
        return Some(PlayType::Penalty);
    }
    if has("safety") {
        return Some(PlayType::Safety);
    }
    if has("two point") || has("two-point") || has("2pt") || has("2 pt") {
        return Some(if failed { PlayType::TwoPointFailed } else { PlayType::TwoPointMade });
    }
    if has("extra point") || has("pat") {
        return Some(if failed { PlayType::ExtraPointMissed } else { PlayType::ExtraPointMade });
    }
    if has("field goal") || has("fg") {
        return Some(if failed { PlayType::FieldGoalMissed } else { PlayType::FieldGoalMade });
    }
    if has("kickoff") || has("kick off") {
        return Some(if has("return") { PlayType::KickoffReturn } else { PlayType::Kickoff });
    }
    if has("punt") {
        return Some(if has("return") { PlayType::PuntReturn } else { PlayType::Punt });
    }
    if has("sack") {
        return Some(PlayType::Sack);
    }
    if has("intercept") {
        return Some(PlayType::Interception);
    }
    if has("fumble") {
        return Some(if has("forc") { PlayType::ForcedFumble } else { PlayType::FumbleRecovery });
    }
    if has("defensed") || has("breakup") || has("break up") {
        return Some(PlayType::PassDefensed);
    }
    if has("tackle") {
        return Some(if has("loss") || has("tfl") { PlayType::TackleForLoss } else { PlayType::Tackle });
    }
    if has("touchdown") || has("td") {
        return Some(if has("pass") { PlayType::PassTouchdown } else { PlayType::RushTouchdown });
    }
    if has("reception") || has("catch") {
        return Some(PlayType::Reception);
    }
    if has("pass") {
        return Some(if has("incomplete") || has("drop") {
            PlayType::PassIncomplete
        } else {
            PlayType::PassComplete
        });
    }
    if has("run") || has("rush") {
        return Some(PlayType::Rush);
    }
    None
}

/// Default role for a bare-id roster reference, from the play type.
fn primary_role(play_type: PlayType) -> ParticipantRole {
    match play_type {
        PlayType::Rush | PlayType::RushTouchdown | PlayType::TwoPointMade | PlayType::TwoPointFailed => {
            ParticipantRole::Rusher
        }
        PlayType::PassComplete | PlayType::PassIncomplete | PlayType::PassTouchdown => {
            ParticipantRole::Passer
        }
        PlayType::Reception => ParticipantRole::Receiver,
        PlayType::Tackle | PlayType::TackleForLoss | PlayType::Sack => ParticipantRole::Tackler,
        PlayType::Interception => ParticipantRole::Interceptor,
        PlayType::FumbleRecovery => ParticipantRole::Recoverer,
        PlayType::FieldGoalMade
        | PlayType::FieldGoalMissed
        | PlayType::ExtraPointMade
        | PlayType::ExtraPointMissed
        | PlayType::Kickoff => ParticipantRole::Kicker,
        PlayType::Punt => ParticipantRole::Punter,
        PlayType::KickoffReturn | PlayType::PuntReturn => ParticipantRole::Returner,
        PlayType::PassDefensed
        | PlayType::ForcedFumble
        | PlayType::Safety
        | PlayType::Penalty
        | PlayType::Timeout
        | PlayType::Other => ParticipantRole::Defender,
    }
}

/// Map one raw record onto the canonical model.
pub fn normalize_play(raw: RawPlay) -> Play {
    let play_type = match &raw.play_type {
        RawPlayType::Code(code) => *code,
        RawPlayType::Text(text) => infer_play_type(text).unwrap_or_else(|| {
            log::warn!("unrecognized play type {text:?}; recording with no effect");
            PlayType::Other
        }),
    };
    // Known data-quality risk: legacy records without a side are home
    // plays far more often than not. Migration concern, not a rule.
    let team_side = raw.team_side.unwrap_or_else(|| {
        log::warn!("play missing team_side; defaulting to home");
        TeamSide::Home
    });
    let participants = raw
        .participants
        .into_iter()
        .map(|participant| match participant {
            RawParticipant::Object(object) => PlayParticipant {
                player_id: object.player_id,
                role: object.role.unwrap_or_else(|| primary_role(play_type)),
                credit: object.credit,
            },
            RawParticipant::Id(player_id) => PlayParticipant {
                player_id,
                role: primary_role(play_type),
                credit: None,
            },
        })
        .collect();

    Play {
        id: raw.id.unwrap_or_else(Uuid::new_v4),
        play_type,
        yards: raw.yards,
        quarter: raw.quarter.max(1),
        down: raw.down.clamp(1, 4),
        distance: raw.distance.max(1),
        yard_line: raw.yard_line.min(100),
        team_side,
        participants,
        timestamp: raw.timestamp.unwrap_or_else(Utc::now),
        clock_remaining: raw.clock_remaining,
        spot: raw.spot.map(|s| s.min(100)),
        return_spot: raw.return_spot.map(|s| s.min(100)),
        note: raw.note,
    }
}

/// Normalize a whole log, preserving order.
pub fn normalize_plays(raw: Vec<RawPlay>) -> Vec<Play> {
    raw.into_iter().map(normalize_play).collect()
}

/// Parse and normalize a play from a JSON value (canonical or legacy).
pub fn play_from_value(value: serde_json::Value) -> Result<Play> {
    let raw: RawPlay = serde_json::from_value(value)?;
    Ok(normalize_play(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyword_fallback_covers_the_common_legacy_texts() {
        let cases = [
            ("QB keeper run", PlayType::Rush),
            ("Pass complete over the middle", PlayType::PassComplete),
            ("pass incomplete", PlayType::PassIncomplete),
            ("42 yard Field Goal", PlayType::FieldGoalMade),
            ("field goal missed wide left", PlayType::FieldGoalMissed),
            ("two point conversion failed", PlayType::TwoPointFailed),
            ("rushing touchdown", PlayType::RushTouchdown),
            ("TD pass to the corner", PlayType::PassTouchdown),
            ("kickoff return", PlayType::KickoffReturn),
            ("punt", PlayType::Punt),
            ("sacked for a loss", PlayType::Sack),
            ("intercepted!", PlayType::Interception),
            ("forced fumble", PlayType::ForcedFumble),
            ("fumble recovery", PlayType::FumbleRecovery),
            ("gang tackle for loss", PlayType::TackleForLoss),
            ("timeout called", PlayType::Timeout),
            ("holding flag", PlayType::Penalty),
            ("safety!", PlayType::Safety),
        ];
        for (text, expected) in cases {
            assert_eq!(infer_play_type(text), Some(expected), "{text:?}");
        }
        assert_eq!(infer_play_type("???"), None);
    }

    #[test]
    fn canonical_codes_pass_straight_through() {
        let play = play_from_value(json!({
            "type": "rush_touchdown",
            "yards": 12,
            "team_side": "away",
        }))
        .unwrap();
        assert_eq!(play.play_type, PlayType::RushTouchdown);
        assert_eq!(play.team_side, TeamSide::Away);
    }

    #[test]
    fn free_text_type_and_missing_side_are_normalized() {
        let play = play_from_value(json!({
            "type": "Run up the middle",
            "yards": 4,
        }))
        .unwrap();
        assert_eq!(play.play_type, PlayType::Rush);
        assert_eq!(play.team_side, TeamSide::Home);
    }

    #[test]
    fn unmatched_text_falls_back_to_other() {
        let play = play_from_value(json!({ "type": "???" })).unwrap();
        assert_eq!(play.play_type, PlayType::Other);
    }

    #[test]
    fn both_roster_reference_shapes_are_accepted() {
        let play = play_from_value(json!({
            "type": "pass_complete",
            "yards": 15,
            "team_side": "home",
            "participants": [
                "qb7",
                { "playerId": "wr80", "role": "receiver" },
            ],
        }))
        .unwrap();
        assert_eq!(play.participants.len(), 2);
        assert_eq!(play.participants[0].player_id, "qb7");
        assert_eq!(play.participants[0].role, ParticipantRole::Passer);
        assert_eq!(play.participants[1].player_id, "wr80");
        assert_eq!(play.participants[1].role, ParticipantRole::Receiver);
    }

    #[test]
    fn out_of_range_fields_are_clamped() {
        let play = play_from_value(json!({
            "type": "rush",
            "down": 9,
            "distance": 0,
            "yardLine": 140,
            "team_side": "home",
        }))
        .unwrap();
        assert_eq!(play.down, 4);
        assert_eq!(play.distance, 1);
        assert_eq!(play.yard_line, 100);
    }
}
