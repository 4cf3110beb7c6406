use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel player id for team-level events with no identified player.
///
/// Plays attributed to this id still count toward team totals but are
/// excluded from every individual stat bucket.
pub const NO_ATTRIBUTION: &str = "--";

/// The two sides of a game, from the scorekeeping team's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// Closed set of play type codes.
///
/// Every consumer switches exhaustively over these; loose legacy strings are
/// mapped onto this set once, at the `normalize` boundary, and nowhere else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Rush,
    RushTouchdown,
    PassComplete,
    PassIncomplete,
    PassTouchdown,
    Reception,
    Tackle,
    TackleForLoss,
    Sack,
    Interception,
    FumbleRecovery,
    PassDefensed,
    ForcedFumble,
    FieldGoalMade,
    FieldGoalMissed,
    ExtraPointMade,
    ExtraPointMissed,
    TwoPointMade,
    TwoPointFailed,
    Safety,
    Kickoff,
    KickoffReturn,
    Punt,
    PuntReturn,
    Penalty,
    Timeout,
    /// Catch-all for records the compatibility path could not classify.
    /// Carries no score or stat effect.
    Other,
}

impl PlayType {
    /// Touchdown plays that open the extra-point resolution flow.
    pub fn is_touchdown(self) -> bool {
        matches!(self, PlayType::RushTouchdown | PlayType::PassTouchdown)
    }

    /// Plays that advance (or end) the current series of downs.
    ///
    /// Defensive stat plays (tackles, pass breakups, ...) annotate an
    /// offensive play and never move the chains by themselves.
    pub fn is_offensive_snap(self) -> bool {
        matches!(
            self,
            PlayType::Rush
                | PlayType::RushTouchdown
                | PlayType::PassComplete
                | PlayType::PassIncomplete
                | PlayType::PassTouchdown
                | PlayType::Sack
        )
    }
}

/// Role a participant played on a single play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Rusher,
    Passer,
    Receiver,
    Tackler,
    Interceptor,
    Kicker,
    Punter,
    Returner,
    Defender,
    Recoverer,
}

/// Attribution of a play to one player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayParticipant {
    pub player_id: String,
    pub role: ParticipantRole,
    /// Fractional stat credit, used for shared tackles. When absent the
    /// splitting rule in [`Play::tackle_credits`] applies.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub credit: Option<f32>,
}

impl PlayParticipant {
    pub fn new(player_id: impl Into<String>, role: ParticipantRole) -> Self {
        Self { player_id: player_id.into(), role, credit: None }
    }
}

/// One discrete logged game event. The ordered play log is the single
/// source of truth: scores and every stat bucket are re-derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Play {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub play_type: PlayType,
    /// Signed yardage; negative for losses.
    pub yards: i16,
    pub quarter: u8,
    /// 1-4.
    pub down: u8,
    /// Yards to gain for a first down, >= 1.
    pub distance: u8,
    /// Absolute field position, 0-100; 0 and 100 are the goal lines. The
    /// direction of attack is tracked by the drive state machine.
    pub yard_line: u8,
    /// Possessing side at the time of the play.
    pub team_side: TeamSide,
    /// Ordered player attributions.
    pub participants: Vec<PlayParticipant>,
    pub timestamp: DateTime<Utc>,
    /// Game clock sample (seconds remaining in the quarter) taken when the
    /// play was confirmed. Feeds time-of-possession accounting.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub clock_remaining: Option<u16>,
    /// Interception spot (where the ball was picked off), same absolute
    /// scale as `yard_line`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spot: Option<u8>,
    /// Return-end spot for interceptions and kick returns, same absolute
    /// scale as `yard_line`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub return_spot: Option<u8>,
    /// Free-form annotation, also used for synthetic log entries such as
    /// turnovers on downs.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

impl Play {
    pub fn new(play_type: PlayType, team_side: TeamSide) -> Self {
        Self {
            id: Uuid::new_v4(),
            play_type,
            yards: 0,
            quarter: 1,
            down: 1,
            distance: 10,
            yard_line: 35,
            team_side,
            participants: Vec::new(),
            timestamp: Utc::now(),
            clock_remaining: None,
            spot: None,
            return_spot: None,
            note: None,
        }
    }

    pub fn with_yards(mut self, yards: i16) -> Self {
        self.yards = yards;
        self
    }

    pub fn with_participant(
        mut self,
        player_id: impl Into<String>,
        role: ParticipantRole,
    ) -> Self {
        self.participants.push(PlayParticipant::new(player_id, role));
        self
    }

    pub fn at(mut self, down: u8, distance: u8, yard_line: u8) -> Self {
        self.down = down;
        self.distance = distance;
        self.yard_line = yard_line;
        self
    }

    /// First participant holding the given role.
    pub fn participant_with_role(&self, role: ParticipantRole) -> Option<&PlayParticipant> {
        self.participants.iter().find(|p| p.role == role)
    }

    fn tacklers(&self) -> Vec<&PlayParticipant> {
        self.participants
            .iter()
            .filter(|p| matches!(p.role, ParticipantRole::Tackler | ParticipantRole::Defender))
            .collect()
    }

    /// Per-tackler stat credit for this play.
    ///
    /// A solo tackle is worth 1.0; shared tackles start at 0.5 per tackler
    /// and the play total is then normalized so the credits always sum to
    /// exactly 1.0, no matter how many tacklers were listed.
    pub fn tackle_credits(&self) -> Vec<(&str, f32)> {
        let tacklers = self.tacklers();
        if tacklers.is_empty() {
            return Vec::new();
        }
        let raw: Vec<f32> = tacklers
            .iter()
            .map(|p| p.credit.unwrap_or(if tacklers.len() == 1 { 1.0 } else { 0.5 }))
            .collect();
        let total: f32 = raw.iter().sum();
        tacklers
            .iter()
            .zip(raw)
            .map(|(p, c)| (p.player_id.as_str(), if total > 0.0 { c / total } else { 0.0 }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn play_type_codes_round_trip_as_snake_case() {
        for play_type in PlayType::iter() {
            let encoded = serde_json::to_string(&play_type).unwrap();
            assert_eq!(encoded, encoded.to_lowercase(), "wire name must be snake_case");
            let decoded: PlayType = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, play_type);
        }
    }

    #[test]
    fn solo_tackle_gets_full_credit() {
        let play = Play::new(PlayType::Tackle, TeamSide::Home)
            .with_participant("p1", ParticipantRole::Tackler);
        let credits = play.tackle_credits();
        assert_eq!(credits, vec![("p1", 1.0)]);
    }

    #[test]
    fn shared_tackle_credits_sum_to_one() {
        for n in 1..=3 {
            let mut play = Play::new(PlayType::Tackle, TeamSide::Home);
            for i in 0..n {
                play = play.with_participant(format!("p{i}"), ParticipantRole::Tackler);
            }
            let total: f32 = play.tackle_credits().iter().map(|(_, c)| c).sum();
            assert!((total - 1.0).abs() < 1e-6, "{n} tacklers summed to {total}");
        }
    }

    #[test]
    fn two_tacklers_split_half_each() {
        let play = Play::new(PlayType::Tackle, TeamSide::Home)
            .with_participant("a", ParticipantRole::Tackler)
            .with_participant("b", ParticipantRole::Tackler);
        let credits = play.tackle_credits();
        assert_eq!(credits[0].1, 0.5);
        assert_eq!(credits[1].1, 0.5);
    }

    #[test]
    fn explicit_credits_are_normalized() {
        let mut play = Play::new(PlayType::Tackle, TeamSide::Home);
        play.participants.push(PlayParticipant {
            player_id: "a".into(),
            role: ParticipantRole::Tackler,
            credit: Some(0.75),
        });
        play.participants.push(PlayParticipant {
            player_id: "b".into(),
            role: ParticipantRole::Tackler,
            credit: Some(0.75),
        });
        let credits = play.tackle_credits();
        assert_eq!(credits[0].1, 0.5);
        assert_eq!(credits[1].1, 0.5);
    }
}
