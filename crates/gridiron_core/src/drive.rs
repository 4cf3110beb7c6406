//! Drive state machine.
//!
//! Down, distance, field position, possession, clock and timeout state for
//! the live game, driven by committed plays. Every rule lives in one
//! transition function, [`DriveState::apply`]; follow-up requirements
//! (extra point, kickoff return, interception return, possession
//! confirmation) are modeled as an explicit [`PendingAction`] tagged union
//! that blocks ordinary plays until resolved, never as loose flags.
//!
//! Field position is an absolute yard line (0-100); the goal each offense
//! attacks is tracked separately and swaps at halftime.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::models::play::{ParticipantRole, Play, PlayParticipant, PlayType, TeamSide};
use crate::scoring::{self, ScoreDelta};

/// Regulation quarter length in seconds.
pub const DEFAULT_PERIOD_SECONDS: u16 = 12 * 60;
/// Timeouts granted to each side.
pub const TIMEOUTS_PER_SIDE: u8 = 3;

/// The goal line a team is attacking, on the absolute 0-100 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldDirection {
    TowardZero,
    TowardOneHundred,
}

impl FieldDirection {
    fn opposite(self) -> FieldDirection {
        match self {
            FieldDirection::TowardZero => FieldDirection::TowardOneHundred,
            FieldDirection::TowardOneHundred => FieldDirection::TowardZero,
        }
    }

    fn sign(self) -> i32 {
        match self {
            FieldDirection::TowardZero => -1,
            FieldDirection::TowardOneHundred => 1,
        }
    }

    fn goal_line(self) -> u8 {
        match self {
            FieldDirection::TowardZero => 0,
            FieldDirection::TowardOneHundred => 100,
        }
    }
}

/// Follow-up the machine is waiting on before ordinary plays resume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PendingAction {
    None,
    /// A touchdown was scored; waiting for the try resolution.
    ExtraPoint { scoring_side: TeamSide },
    /// Waiting for the kickoff play itself.
    Kickoff { kicking_side: TeamSide },
    /// Kickoff committed; waiting for returner and return-end spot.
    KickoffReturn { kicking_side: TeamSide },
    /// Interception committed without a return-end spot; the original
    /// play is held so the resolution can amend it in the log.
    InterceptionReturn { play: Play },
    /// A loose-ball play ended with unclear possession.
    PossessionConfirm,
}

impl PendingAction {
    fn name(&self) -> &'static str {
        match self {
            PendingAction::None => "none",
            PendingAction::ExtraPoint { .. } => "extra point",
            PendingAction::Kickoff { .. } => "kickoff",
            PendingAction::KickoffReturn { .. } => "kickoff return",
            PendingAction::InterceptionReturn { .. } => "interception return",
            PendingAction::PossessionConfirm => "possession confirmation",
        }
    }
}

/// Inputs consumed by the single transition function.
///
/// Committed plays cover both ordinary snaps and most pending
/// resolutions (the extra-point try and the kickoff return are plays in
/// their own right); the remaining variants are the confirmation steps
/// that do not create a new log entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveInput {
    Play(Play),
    /// Resolve a pending interception with the interceptor and the
    /// return-end spot.
    ResolveInterceptionReturn {
        interceptor: Option<String>,
        spot: u8,
    },
    /// Resolve unclear possession after a loose ball.
    ConfirmPossession(TeamSide),
    /// Quarter (or overtime period) expired.
    AdvanceQuarter,
}

/// Side effects of a transition, for the caller to act on. Score deltas
/// are informational; the authoritative score is always recomputed from
/// the play log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DriveEvent {
    FirstDown,
    Score(ScoreDelta),
    PossessionChanged { side: TeamSide, spot: u8 },
    /// Synthetic entry the caller should append to the play log
    /// (e.g. a turnover on downs).
    LogEntry(Play),
    /// Amended copy of an existing play the caller should apply via the
    /// log's edit operation (interception resolved with its return spot).
    AmendEntry(Play),
    TimeOfPossession { side: TeamSide, seconds: u32 },
    QuarterStarted { quarter: u8 },
    HalftimeReached,
}

/// Live drive state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriveState {
    pub possession: TeamSide,
    /// Goal the home team is attacking; swaps at halftime.
    pub home_direction: FieldDirection,
    pub down: u8,
    pub distance: u8,
    /// Absolute yard line, 0-100.
    pub field_position: u8,
    pub quarter: u8,
    pub clock_remaining: u16,
    pub period_seconds: u16,
    pub timeouts_home: u8,
    pub timeouts_away: u8,
    /// Clock value when the current possession began.
    pub possession_clock_start: u16,
    /// Accumulated time of possession, seconds.
    pub top_home: u32,
    pub top_away: u32,
    /// Side that received the opening kickoff; it kicks off to start the
    /// second half.
    pub opening_kickoff_receiver: Option<TeamSide>,
    pub pending: PendingAction,
}

impl Default for DriveState {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveState {
    /// Fresh state in normal play: home ball, 1st and 10 at the 35.
    pub fn new() -> Self {
        Self {
            possession: TeamSide::Home,
            home_direction: FieldDirection::TowardOneHundred,
            down: 1,
            distance: 10,
            field_position: 35,
            quarter: 1,
            clock_remaining: DEFAULT_PERIOD_SECONDS,
            period_seconds: DEFAULT_PERIOD_SECONDS,
            timeouts_home: TIMEOUTS_PER_SIDE,
            timeouts_away: TIMEOUTS_PER_SIDE,
            possession_clock_start: DEFAULT_PERIOD_SECONDS,
            top_home: 0,
            top_away: 0,
            opening_kickoff_receiver: None,
            pending: PendingAction::None,
        }
    }

    /// Fresh state waiting on the opening kickoff.
    pub fn opening_kickoff(kicking_side: TeamSide) -> Self {
        Self {
            possession: kicking_side,
            pending: PendingAction::Kickoff { kicking_side },
            ..Self::new()
        }
    }

    /// Direction of attack for the given side.
    pub fn direction_of(&self, side: TeamSide) -> FieldDirection {
        match side {
            TeamSide::Home => self.home_direction,
            TeamSide::Away => self.home_direction.opposite(),
        }
    }

    fn timeouts_mut(&mut self, side: TeamSide) -> &mut u8 {
        match side {
            TeamSide::Home => &mut self.timeouts_home,
            TeamSide::Away => &mut self.timeouts_away,
        }
    }

    /// Fold the elapsed possession time into the current offense's total
    /// and restart the possession clock at the current clock value.
    fn fold_possession_time(&mut self, events: &mut Vec<DriveEvent>) {
        let elapsed = u32::from(self.possession_clock_start.saturating_sub(self.clock_remaining));
        if elapsed > 0 {
            match self.possession {
                TeamSide::Home => self.top_home += elapsed,
                TeamSide::Away => self.top_away += elapsed,
            }
            events.push(DriveEvent::TimeOfPossession { side: self.possession, seconds: elapsed });
        }
        self.possession_clock_start = self.clock_remaining;
    }

    fn change_possession(&mut self, to: TeamSide, spot: u8, events: &mut Vec<DriveEvent>) {
        self.fold_possession_time(events);
        self.possession = to;
        self.down = 1;
        self.distance = 10;
        self.field_position = spot.min(100);
        events.push(DriveEvent::PossessionChanged { side: to, spot: self.field_position });
    }

    fn sample_clock(&mut self, play: &Play) {
        if let Some(clock) = play.clock_remaining {
            self.clock_remaining = clock.min(self.period_seconds);
        }
    }

    fn score(&self, delta: ScoreDelta, events: &mut Vec<DriveEvent>) {
        if delta != ScoreDelta::default() {
            events.push(DriveEvent::Score(delta));
        }
    }

    /// Single transition function. Consumes one input, mutates the state
    /// and reports the side effects.
    pub fn apply(&mut self, input: DriveInput) -> Result<Vec<DriveEvent>> {
        match input {
            DriveInput::Play(play) => self.apply_play(play),
            DriveInput::ResolveInterceptionReturn { interceptor, spot } => {
                self.resolve_interception(interceptor, spot)
            }
            DriveInput::ConfirmPossession(side) => self.confirm_possession(side),
            DriveInput::AdvanceQuarter => Ok(self.advance_quarter()),
        }
    }

    fn apply_play(&mut self, play: Play) -> Result<Vec<DriveEvent>> {
        validate_play(&play)?;
        let mut events = Vec::new();

        // Timeouts are legal in any machine state and never touch
        // possession; the sampled clock is recorded with the play.
        if play.play_type == PlayType::Timeout {
            self.sample_clock(&play);
            let timeouts = self.timeouts_mut(play.team_side);
            *timeouts = timeouts.saturating_sub(1);
            log::debug!(
                "timeout {:?}, {}s remaining in Q{}",
                play.team_side,
                self.clock_remaining,
                self.quarter
            );
            return Ok(events);
        }

        match self.pending.clone() {
            PendingAction::None => self.apply_ordinary(play, &mut events)?,
            PendingAction::ExtraPoint { scoring_side } => {
                self.apply_extra_point(play, scoring_side, &mut events)?
            }
            PendingAction::Kickoff { .. } => {
                if play.play_type != PlayType::Kickoff {
                    return Err(GameError::PendingResolution(self.pending.name()));
                }
                self.sample_clock(&play);
                self.pending = PendingAction::KickoffReturn { kicking_side: play.team_side };
            }
            PendingAction::KickoffReturn { kicking_side } => {
                if play.play_type != PlayType::KickoffReturn {
                    return Err(GameError::PendingResolution(self.pending.name()));
                }
                let spot = play.return_spot.ok_or_else(|| {
                    GameError::InvalidPlay("kickoff return requires a return-end spot".into())
                })?;
                if play.participant_with_role(ParticipantRole::Returner).is_none() {
                    return Err(GameError::InvalidPlay("kickoff return requires a returner".into()));
                }
                self.sample_clock(&play);
                let receiving = kicking_side.opponent();
                self.pending = PendingAction::None;
                self.change_possession(receiving, spot, &mut events);
                if self.opening_kickoff_receiver.is_none() {
                    self.opening_kickoff_receiver = Some(receiving);
                }
            }
            PendingAction::InterceptionReturn { .. } | PendingAction::PossessionConfirm => {
                return Err(GameError::PendingResolution(self.pending.name()));
            }
        }
        Ok(events)
    }

    fn apply_ordinary(&mut self, play: Play, events: &mut Vec<DriveEvent>) -> Result<()> {
        self.sample_clock(&play);
        let side = self.possession;
        let direction = self.direction_of(side);

        match play.play_type {
            PlayType::Rush | PlayType::PassComplete | PlayType::Sack => {
                self.advance_series(i32::from(play.yards), direction, events);
            }
            PlayType::PassIncomplete => {
                self.advance_series(0, direction, events);
            }
            PlayType::RushTouchdown | PlayType::PassTouchdown => {
                self.field_position = direction.goal_line();
                self.score(scoring::score_delta(&play), events);
                self.pending = PendingAction::ExtraPoint { scoring_side: side };
            }
            PlayType::FieldGoalMade => {
                self.score(scoring::score_delta(&play), events);
                self.pending = PendingAction::Kickoff { kicking_side: side };
            }
            PlayType::FieldGoalMissed => {
                // Defense takes over at the spot.
                self.change_possession(side.opponent(), self.field_position, events);
            }
            PlayType::Punt => {
                let landed = shift(self.field_position, i32::from(play.yards) * direction.sign());
                self.change_possession(side.opponent(), landed, events);
            }
            PlayType::PuntReturn | PlayType::KickoffReturn => {
                // Return logged outside a pending flow: trust its end spot.
                if let Some(spot) = play.return_spot {
                    self.field_position = spot.min(100);
                }
            }
            PlayType::Interception => {
                if let Some(spot) = play.return_spot {
                    self.change_possession(side.opponent(), spot, events);
                } else {
                    self.pending = PendingAction::InterceptionReturn { play };
                }
            }
            PlayType::FumbleRecovery => {
                self.pending = PendingAction::PossessionConfirm;
            }
            PlayType::Safety => {
                // Scored against the offense; the scored-upon team kicks.
                self.score(scoring::score_delta(&play), events);
                self.pending = PendingAction::Kickoff { kicking_side: side };
            }
            PlayType::Kickoff => {
                self.pending = PendingAction::KickoffReturn { kicking_side: play.team_side };
            }
            PlayType::Penalty => {
                // Enforced from the previous spot; the down is replayed.
                let yards = i32::from(play.yards) * direction.sign();
                self.field_position = shift(self.field_position, yards);
                self.distance =
                    clamp_distance(i32::from(self.distance) - i32::from(play.yards));
            }
            PlayType::ExtraPointMade
            | PlayType::ExtraPointMissed
            | PlayType::TwoPointMade
            | PlayType::TwoPointFailed => {
                // Legacy logs can carry a try outside the pending flow.
                self.score(scoring::score_delta(&play), events);
            }
            // Defensive stat annotations and unclassified records never
            // move the chains by themselves.
            PlayType::Reception
            | PlayType::Tackle
            | PlayType::TackleForLoss
            | PlayType::PassDefensed
            | PlayType::ForcedFumble
            | PlayType::Timeout
            | PlayType::Other => {}
        }
        Ok(())
    }

    /// Ordinary gain or loss: move the spot, then the chains.
    fn advance_series(&mut self, yards: i32, direction: FieldDirection, events: &mut Vec<DriveEvent>) {
        self.field_position = shift(self.field_position, yards * direction.sign());
        if yards >= i32::from(self.distance) {
            self.down = 1;
            self.distance = 10;
            events.push(DriveEvent::FirstDown);
        } else if self.down >= 4 {
            // 4th-down failure: modeled transition, not an error.
            let mut entry = Play::new(PlayType::Other, self.possession);
            entry.quarter = self.quarter;
            entry.down = self.down;
            entry.distance = self.distance;
            entry.yard_line = self.field_position;
            entry.note = Some("turnover on downs".to_string());
            events.push(DriveEvent::LogEntry(entry));
            log::debug!("turnover on downs at the {}", self.field_position);
            self.change_possession(self.possession.opponent(), self.field_position, events);
        } else {
            self.down += 1;
            self.distance = clamp_distance(i32::from(self.distance) - yards);
        }
    }

    fn apply_extra_point(
        &mut self,
        play: Play,
        scoring_side: TeamSide,
        events: &mut Vec<DriveEvent>,
    ) -> Result<()> {
        match play.play_type {
            PlayType::ExtraPointMade => {
                if play.participant_with_role(ParticipantRole::Kicker).is_none() {
                    return Err(GameError::InvalidPlay("extra point requires a kicker".into()));
                }
            }
            PlayType::TwoPointMade => {
                if play.participants.is_empty() {
                    return Err(GameError::InvalidPlay(
                        "two-point conversion requires a player".into(),
                    ));
                }
            }
            PlayType::ExtraPointMissed | PlayType::TwoPointFailed => {}
            _ => return Err(GameError::PendingResolution(self.pending.name())),
        }
        self.score(scoring::score_delta(&play), events);
        self.pending = PendingAction::Kickoff { kicking_side: scoring_side };
        Ok(())
    }

    fn resolve_interception(
        &mut self,
        interceptor: Option<String>,
        spot: u8,
    ) -> Result<Vec<DriveEvent>> {
        let PendingAction::InterceptionReturn { play } = self.pending.clone() else {
            return Err(GameError::UnexpectedResolution {
                expected: "interception return",
                actual: self.pending.name(),
            });
        };
        let mut events = Vec::new();
        let mut amended = play;
        amended.return_spot = Some(spot.min(100));
        if let Some(id) = interceptor {
            if amended.participant_with_role(ParticipantRole::Interceptor).is_none() {
                amended.participants.push(PlayParticipant::new(id, ParticipantRole::Interceptor));
            }
        }
        events.push(DriveEvent::AmendEntry(amended));
        let intercepting = self.possession.opponent();
        self.pending = PendingAction::None;
        self.change_possession(intercepting, spot, &mut events);
        Ok(events)
    }

    fn confirm_possession(&mut self, side: TeamSide) -> Result<Vec<DriveEvent>> {
        if !matches!(self.pending, PendingAction::PossessionConfirm) {
            return Err(GameError::UnexpectedResolution {
                expected: "possession confirmation",
                actual: self.pending.name(),
            });
        }
        let mut events = Vec::new();
        self.pending = PendingAction::None;
        if side != self.possession {
            self.change_possession(side, self.field_position, &mut events);
        }
        Ok(events)
    }

    /// Clock expired: fold the remaining possession time, reset the clock
    /// and move to the next period. Crossing halftime swaps field
    /// direction and hands the kickoff to the side that received the
    /// opening one.
    fn advance_quarter(&mut self) -> Vec<DriveEvent> {
        let mut events = Vec::new();
        self.clock_remaining = 0;
        self.fold_possession_time(&mut events);
        self.quarter += 1;
        self.clock_remaining = self.period_seconds;
        self.possession_clock_start = self.period_seconds;
        events.push(DriveEvent::QuarterStarted { quarter: self.quarter });
        if self.quarter == 3 {
            self.home_direction = self.home_direction.opposite();
            if let Some(receiver) = self.opening_kickoff_receiver {
                self.pending = PendingAction::Kickoff { kicking_side: receiver };
            }
            events.push(DriveEvent::HalftimeReached);
        }
        events
    }
}

fn shift(yard_line: u8, yards: i32) -> u8 {
    (i32::from(yard_line) + yards).clamp(0, 100) as u8
}

fn clamp_distance(distance: i32) -> u8 {
    distance.clamp(1, 100) as u8
}

/// Range checks applied at the commit boundary.
pub fn validate_play(play: &Play) -> Result<()> {
    if !(1..=4).contains(&play.down) {
        return Err(GameError::InvalidPlay(format!("down {} out of range", play.down)));
    }
    if play.distance == 0 {
        return Err(GameError::InvalidPlay("distance must be at least 1".into()));
    }
    if play.yard_line > 100 {
        return Err(GameError::InvalidPlay(format!(
            "yard line {} out of range",
            play.yard_line
        )));
    }
    Ok(())
}
