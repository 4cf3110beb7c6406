pub mod game;
pub mod play;
pub mod player;
pub mod season;

#[cfg(test)]
mod contracts_test;

pub use game::{Game, GameOutcome};
pub use play::{ParticipantRole, Play, PlayParticipant, PlayType, TeamSide, NO_ATTRIBUTION};
pub use player::Player;
pub use season::Season;
