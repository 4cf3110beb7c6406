use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("a pending {0} must be resolved before ordinary plays are accepted")]
    PendingResolution(&'static str),

    #[error("no pending {expected} to resolve (machine is in {actual})")]
    UnexpectedResolution {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid play: {0}")]
    InvalidPlay(String),

    #[error("schema version mismatch: found {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
