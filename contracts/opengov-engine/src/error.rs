use cosmwasm_std::StdError;
use opengov_common::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("track {track_id} not found")]
    TrackNotFound { track_id: u16 },

    #[error("track {track_id} is configured more than once")]
    DuplicateTrack { track_id: u16 },

    #[error("track {track_id}: {reason}")]
    InvalidTrack { track_id: u16, reason: String },

    #[error("expected one conviction multiplier per conviction level (7), got {len}")]
    InvalidMultipliers { len: usize },

    #[error("block time must be non-zero")]
    InvalidBlockTime,

    #[error("vote locking period must be non-zero")]
    InvalidVoteLockingPeriod,
}
