use cosmwasm_std::OverflowError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("invalid curve: {reason}")]
    InvalidCurve { reason: String },

    #[error("referendum cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
