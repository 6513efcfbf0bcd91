use cosmwasm_schema::cw_serde;

use crate::error::EngineError;

/// Finality of a referendum. Starts `Ongoing` and concludes exactly once;
/// every other variant is terminal and carries the block it concluded at.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum TallyOutcome {
    Ongoing,
    Killed { block: u64 },
    Cancelled { block: u64 },
    TimedOut { block: u64 },
    Approved { block: u64 },
    Rejected { block: u64 },
}

impl TallyOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TallyOutcome::Ongoing)
    }

    /// Block at which the referendum concluded.
    pub fn concluded_at(&self) -> Option<u64> {
        match self {
            TallyOutcome::Ongoing => None,
            TallyOutcome::Killed { block }
            | TallyOutcome::Cancelled { block }
            | TallyOutcome::TimedOut { block }
            | TallyOutcome::Approved { block }
            | TallyOutcome::Rejected { block } => Some(*block),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TallyOutcome::Ongoing => "ongoing",
            TallyOutcome::Killed { .. } => "killed",
            TallyOutcome::Cancelled { .. } => "cancelled",
            TallyOutcome::TimedOut { .. } => "timed_out",
            TallyOutcome::Approved { .. } => "approved",
            TallyOutcome::Rejected { .. } => "rejected",
        }
    }

    /// Move an ongoing referendum into a terminal state. Terminal states are
    /// absorbing, and nothing transitions back to `Ongoing`.
    pub fn conclude(self, next: TallyOutcome) -> Result<TallyOutcome, EngineError> {
        if self.is_terminal() || !next.is_terminal() {
            return Err(EngineError::InvalidTransition {
                from: self.name().to_string(),
                to: next.name().to_string(),
            });
        }
        Ok(next)
    }

    /// Map an indexer status onto an outcome.
    ///
    /// Returns `None` for unrecognised statuses and for terminal statuses
    /// reported without a block.
    pub fn from_status(status: &str, block: Option<u64>) -> Option<TallyOutcome> {
        match status {
            "Submitted" | "DecisionDepositPlaced" | "Deciding" | "ConfirmStarted"
            | "ConfirmAborted" => Some(TallyOutcome::Ongoing),
            "Approved" | "Confirmed" | "Executed" | "ExecutionFailed" => {
                block.map(|block| TallyOutcome::Approved { block })
            }
            "Rejected" => block.map(|block| TallyOutcome::Rejected { block }),
            "Cancelled" => block.map(|block| TallyOutcome::Cancelled { block }),
            "TimedOut" => block.map(|block| TallyOutcome::TimedOut { block }),
            "Killed" => block.map(|block| TallyOutcome::Killed { block }),
            _ => None,
        }
    }
}
