use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::conviction::Conviction;

/// A ballot as recorded on chain.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum AccountVote {
    Standard {
        balance: Uint128,
        aye: bool,
        /// Raw conviction index, 0..=6 on well-formed votes.
        conviction: u8,
    },
    Split {
        aye: Uint128,
        nay: Uint128,
    },
    SplitAbstain {
        aye: Uint128,
        nay: Uint128,
        abstain: Uint128,
    },
}

impl AccountVote {
    /// Capital committed by the ballot across all branches. Saturates;
    /// total issuance keeps real sums far below `Uint128::MAX`.
    pub fn total_balance(&self) -> Uint128 {
        match self {
            AccountVote::Standard { balance, .. } => *balance,
            AccountVote::Split { aye, nay } => aye.saturating_add(*nay),
            AccountVote::SplitAbstain { aye, nay, abstain } => {
                aye.saturating_add(*nay).saturating_add(*abstain)
            }
        }
    }

    pub fn aye_balance(&self) -> Uint128 {
        match self {
            AccountVote::Standard { balance, aye, .. } => {
                if *aye {
                    *balance
                } else {
                    Uint128::zero()
                }
            }
            AccountVote::Split { aye, .. } | AccountVote::SplitAbstain { aye, .. } => *aye,
        }
    }

    pub fn nay_balance(&self) -> Uint128 {
        match self {
            AccountVote::Standard { balance, aye, .. } => {
                if *aye {
                    Uint128::zero()
                } else {
                    *balance
                }
            }
            AccountVote::Split { nay, .. } | AccountVote::SplitAbstain { nay, .. } => *nay,
        }
    }

    pub fn abstain_balance(&self) -> Uint128 {
        match self {
            AccountVote::SplitAbstain { abstain, .. } => *abstain,
            AccountVote::Standard { .. } | AccountVote::Split { .. } => Uint128::zero(),
        }
    }
}

/// When a lock expires. Ongoing referenda hold their locks indefinitely;
/// this has no ordering so it is never mistaken for a real block height.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum UnlockAt {
    Block(u64),
    Indefinite,
}

impl UnlockAt {
    pub fn block(&self) -> Option<u64> {
        match self {
            UnlockAt::Block(block) => Some(*block),
            UnlockAt::Indefinite => None,
        }
    }

    pub fn is_unlocked_at(&self, current_block: u64) -> bool {
        match self {
            UnlockAt::Block(block) => *block <= current_block,
            UnlockAt::Indefinite => false,
        }
    }
}

/// Token lock produced by one vote on one referendum.
#[cw_serde]
pub struct VoteLock {
    pub ref_id: u32,
    pub track: u16,
    pub total_balance: Uint128,
    pub conviction: Conviction,
    pub unlock_at: UnlockAt,
}

/// Votes cast on one track, keyed by referendum.
#[cw_serde]
pub struct TrackVotes {
    pub track: u16,
    pub votes: Vec<ReferendumVote>,
}

#[cw_serde]
pub struct ReferendumVote {
    pub ref_id: u32,
    pub vote: AccountVote,
}
