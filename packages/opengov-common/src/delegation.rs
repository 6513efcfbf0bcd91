use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::conviction::Conviction;
use crate::error::EngineError;
use crate::types::AccountVote;

/// Branch balances are shown as "votes" divided by this. Kept as the portal
/// displays it; it equals the `Conviction::None` weight but is not derived
/// from the voter's conviction.
pub const SPLIT_VOTE_DIVISOR: u128 = 10;

#[cw_serde]
#[derive(Copy, Eq)]
pub enum VoteDecision {
    Yes,
    No,
    Abstain,
}

/// Balance fields as reported by the indexer. Standard votes fill `value`;
/// split votes fill `aye`/`nay`; split-abstain votes also fill `abstain`.
#[cw_serde]
#[derive(Default)]
pub struct VoteBalance {
    pub value: Option<Uint128>,
    pub aye: Option<Uint128>,
    pub nay: Option<Uint128>,
    pub abstain: Option<Uint128>,
}

impl VoteBalance {
    /// Capital behind the balance, whichever fields carry it.
    pub fn capital(&self) -> Result<Uint128, EngineError> {
        if let Some(value) = self.value {
            return Ok(value);
        }
        let total = self
            .aye
            .unwrap_or_default()
            .checked_add(self.nay.unwrap_or_default())?
            .checked_add(self.abstain.unwrap_or_default())?;
        Ok(total)
    }
}

#[cw_serde]
pub struct DelegatedVoteRecord {
    pub voter: String,
    pub voting_power: Uint128,
    pub balance: VoteBalance,
    pub lock_period: u8,
}

/// A vote as delivered by the indexer, with its inbound delegations.
#[cw_serde]
pub struct VoteRecord {
    pub voter: String,
    pub decision: VoteDecision,
    pub balance: VoteBalance,
    pub lock_period: u8,
    pub self_voting_power: Option<Uint128>,
    #[serde(default)]
    pub delegated_votes: Vec<DelegatedVoteRecord>,
    pub created_at_block: Option<u64>,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum VoteShape {
    Standard,
    Split,
    SplitAbstain,
}

impl VoteRecord {
    pub fn shape(&self) -> Option<VoteShape> {
        let balance = &self.balance;
        if balance.abstain.is_some() {
            Some(VoteShape::SplitAbstain)
        } else if balance.aye.is_some() || balance.nay.is_some() {
            Some(VoteShape::Split)
        } else if balance.value.is_some() {
            Some(VoteShape::Standard)
        } else {
            None
        }
    }
}

/// Fan a record out into one single-sided ballot per branch, so that
/// consumers can tally each side on its own.
pub fn normalize_vote(record: &VoteRecord) -> Vec<AccountVote> {
    let balance = &record.balance;
    let aye = balance.aye.unwrap_or_default();
    let nay = balance.nay.unwrap_or_default();
    let abstain = balance.abstain.unwrap_or_default();
    let zero = Uint128::zero();

    match record.shape() {
        Some(VoteShape::Standard) => vec![AccountVote::Standard {
            balance: balance.value.unwrap_or_default(),
            aye: record.decision == VoteDecision::Yes,
            conviction: record.lock_period,
        }],
        Some(VoteShape::Split) => vec![
            AccountVote::Split { aye, nay: zero },
            AccountVote::Split { aye: zero, nay },
        ],
        Some(VoteShape::SplitAbstain) => vec![
            AccountVote::SplitAbstain {
                aye,
                nay: zero,
                abstain: zero,
            },
            AccountVote::SplitAbstain {
                aye: zero,
                nay,
                abstain: zero,
            },
            AccountVote::SplitAbstain {
                aye: zero,
                nay: zero,
                abstain,
            },
        ],
        None => vec![],
    }
}

#[cw_serde]
#[derive(Default)]
pub struct SideTotals {
    pub aye: Uint128,
    pub nay: Uint128,
    pub abstain: Uint128,
}

pub fn tally_by_side(votes: &[AccountVote]) -> Result<SideTotals, EngineError> {
    votes.iter().try_fold(SideTotals::default(), |acc, vote| {
        Ok(SideTotals {
            aye: acc.aye.checked_add(vote.aye_balance())?,
            nay: acc.nay.checked_add(vote.nay_balance())?,
            abstain: acc.abstain.checked_add(vote.abstain_balance())?,
        })
    })
}

/// Per-delegate view of a vote with its delegated cohort rolled up.
#[cw_serde]
pub struct DelegatedCohortVote {
    pub voter: String,
    pub decision: VoteDecision,
    pub lock_period: u8,
    pub created_at_block: Option<u64>,
    pub self_voting_power: Uint128,
    pub delegated_votes_count: u32,
    pub delegated_voting_power: Uint128,
    pub delegated_capital: Uint128,
    pub total_voting_power: Uint128,
    pub is_standard: bool,
    pub is_split: bool,
    pub is_split_abstain: bool,
    pub balance: Uint128,
    pub aye_balance: Uint128,
    pub nay_balance: Uint128,
    pub abstain_balance: Uint128,
    pub aye_votes: Uint128,
    pub nay_votes: Uint128,
    pub abstain_votes: Uint128,
}

pub fn format_cohort_vote(record: &VoteRecord) -> Result<DelegatedCohortVote, EngineError> {
    let mut delegated_voting_power = Uint128::zero();
    let mut delegated_capital = Uint128::zero();
    for delegation in &record.delegated_votes {
        delegated_voting_power = delegated_voting_power.checked_add(delegation.voting_power)?;
        delegated_capital = delegated_capital.checked_add(delegation.balance.capital()?)?;
    }

    let balance = record.balance.capital()?;
    let self_voting_power = match record.self_voting_power {
        Some(power) => power,
        None => Conviction::from_index(record.lock_period)
            .unwrap_or_default()
            .votes(balance),
    };

    let shape = record.shape();
    let aye_balance = record.balance.aye.unwrap_or_default();
    let nay_balance = record.balance.nay.unwrap_or_default();
    let abstain_balance = record.balance.abstain.unwrap_or_default();

    Ok(DelegatedCohortVote {
        voter: record.voter.clone(),
        decision: record.decision,
        lock_period: record.lock_period,
        created_at_block: record.created_at_block,
        self_voting_power,
        delegated_votes_count: record.delegated_votes.len() as u32,
        delegated_voting_power,
        delegated_capital,
        total_voting_power: self_voting_power.checked_add(delegated_voting_power)?,
        is_standard: shape == Some(VoteShape::Standard),
        is_split: shape == Some(VoteShape::Split),
        is_split_abstain: shape == Some(VoteShape::SplitAbstain),
        balance,
        aye_balance,
        nay_balance,
        abstain_balance,
        aye_votes: branch_votes(aye_balance),
        nay_votes: branch_votes(nay_balance),
        abstain_votes: branch_votes(abstain_balance),
    })
}

fn branch_votes(balance: Uint128) -> Uint128 {
    Uint128::new(balance.u128() / SPLIT_VOTE_DIVISOR)
}
