use std::collections::BTreeMap;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::conviction::{lock_multiplier, Conviction};
use crate::tally::TallyOutcome;
use crate::types::{AccountVote, TrackVotes, UnlockAt, VoteLock};

/// Lock left behind by `vote` once `tally` is known.
///
/// Conviction only extends the lock when a standard vote sided with the
/// outcome. Killed, cancelled and timed-out referenda release immediately.
/// Returns `None` when the vote commits no balance.
pub fn compute_lock(
    ref_id: u32,
    track: u16,
    vote: &AccountVote,
    tally: &TallyOutcome,
    lock_period: u64,
    multipliers: &[u64],
) -> Option<VoteLock> {
    let total_balance = vote.total_balance();
    if total_balance.is_zero() {
        return None;
    }

    let conviction_index = match (vote, tally) {
        (AccountVote::Standard { aye: true, conviction, .. }, TallyOutcome::Approved { .. })
        | (AccountVote::Standard { aye: false, conviction, .. }, TallyOutcome::Rejected { .. }) => {
            *conviction
        }
        _ => 0,
    };

    let unlock_at = match tally {
        TallyOutcome::Ongoing => UnlockAt::Indefinite,
        TallyOutcome::Killed { block }
        | TallyOutcome::Cancelled { block }
        | TallyOutcome::TimedOut { block } => UnlockAt::Block(*block),
        TallyOutcome::Approved { block } | TallyOutcome::Rejected { block } => {
            let extension =
                lock_period.saturating_mul(lock_multiplier(multipliers, conviction_index));
            UnlockAt::Block(block.saturating_add(extension))
        }
    };

    Some(VoteLock {
        ref_id,
        track,
        total_balance,
        conviction: Conviction::from_index(conviction_index).unwrap_or_default(),
        unlock_at,
    })
}

/// Locks for every vote whose referendum appears in `referenda`, ordered by
/// track then referendum. Votes on referenda missing from the snapshot are
/// skipped.
pub fn compute_all_locks(
    votes_by_track: &[TrackVotes],
    referenda: &BTreeMap<u32, TallyOutcome>,
    lock_period: u64,
    multipliers: &[u64],
) -> Vec<VoteLock> {
    let mut locks: Vec<VoteLock> = votes_by_track
        .iter()
        .flat_map(|track_votes| {
            track_votes.votes.iter().filter_map(move |entry| {
                let tally = referenda.get(&entry.ref_id)?;
                compute_lock(
                    entry.ref_id,
                    track_votes.track,
                    &entry.vote,
                    tally,
                    lock_period,
                    multipliers,
                )
            })
        })
        .collect();
    locks.sort_by_key(|lock| (lock.track, lock.ref_id));
    locks
}

#[cw_serde]
#[derive(Default)]
pub struct LockSummary {
    /// Largest balance held by any lock; locks on one account overlap.
    pub total_locked: Uint128,
    /// Amount freed by removing every expired lock at `current_block`.
    pub unlockable: Uint128,
    pub still_locked: Uint128,
    /// Nearest future unlock block, ignoring indefinite locks.
    pub next_unlock: Option<u64>,
    pub unlockable_refs: Vec<u32>,
}

pub fn summarize_locks(locks: &[VoteLock], current_block: u64) -> LockSummary {
    let total_locked = locks
        .iter()
        .map(|lock| lock.total_balance)
        .max()
        .unwrap_or_default();

    let still_locked = locks
        .iter()
        .filter(|lock| !lock.unlock_at.is_unlocked_at(current_block))
        .map(|lock| lock.total_balance)
        .max()
        .unwrap_or_default();

    let next_unlock = locks
        .iter()
        .filter_map(|lock| lock.unlock_at.block())
        .filter(|block| *block > current_block)
        .min();

    let mut unlockable_refs: Vec<u32> = locks
        .iter()
        .filter(|lock| lock.unlock_at.is_unlocked_at(current_block))
        .map(|lock| lock.ref_id)
        .collect();
    unlockable_refs.sort_unstable();
    unlockable_refs.dedup();

    LockSummary {
        total_locked,
        unlockable: total_locked - still_locked,
        still_locked,
        next_unlock,
        unlockable_refs,
    }
}
