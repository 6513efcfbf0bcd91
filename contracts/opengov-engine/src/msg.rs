use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Decimal, Timestamp};
use opengov_common::curve::CurvePoint;
use opengov_common::{
    AccountVote, DelegatedCohortVote, LifecyclePeriod, LockSummary, PeriodSpec, ProgressLabel,
    TallyOutcome, TrackVotes, VoteLock, VoteRecord,
};

use crate::state::{EngineConfig, TrackInfo};

#[cw_serde]
pub struct InstantiateMsg {
    pub network: String,
    pub block_time_ms: u64,
    pub vote_locking_period: u64,
    /// Defaults to [0, 1, 2, 4, 8, 16, 32]
    pub conviction_multipliers: Option<Vec<u64>>,
    pub tracks: Vec<TrackInfo>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Update engine configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        block_time_ms: Option<u64>,
        vote_locking_period: Option<u64>,
        conviction_multipliers: Option<Vec<u64>>,
    },
    /// Add or replace a track. Admin only.
    SetTrack { track: TrackInfo },
    /// Remove a track. Admin only.
    RemoveTrack { track_id: u16 },
}

#[cw_serde]
pub struct MigrateMsg {}

pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub block_time_ms: Option<u64>,
    pub vote_locking_period: Option<u64>,
    pub conviction_multipliers: Option<Vec<u64>>,
}

/// Referendum status as reported by the indexer.
#[cw_serde]
pub struct ReferendumStatusEntry {
    pub index: u32,
    pub status: String,
    /// Block the status was reached at; required for terminal statuses
    pub block: Option<u64>,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(EngineConfig)]
    Config {},
    #[returns(TrackInfo)]
    Track { track_id: u16 },
    #[returns(TracksResponse)]
    Tracks {
        start_after: Option<u16>,
        limit: Option<u32>,
    },
    /// Approval and support required at `fraction` of the decision period.
    #[returns(ThresholdsResponse)]
    Thresholds { track_id: u16, fraction: Decimal },
    /// Chart points for both curves. Defaults to one sample per hour of the
    /// decision period.
    #[returns(CurvePointsResponse)]
    CurvePoints { track_id: u16, samples: Option<u32> },
    /// Decision progress and current thresholds. `current_block` defaults to
    /// the block height.
    #[returns(DecisionStatusResponse)]
    DecisionStatus {
        track_id: u16,
        deciding_since: u64,
        current_block: Option<u64>,
    },
    #[returns(ProgressResponse)]
    Progress { period: PeriodSpec },
    /// Progress through a lifecycle period of a track ending at `end_at`.
    #[returns(ProgressResponse)]
    PeriodProgress {
        track_id: u16,
        period: LifecyclePeriod,
        end_at: Option<Timestamp>,
    },
    #[returns(Option<VoteLock>)]
    Lock {
        ref_id: u32,
        track: u16,
        vote: AccountVote,
        tally: TallyOutcome,
    },
    #[returns(Vec<VoteLock>)]
    Locks {
        votes: Vec<TrackVotes>,
        referenda: Vec<ReferendumStatusEntry>,
    },
    #[returns(LockSummary)]
    UnlockSummary {
        votes: Vec<TrackVotes>,
        referenda: Vec<ReferendumStatusEntry>,
        current_block: Option<u64>,
    },
    #[returns(Vec<AccountVote>)]
    NormalizeVote { vote: VoteRecord },
    #[returns(DelegatedCohortVote)]
    CohortVote { vote: VoteRecord },
}

#[cw_serde]
pub struct TracksResponse {
    pub tracks: Vec<TrackInfo>,
}

/// `None` means the track defines no such threshold.
#[cw_serde]
pub struct ThresholdsResponse {
    pub track_id: u16,
    pub fraction: Decimal,
    pub approval: Option<Decimal>,
    pub support: Option<Decimal>,
}

#[cw_serde]
pub struct CurvePointsResponse {
    pub track_id: u16,
    pub approval: Option<Vec<CurvePoint>>,
    pub support: Option<Vec<CurvePoint>>,
}

#[cw_serde]
pub struct DecisionStatusResponse {
    pub track_id: u16,
    pub fraction: Decimal,
    /// Percent of the decision period elapsed
    pub progress: Decimal,
    pub approval: Option<Decimal>,
    pub support: Option<Decimal>,
}

#[cw_serde]
pub struct ProgressResponse {
    /// Percent elapsed, 0 to 100
    pub percent: Decimal,
    pub label: ProgressLabel,
    pub label_text: String,
}
