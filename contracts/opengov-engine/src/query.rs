use std::collections::BTreeMap;

use cosmwasm_std::{to_json_binary, Binary, Decimal, Deps, Env, Order, StdError, StdResult, Timestamp};
use cw_storage_plus::Bound;
use opengov_common::curve::{decision_fraction, sample_curve, Curve};
use opengov_common::{
    compute_all_locks, compute_lock, decision_progress, format_cohort_vote, normalize_vote,
    progress, progress_label, summarize_locks, AccountVote, EngineError, LifecyclePeriod,
    PeriodSpec, TallyOutcome, TrackVotes, VoteLock, VoteRecord,
};

use crate::msg::{
    CurvePointsResponse, DecisionStatusResponse, ProgressResponse, ReferendumStatusEntry,
    ThresholdsResponse, TracksResponse,
};
use crate::state::{EngineConfig, TrackInfo, CONFIG, TRACKS};

/// Upper bound on chart samples per curve.
const MAX_CURVE_SAMPLES: u32 = 1_000;
const MILLIS_PER_HOUR: u128 = 3_600_000;

fn engine_err(err: EngineError) -> StdError {
    StdError::generic_err(err.to_string())
}

fn load_track(deps: Deps, track_id: u16) -> StdResult<TrackInfo> {
    TRACKS
        .may_load(deps.storage, track_id)?
        .ok_or_else(|| StdError::not_found(format!("track {}", track_id)))
}

fn curves(track: &TrackInfo) -> StdResult<(Option<Curve>, Option<Curve>)> {
    let approval = track.approval_curve().map_err(engine_err)?;
    let support = track.support_curve().map_err(engine_err)?;
    Ok((approval, support))
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_track(deps: Deps, track_id: u16) -> StdResult<Binary> {
    let track = load_track(deps, track_id)?;
    to_json_binary(&track)
}

pub fn query_tracks(deps: Deps, start_after: Option<u16>, limit: Option<u32>) -> StdResult<Binary> {
    let limit = limit.unwrap_or(50).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let tracks: Vec<TrackInfo> = TRACKS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, track)| track)
        .collect();

    to_json_binary(&TracksResponse { tracks })
}

pub fn query_thresholds(deps: Deps, track_id: u16, fraction: Decimal) -> StdResult<Binary> {
    let track = load_track(deps, track_id)?;
    let (approval, support) = curves(&track)?;

    to_json_binary(&ThresholdsResponse {
        track_id,
        fraction,
        approval: approval.map(|curve| curve.threshold(fraction)),
        support: support.map(|curve| curve.threshold(fraction)),
    })
}

pub fn query_curve_points(deps: Deps, track_id: u16, samples: Option<u32>) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let track = load_track(deps, track_id)?;
    let (approval, support) = curves(&track)?;

    let samples = samples
        .unwrap_or_else(|| decision_hours(&config, &track))
        .clamp(1, MAX_CURVE_SAMPLES);

    to_json_binary(&CurvePointsResponse {
        track_id,
        approval: approval.map(|curve| sample_curve(&curve, samples)),
        support: support.map(|curve| sample_curve(&curve, samples)),
    })
}

fn decision_hours(config: &EngineConfig, track: &TrackInfo) -> u32 {
    let millis = track.periods.decision_period as u128 * config.block_time_ms as u128;
    u32::try_from(millis / MILLIS_PER_HOUR).unwrap_or(u32::MAX)
}

pub fn query_decision_status(
    deps: Deps,
    env: Env,
    track_id: u16,
    deciding_since: u64,
    current_block: Option<u64>,
) -> StdResult<Binary> {
    let track = load_track(deps, track_id)?;
    let (approval, support) = curves(&track)?;

    let current_block = current_block.unwrap_or(env.block.height);
    let decision_period = track.periods.decision_period;
    let fraction = decision_fraction(deciding_since, decision_period, current_block);

    to_json_binary(&DecisionStatusResponse {
        track_id,
        fraction,
        progress: decision_progress(deciding_since, decision_period, current_block),
        approval: approval.map(|curve| curve.threshold(fraction)),
        support: support.map(|curve| curve.threshold(fraction)),
    })
}

fn progress_response(period: &PeriodSpec, now: Timestamp) -> ProgressResponse {
    let label = progress_label(period, now);
    ProgressResponse {
        percent: progress(period, now),
        label_text: label.to_string(),
        label,
    }
}

pub fn query_progress(env: Env, period: PeriodSpec) -> StdResult<Binary> {
    to_json_binary(&progress_response(&period, env.block.time))
}

pub fn query_period_progress(
    deps: Deps,
    env: Env,
    track_id: u16,
    period: LifecyclePeriod,
    end_at: Option<Timestamp>,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let track = load_track(deps, track_id)?;

    let spec = track.periods.spec(period, end_at, config.block_time_ms);
    to_json_binary(&progress_response(&spec, env.block.time))
}

pub fn query_lock(
    deps: Deps,
    ref_id: u32,
    track: u16,
    vote: AccountVote,
    tally: TallyOutcome,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let lock = compute_lock(
        ref_id,
        track,
        &vote,
        &tally,
        config.vote_locking_period,
        &config.conviction_multipliers,
    );
    to_json_binary(&lock)
}

/// Outcomes keyed by referendum. Entries with an unrecognised status are
/// left out, so votes on them produce no lock.
fn outcomes(referenda: &[ReferendumStatusEntry]) -> BTreeMap<u32, TallyOutcome> {
    referenda
        .iter()
        .filter_map(|entry| {
            TallyOutcome::from_status(&entry.status, entry.block).map(|outcome| (entry.index, outcome))
        })
        .collect()
}

fn locks(
    config: &EngineConfig,
    votes: &[TrackVotes],
    referenda: &[ReferendumStatusEntry],
) -> Vec<VoteLock> {
    compute_all_locks(
        votes,
        &outcomes(referenda),
        config.vote_locking_period,
        &config.conviction_multipliers,
    )
}

pub fn query_locks(
    deps: Deps,
    votes: Vec<TrackVotes>,
    referenda: Vec<ReferendumStatusEntry>,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&locks(&config, &votes, &referenda))
}

pub fn query_unlock_summary(
    deps: Deps,
    env: Env,
    votes: Vec<TrackVotes>,
    referenda: Vec<ReferendumStatusEntry>,
    current_block: Option<u64>,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let vote_locks = locks(&config, &votes, &referenda);
    let summary = summarize_locks(&vote_locks, current_block.unwrap_or(env.block.height));
    to_json_binary(&summary)
}

pub fn query_normalize_vote(vote: VoteRecord) -> StdResult<Binary> {
    to_json_binary(&normalize_vote(&vote))
}

pub fn query_cohort_vote(vote: VoteRecord) -> StdResult<Binary> {
    let cohort = format_cohort_vote(&vote).map_err(engine_err)?;
    to_json_binary(&cohort)
}
