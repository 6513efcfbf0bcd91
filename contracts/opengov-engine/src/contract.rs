use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};
use opengov_common::DEFAULT_CONVICTION_MULTIPLIERS;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{EngineConfig, CONFIG, TRACKS};

const CONTRACT_NAME: &str = "crates.io:opengov-engine";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_block_time(msg.block_time_ms)?;
    execute::validate_vote_locking_period(msg.vote_locking_period)?;

    let conviction_multipliers = msg
        .conviction_multipliers
        .unwrap_or_else(|| DEFAULT_CONVICTION_MULTIPLIERS.to_vec());
    execute::validate_multipliers(&conviction_multipliers)?;

    let config = EngineConfig {
        admin: info.sender.clone(),
        network: msg.network,
        block_time_ms: msg.block_time_ms,
        vote_locking_period: msg.vote_locking_period,
        conviction_multipliers,
    };
    CONFIG.save(deps.storage, &config)?;

    let track_count = msg.tracks.len();
    for track in msg.tracks {
        execute::validate_track(&track)?;
        if TRACKS.has(deps.storage, track.id) {
            return Err(ContractError::DuplicateTrack { track_id: track.id });
        }
        TRACKS.save(deps.storage, track.id, &track)?;
    }

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "opengov-engine")
        .add_attribute("network", config.network)
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("tracks", track_count.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateConfig {
            admin,
            block_time_ms,
            vote_locking_period,
            conviction_multipliers,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                block_time_ms,
                vote_locking_period,
                conviction_multipliers,
            },
        ),
        ExecuteMsg::SetTrack { track } => execute::set_track(deps, env, info, track),
        ExecuteMsg::RemoveTrack { track_id } => execute::remove_track(deps, env, info, track_id),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Track { track_id } => query::query_track(deps, track_id),
        QueryMsg::Tracks { start_after, limit } => query::query_tracks(deps, start_after, limit),
        QueryMsg::Thresholds { track_id, fraction } => {
            query::query_thresholds(deps, track_id, fraction)
        }
        QueryMsg::CurvePoints { track_id, samples } => {
            query::query_curve_points(deps, track_id, samples)
        }
        QueryMsg::DecisionStatus {
            track_id,
            deciding_since,
            current_block,
        } => query::query_decision_status(deps, env, track_id, deciding_since, current_block),
        QueryMsg::Progress { period } => query::query_progress(env, period),
        QueryMsg::PeriodProgress {
            track_id,
            period,
            end_at,
        } => query::query_period_progress(deps, env, track_id, period, end_at),
        QueryMsg::Lock {
            ref_id,
            track,
            vote,
            tally,
        } => query::query_lock(deps, ref_id, track, vote, tally),
        QueryMsg::Locks { votes, referenda } => query::query_locks(deps, votes, referenda),
        QueryMsg::UnlockSummary {
            votes,
            referenda,
            current_block,
        } => query::query_unlock_summary(deps, env, votes, referenda, current_block),
        QueryMsg::NormalizeVote { vote } => query::query_normalize_vote(vote),
        QueryMsg::CohortVote { vote } => query::query_cohort_vote(vote),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
