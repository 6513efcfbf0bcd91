use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response};
use opengov_common::DEFAULT_CONVICTION_MULTIPLIERS;

use crate::error::ContractError;
use crate::msg::UpdateConfigParams;
use crate::state::{EngineConfig, TrackInfo, CONFIG, TRACKS};

pub fn validate_block_time(block_time_ms: u64) -> Result<(), ContractError> {
    if block_time_ms == 0 {
        return Err(ContractError::InvalidBlockTime);
    }
    Ok(())
}

pub fn validate_vote_locking_period(blocks: u64) -> Result<(), ContractError> {
    if blocks == 0 {
        return Err(ContractError::InvalidVoteLockingPeriod);
    }
    Ok(())
}

/// One multiplier per conviction level, `None` through `Locked6x`.
pub fn validate_multipliers(multipliers: &[u64]) -> Result<(), ContractError> {
    if multipliers.len() != DEFAULT_CONVICTION_MULTIPLIERS.len() {
        return Err(ContractError::InvalidMultipliers {
            len: multipliers.len(),
        });
    }
    Ok(())
}

/// Reject tracks whose curves cannot be evaluated or whose decision period
/// is empty.
pub fn validate_track(track: &TrackInfo) -> Result<(), ContractError> {
    if track.name.trim().is_empty() {
        return Err(ContractError::InvalidTrack {
            track_id: track.id,
            reason: "name must not be empty".to_string(),
        });
    }
    if track.periods.decision_period == 0 {
        return Err(ContractError::InvalidTrack {
            track_id: track.id,
            reason: "decision period must be non-zero".to_string(),
        });
    }
    track.approval_curve()?;
    track.support_curve()?;
    Ok(())
}

/// Add or replace a track. Admin only.
pub fn set_track(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    track: TrackInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can set tracks".to_string(),
        });
    }

    validate_track(&track)?;

    let replaced = TRACKS.has(deps.storage, track.id);
    TRACKS.save(deps.storage, track.id, &track)?;

    Ok(Response::new()
        .add_attribute("action", "set_track")
        .add_attribute("track_id", track.id.to_string())
        .add_event(
            Event::new("opengov_track_set")
                .add_attribute("network", config.network)
                .add_attribute("track_id", track.id.to_string())
                .add_attribute("name", track.name)
                .add_attribute("decision_period", track.periods.decision_period.to_string())
                .add_attribute("replaced", replaced.to_string()),
        ))
}

/// Remove a track. Admin only.
pub fn remove_track(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    track_id: u16,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can remove tracks".to_string(),
        });
    }

    if !TRACKS.has(deps.storage, track_id) {
        return Err(ContractError::TrackNotFound { track_id });
    }
    TRACKS.remove(deps.storage, track_id);

    Ok(Response::new()
        .add_attribute("action", "remove_track")
        .add_attribute("track_id", track_id.to_string())
        .add_event(
            Event::new("opengov_track_removed")
                .add_attribute("network", config.network)
                .add_attribute("track_id", track_id.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        block_time_ms,
        vote_locking_period,
        conviction_multipliers,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(block_time_ms) = block_time_ms {
        validate_block_time(block_time_ms)?;
        config.block_time_ms = block_time_ms;
    }
    if let Some(blocks) = vote_locking_period {
        validate_vote_locking_period(blocks)?;
        config.vote_locking_period = blocks;
    }
    if let Some(multipliers) = conviction_multipliers {
        validate_multipliers(&multipliers)?;
        config.conviction_multipliers = multipliers;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(config_event(&config)))
}

fn config_event(config: &EngineConfig) -> Event {
    let multipliers = config
        .conviction_multipliers
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    Event::new("opengov_config_updated")
        .add_attribute("network", config.network.clone())
        .add_attribute("admin", config.admin.to_string())
        .add_attribute("block_time_ms", config.block_time_ms.to_string())
        .add_attribute("vote_locking_period", config.vote_locking_period.to_string())
        .add_attribute("conviction_multipliers", multipliers)
}
