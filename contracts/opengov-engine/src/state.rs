use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};
use opengov_common::curve::{build_curve, Curve, CurveConfig};
use opengov_common::{EngineError, TrackPeriods};

pub const CONFIG: Item<EngineConfig> = Item::new("config");
pub const TRACKS: Map<u16, TrackInfo> = Map::new("tracks");

#[cw_serde]
pub struct EngineConfig {
    pub admin: Addr,
    /// Network the track set belongs to, e.g. "polkadot"
    pub network: String,
    /// Expected block time in milliseconds
    pub block_time_ms: u64,
    /// Base conviction-voting lock in blocks
    pub vote_locking_period: u64,
    /// Lock-period multiplier per conviction level
    pub conviction_multipliers: Vec<u64>,
}

#[cw_serde]
pub struct TrackInfo {
    pub id: u16,
    pub name: String,
    pub max_deciding: u32,
    pub decision_deposit: Uint128,
    pub periods: TrackPeriods,
    pub min_approval: Option<CurveConfig>,
    pub min_support: Option<CurveConfig>,
}

impl TrackInfo {
    pub fn approval_curve(&self) -> Result<Option<Curve>, EngineError> {
        resolve_curve(self.min_approval.as_ref())
    }

    pub fn support_curve(&self) -> Result<Option<Curve>, EngineError> {
        resolve_curve(self.min_support.as_ref())
    }
}

fn resolve_curve(config: Option<&CurveConfig>) -> Result<Option<Curve>, EngineError> {
    let params = config.map(CurveConfig::params).transpose()?;
    Ok(build_curve(params.as_ref()))
}
