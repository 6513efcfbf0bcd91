use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Timestamp};

use crate::curve::decision_fraction;

pub const SECONDS_PER_DAY: u64 = 86_400;
const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 1_440;
const MILLIS_PER_DAY: u128 = 86_400_000;
/// Decimal atomics per whole unit (10^18).
const DECIMAL_FRACTIONAL: u128 = 1_000_000_000_000_000_000;
const HUNDRED: Decimal = Decimal::raw(100 * DECIMAL_FRACTIONAL);

/// A lifecycle period ending at `end_at`. `end_at = None` means the period
/// has not started yet.
#[cw_serde]
pub struct PeriodSpec {
    pub end_at: Option<Timestamp>,
    pub duration_days: Decimal,
}

impl PeriodSpec {
    /// Duration resolved to the nearest whole second.
    pub fn duration_seconds(&self) -> u64 {
        let atomics = self.duration_days.atomics().u128();
        let seconds = atomics
            .saturating_mul(SECONDS_PER_DAY as u128)
            .saturating_add(DECIMAL_FRACTIONAL / 2)
            / DECIMAL_FRACTIONAL;
        u64::try_from(seconds).unwrap_or(u64::MAX)
    }

    pub fn total_minutes(&self) -> u64 {
        self.duration_seconds() / 60
    }

    pub fn start_at(&self) -> Option<Timestamp> {
        self.end_at
            .map(|end| Timestamp::from_seconds(end.seconds().saturating_sub(self.duration_seconds())))
    }

    /// Whole minutes elapsed since the start, clamped to the period.
    pub fn elapsed_minutes(&self, now: Timestamp) -> u64 {
        match self.start_at() {
            Some(start) => {
                let elapsed = now.seconds().saturating_sub(start.seconds()) / 60;
                elapsed.min(self.total_minutes())
            }
            None => 0,
        }
    }
}

/// Percentage of the period elapsed at `now`, in `[0, 100]`, at minute
/// granularity.
pub fn progress(spec: &PeriodSpec, now: Timestamp) -> Decimal {
    let (Some(end), Some(start)) = (spec.end_at, spec.start_at()) else {
        return Decimal::zero();
    };
    if now >= end {
        return HUNDRED;
    }
    if now <= start {
        return Decimal::zero();
    }
    let total = spec.total_minutes();
    if total == 0 {
        return Decimal::zero();
    }
    let elapsed = (now.seconds() - start.seconds()) / 60;
    Decimal::from_ratio(elapsed.min(total) as u128 * 100, total as u128)
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }
}

#[cw_serde]
pub struct ProgressLabel {
    pub elapsed: u64,
    pub total: u64,
    pub unit: TimeUnit,
}

impl fmt::Display for ProgressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.elapsed, self.total, self.unit.as_str())
    }
}

/// Elapsed and total time in the coarsest unit that keeps the total above
/// one. Each value is rounded half-up on its own.
pub fn progress_label(spec: &PeriodSpec, now: Timestamp) -> ProgressLabel {
    let total = spec.total_minutes();
    let elapsed = spec.elapsed_minutes(now);

    let (unit, per_unit) = if total < MINUTES_PER_HOUR {
        (TimeUnit::Minutes, 1)
    } else if total < MINUTES_PER_DAY {
        (TimeUnit::Hours, MINUTES_PER_HOUR)
    } else {
        (TimeUnit::Days, MINUTES_PER_DAY)
    };

    ProgressLabel {
        elapsed: round_half_up(elapsed, per_unit),
        total: round_half_up(total, per_unit),
        unit,
    }
}

fn round_half_up(minutes: u64, per_unit: u64) -> u64 {
    (minutes + per_unit / 2) / per_unit
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum LifecyclePeriod {
    Prepare,
    Decision,
    Confirm,
    Enactment,
}

/// Length of each lifecycle phase of a track, in blocks.
#[cw_serde]
#[derive(Copy, Eq, Default)]
pub struct TrackPeriods {
    pub prepare_period: u64,
    pub decision_period: u64,
    pub confirm_period: u64,
    pub min_enactment_period: u64,
}

impl TrackPeriods {
    pub fn blocks(&self, period: LifecyclePeriod) -> u64 {
        match period {
            LifecyclePeriod::Prepare => self.prepare_period,
            LifecyclePeriod::Decision => self.decision_period,
            LifecyclePeriod::Confirm => self.confirm_period,
            LifecyclePeriod::Enactment => self.min_enactment_period,
        }
    }

    pub fn spec(
        &self,
        period: LifecyclePeriod,
        end_at: Option<Timestamp>,
        block_time_ms: u64,
    ) -> PeriodSpec {
        PeriodSpec {
            end_at,
            duration_days: blocks_to_days(self.blocks(period), block_time_ms),
        }
    }
}

pub fn blocks_to_days(blocks: u64, block_time_ms: u64) -> Decimal {
    Decimal::from_ratio(blocks as u128 * block_time_ms as u128, MILLIS_PER_DAY)
}

/// Decision-period progress in percent, measured in blocks.
pub fn decision_progress(deciding_since: u64, decision_period: u64, current_block: u64) -> Decimal {
    decision_fraction(deciding_since, decision_period, current_block) * HUNDRED
}
