use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;

use crate::error::EngineError;

/// The runtime expresses thresholds as perbill (parts per 10^9).
pub const PERBILL: i128 = 1_000_000_000;

/// Decimal atomics are scaled by 10^18; dividing by 10^9 yields perbill.
const ATOMICS_PER_PERBILL: u128 = 1_000_000_000;

/// `factor / (x + x_offset) + y_offset`, all values in perbill.
#[cw_serde]
#[derive(Copy, Eq)]
pub struct ReciprocalParams {
    pub factor: i64,
    pub x_offset: i64,
    pub y_offset: i64,
}

/// Falls linearly from `ceil` to `floor` over the first `length` of the
/// decision period, then stays at `floor`. All values in perbill.
#[cw_serde]
#[derive(Copy, Eq)]
pub struct LinearDecreasingParams {
    pub length: u32,
    pub floor: u32,
    pub ceil: u32,
}

/// Curve definition as published by network configuration and indexers:
/// at most one of the shapes is populated.
#[cw_serde]
#[derive(Default)]
pub struct CurveConfig {
    pub reciprocal: Option<ReciprocalParams>,
    pub linear_decreasing: Option<LinearDecreasingParams>,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum TrackCurveParams {
    Reciprocal {
        factor: i64,
        x_offset: i64,
        y_offset: i64,
    },
    LinearDecreasing {
        length: u32,
        floor: u32,
        ceil: u32,
    },
}

impl CurveConfig {
    /// Resolve the populated shape.
    ///
    /// A config with neither or both shapes set, or with parameters the
    /// evaluator cannot work with, is an authoring mistake and is rejected.
    pub fn params(&self) -> Result<TrackCurveParams, EngineError> {
        match (&self.reciprocal, &self.linear_decreasing) {
            (Some(r), None) => {
                if r.x_offset <= 0 {
                    return Err(EngineError::InvalidCurve {
                        reason: format!("reciprocal x_offset must be positive, got {}", r.x_offset),
                    });
                }
                Ok(TrackCurveParams::Reciprocal {
                    factor: r.factor,
                    x_offset: r.x_offset,
                    y_offset: r.y_offset,
                })
            }
            (None, Some(l)) => {
                if l.length == 0 {
                    return Err(EngineError::InvalidCurve {
                        reason: "linear_decreasing length must be non-zero".to_string(),
                    });
                }
                if l.floor > l.ceil {
                    return Err(EngineError::InvalidCurve {
                        reason: format!(
                            "linear_decreasing floor ({}) exceeds ceil ({})",
                            l.floor, l.ceil
                        ),
                    });
                }
                Ok(TrackCurveParams::LinearDecreasing {
                    length: l.length,
                    floor: l.floor,
                    ceil: l.ceil,
                })
            }
            (None, None) => Err(EngineError::InvalidCurve {
                reason: "no curve shape populated".to_string(),
            }),
            (Some(_), Some(_)) => Err(EngineError::InvalidCurve {
                reason: "both reciprocal and linear_decreasing populated".to_string(),
            }),
        }
    }
}

/// A threshold function over the elapsed fraction of the decision period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Curve(TrackCurveParams);

/// Build the threshold function for a track, or `None` when the track
/// defines no curve for this threshold.
pub fn build_curve(params: Option<&TrackCurveParams>) -> Option<Curve> {
    params.copied().map(Curve)
}

impl Curve {
    pub fn params(&self) -> &TrackCurveParams {
        &self.0
    }

    /// Raw perbill at `fraction`, before the final clamp to zero. May be
    /// negative.
    ///
    /// Operation order mirrors the runtime's fixed-point math: multiply
    /// before divide, truncate after each division.
    pub fn perbill_at(&self, fraction: Decimal) -> i128 {
        let x = fraction_to_perbill(fraction);
        match self.0 {
            TrackCurveParams::Reciprocal {
                factor,
                x_offset,
                y_offset,
            } => {
                let denominator = x + x_offset as i128;
                // x_offset > 0 is enforced by CurveConfig::params.
                let v = (factor as i128 * PERBILL)
                    .checked_div(denominator)
                    .unwrap_or(0);
                v + y_offset as i128
            }
            TrackCurveParams::LinearDecreasing { length, floor, ceil } => {
                if length == 0 {
                    return ceil as i128;
                }
                let x = x.min(length as i128);
                let deducted = ((ceil as i128 - floor as i128) * x).div_euclid(length as i128);
                ceil as i128 - deducted
            }
        }
    }

    /// Required threshold at `fraction` of the decision period, never
    /// negative.
    pub fn threshold(&self, fraction: Decimal) -> Decimal {
        let perbill = self.perbill_at(fraction).max(0) as u128;
        Decimal::from_ratio(perbill, PERBILL as u128)
    }
}

fn fraction_to_perbill(fraction: Decimal) -> i128 {
    let clamped = fraction.min(Decimal::one());
    (clamped.atomics().u128() / ATOMICS_PER_PERBILL) as i128
}

#[cw_serde]
pub struct CurvePoint {
    pub fraction: Decimal,
    pub threshold: Decimal,
}

/// Evaluate `curve` at `samples + 1` evenly spaced fractions from 0 to 1.
pub fn sample_curve(curve: &Curve, samples: u32) -> Vec<CurvePoint> {
    if samples == 0 {
        return vec![CurvePoint {
            fraction: Decimal::zero(),
            threshold: curve.threshold(Decimal::zero()),
        }];
    }
    (0..=samples)
        .map(|i| {
            let fraction = Decimal::from_ratio(i, samples);
            CurvePoint {
                fraction,
                threshold: curve.threshold(fraction),
            }
        })
        .collect()
}

/// Elapsed fraction of a decision period that started at `deciding_since`.
pub fn decision_fraction(deciding_since: u64, decision_period: u64, current_block: u64) -> Decimal {
    if decision_period == 0 {
        return Decimal::one();
    }
    let elapsed = current_block
        .saturating_sub(deciding_since)
        .min(decision_period);
    Decimal::from_ratio(elapsed, decision_period)
}
