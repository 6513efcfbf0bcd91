pub mod conviction;
pub mod curve;
pub mod delegation;
pub mod error;
pub mod lock;
pub mod period;
pub mod tally;
pub mod types;

pub use conviction::{lock_multiplier, Conviction, DEFAULT_CONVICTION_MULTIPLIERS};
pub use curve::{
    build_curve, decision_fraction, sample_curve, Curve, CurveConfig, CurvePoint,
    TrackCurveParams,
};
pub use delegation::{
    format_cohort_vote, normalize_vote, tally_by_side, DelegatedCohortVote, VoteRecord,
};
pub use error::EngineError;
pub use lock::{compute_all_locks, compute_lock, summarize_locks, LockSummary};
pub use period::{
    decision_progress, progress, progress_label, LifecyclePeriod, PeriodSpec, ProgressLabel,
    TrackPeriods,
};
pub use tally::TallyOutcome;
pub use types::{AccountVote, ReferendumVote, TrackVotes, UnlockAt, VoteLock};
