//! Integration tests for the OpenGov engine.
//!
//! These tests drive the `opengov-engine` contract through its
//! `instantiate` / `execute` / `query` entry points using
//! `cosmwasm_std::testing` mocks, with track data configured the way an
//! operator would submit it: as JSON.
//!
//! Run:
//! ```bash
//! cargo test -p opengov-integration-tests
//! ```

use std::str::FromStr;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Decimal, Env, MemoryStorage, OwnedDeps, Timestamp, Uint128};
use opengov_common::delegation::VoteShape;
use opengov_common::{
    normalize_vote, tally_by_side, AccountVote, Conviction, DelegatedCohortVote, EngineError,
    LifecyclePeriod, LockSummary, ReferendumVote, TallyOutcome, TrackVotes, UnlockAt, VoteLock,
    VoteRecord,
};
use opengov_engine::msg::{
    CurvePointsResponse, DecisionStatusResponse, ExecuteMsg, InstantiateMsg, ProgressResponse,
    QueryMsg, ReferendumStatusEntry, ThresholdsResponse, TracksResponse,
};
use opengov_engine::state::{EngineConfig, TrackInfo};

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

/// Planck per DOT
const DOT: u128 = 10_000_000_000;

/// Polkadot conviction-voting lock period: 28 days of 6s blocks
const VOTE_LOCKING_PERIOD: u64 = 403_200;

const NOW: u64 = 1_700_000_000;

/// Root, Treasurer and SmallTipper as an operator would configure them.
const POLKADOT_INSTANTIATE_JSON: &str = r#"{
    "network": "polkadot",
    "block_time_ms": 6000,
    "vote_locking_period": 403200,
    "conviction_multipliers": null,
    "tracks": [
        {
            "id": 0,
            "name": "root",
            "max_deciding": 1,
            "decision_deposit": "1000000000000000",
            "periods": {
                "prepare_period": 1200,
                "decision_period": 403200,
                "confirm_period": 14400,
                "min_enactment_period": 14400
            },
            "min_approval": {
                "reciprocal": {"factor": 222222224, "x_offset": 333333335, "y_offset": 333333332}
            },
            "min_support": {
                "linear_decreasing": {"length": 1000000000, "floor": 0, "ceil": 500000000}
            }
        },
        {
            "id": 11,
            "name": "treasurer",
            "max_deciding": 10,
            "decision_deposit": "10000000000000",
            "periods": {
                "prepare_period": 1200,
                "decision_period": 403200,
                "confirm_period": 1200,
                "min_enactment_period": 14400
            },
            "min_approval": {
                "linear_decreasing": {"length": 1000000000, "floor": 500000000, "ceil": 1000000000}
            },
            "min_support": {
                "reciprocal": {"factor": 7892829, "x_offset": 15544040, "y_offset": -7772020}
            }
        },
        {
            "id": 30,
            "name": "small_tipper",
            "max_deciding": 200,
            "decision_deposit": "10000000000",
            "periods": {
                "prepare_period": 10,
                "decision_period": 100800,
                "confirm_period": 100,
                "min_enactment_period": 10
            },
            "min_approval": {
                "linear_decreasing": {"length": 1000000000, "floor": 500000000, "ceil": 1000000000}
            },
            "min_support": null
        }
    ]
}"#;

// ─── Helpers ───

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn env_at(seconds: u64, height: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(seconds);
    env.block.height = height;
    env
}

fn setup_engine(deps: &mut Deps) {
    let admin = deps.api.addr_make("admin");
    let msg: InstantiateMsg = serde_json::from_str(POLKADOT_INSTANTIATE_JSON).unwrap();
    let info = message_info(&admin, &[]);
    opengov_engine::contract::instantiate(deps.as_mut(), mock_env(), info, msg).unwrap();
}

fn query_at<T: serde::de::DeserializeOwned>(deps: &Deps, env: Env, msg: QueryMsg) -> T {
    from_json(opengov_engine::contract::query(deps.as_ref(), env, msg).unwrap()).unwrap()
}

fn decision_status(deps: &Deps, track_id: u16, deciding_since: u64, block: u64) -> DecisionStatusResponse {
    query_at(
        deps,
        mock_env(),
        QueryMsg::DecisionStatus {
            track_id,
            deciding_since,
            current_block: Some(block),
        },
    )
}

fn standard(balance: u128, aye: bool, conviction: u8) -> AccountVote {
    AccountVote::Standard {
        balance: Uint128::new(balance),
        aye,
        conviction,
    }
}

fn status(index: u32, status: &str, block: Option<u64>) -> ReferendumStatusEntry {
    ReferendumStatusEntry {
        index,
        status: status.to_string(),
        block,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_track_registry_from_json() {
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let config: EngineConfig = query_at(&deps, mock_env(), QueryMsg::Config {});
    assert_eq!(config.network, "polkadot");
    assert_eq!(config.conviction_multipliers, vec![0, 1, 2, 4, 8, 16, 32]);

    // Page through tracks one at a time
    let first: TracksResponse = query_at(
        &deps,
        mock_env(),
        QueryMsg::Tracks {
            start_after: None,
            limit: Some(1),
        },
    );
    assert_eq!(first.tracks.len(), 1);
    assert_eq!(first.tracks[0].name, "root");

    let rest: TracksResponse = query_at(
        &deps,
        mock_env(),
        QueryMsg::Tracks {
            start_after: Some(first.tracks[0].id),
            limit: None,
        },
    );
    let ids: Vec<u16> = rest.tracks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![11, 30]);

    let tipper: TrackInfo = query_at(&deps, mock_env(), QueryMsg::Track { track_id: 30 });
    assert!(tipper.min_support.is_none());
    assert_eq!(tipper.decision_deposit, Uint128::new(DOT));

    eprintln!("test_track_registry_from_json passed");
}

#[test]
fn test_root_referendum_decision_lifecycle() {
    // Follow a root referendum through its decision period and check the
    // thresholds it must clear at each stage.
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let deciding_since = 20_000_000;
    let decision_period = 403_200;

    // 1. Deciding just started: 100% approval, 50% support
    let start = decision_status(&deps, 0, deciding_since, deciding_since);
    assert_eq!(start.fraction, Decimal::zero());
    assert_eq!(start.progress, Decimal::zero());
    assert_eq!(start.approval, Some(Decimal::one()));
    assert_eq!(start.support, Some(dec("0.5")));

    // 2. A quarter of the way in
    let quarter = decision_status(&deps, 0, deciding_since, deciding_since + decision_period / 4);
    assert_eq!(quarter.fraction, dec("0.25"));
    assert_eq!(quarter.progress, Decimal::from_ratio(25u128, 1u128));
    assert_eq!(quarter.approval, Some(dec("0.714285714")));
    assert_eq!(quarter.support, Some(dec("0.375")));

    // 3. Three quarters
    let late = decision_status(&deps, 0, deciding_since, deciding_since + decision_period * 3 / 4);
    assert_eq!(late.approval, Some(dec("0.538461538")));
    assert_eq!(late.support, Some(dec("0.125")));

    // 4. Past the end the curves hold their final values
    let end = decision_status(&deps, 0, deciding_since, deciding_since + decision_period * 2);
    assert_eq!(end.fraction, Decimal::one());
    assert_eq!(end.progress, Decimal::from_ratio(100u128, 1u128));
    assert_eq!(end.approval, Some(dec("0.499999999")));
    assert_eq!(end.support, Some(Decimal::zero()));

    // 5. Before deciding starts nothing has elapsed
    let early = decision_status(&deps, 0, deciding_since, deciding_since - 100);
    assert_eq!(early.fraction, Decimal::zero());

    // 6. The same midpoint through the direct thresholds query
    let mid: ThresholdsResponse = query_at(
        &deps,
        mock_env(),
        QueryMsg::Thresholds {
            track_id: 0,
            fraction: dec("0.5"),
        },
    );
    assert_eq!(mid.approval, Some(dec("0.6")));
    assert_eq!(mid.support, Some(dec("0.25")));

    eprintln!("test_root_referendum_decision_lifecycle passed");
}

#[test]
fn test_reciprocal_support_clamps_at_zero() {
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let cases = [
        ("0", "0.500000026"),
        ("0.25", "0.021951219"),
        ("0.5", "0.007537688"),
        // Raw curve value is -1 perbill here
        ("1", "0"),
    ];
    for (fraction, expected) in cases {
        let res: ThresholdsResponse = query_at(
            &deps,
            mock_env(),
            QueryMsg::Thresholds {
                track_id: 11,
                fraction: dec(fraction),
            },
        );
        assert_eq!(res.support, Some(dec(expected)), "support at {fraction}");
    }

    eprintln!("test_reciprocal_support_clamps_at_zero passed");
}

#[test]
fn test_curve_points_are_non_increasing() {
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    for track_id in [0u16, 11, 30] {
        let points: CurvePointsResponse = query_at(
            &deps,
            mock_env(),
            QueryMsg::CurvePoints {
                track_id,
                samples: Some(50),
            },
        );
        for curve in [points.approval, points.support].into_iter().flatten() {
            assert_eq!(curve.len(), 51);
            for pair in curve.windows(2) {
                assert!(pair[0].fraction < pair[1].fraction);
                assert!(
                    pair[1].threshold <= pair[0].threshold,
                    "track {track_id} rose at {}",
                    pair[1].fraction
                );
            }
        }
    }

    eprintln!("test_curve_points_are_non_increasing passed");
}

#[test]
fn test_conviction_locks_follow_referendum_outcomes() {
    // One account votes on three referenda; locks are recomputed as the
    // indexer reports each referendum concluding.
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let votes = vec![
        TrackVotes {
            track: 0,
            votes: vec![ReferendumVote {
                ref_id: 100,
                vote: standard(500 * DOT, true, 1),
            }],
        },
        TrackVotes {
            track: 11,
            votes: vec![
                ReferendumVote {
                    ref_id: 101,
                    vote: standard(1_000 * DOT, false, 3),
                },
                ReferendumVote {
                    ref_id: 102,
                    vote: AccountVote::SplitAbstain {
                        aye: Uint128::new(100 * DOT),
                        nay: Uint128::new(100 * DOT),
                        abstain: Uint128::new(50 * DOT),
                    },
                },
            ],
        },
    ];

    // 1. Everything still deciding: every lock is indefinite
    let ongoing = vec![
        status(100, "Deciding", None),
        status(101, "ConfirmStarted", None),
        status(102, "Submitted", None),
    ];
    let locks: Vec<VoteLock> = query_at(
        &deps,
        mock_env(),
        QueryMsg::Locks {
            votes: votes.clone(),
            referenda: ongoing.clone(),
        },
    );
    assert_eq!(locks.len(), 3);
    assert!(locks.iter().all(|l| l.unlock_at == UnlockAt::Indefinite));

    let summary: LockSummary = query_at(
        &deps,
        env_at(NOW, 21_000_000),
        QueryMsg::UnlockSummary {
            votes: votes.clone(),
            referenda: ongoing,
            current_block: None,
        },
    );
    assert_eq!(summary.total_locked, Uint128::new(1_000 * DOT));
    assert_eq!(summary.unlockable, Uint128::zero());
    assert_eq!(summary.next_unlock, None);

    // 2. Outcomes arrive: 100 approved, 101 rejected, 102 killed
    let concluded = vec![
        status(100, "Executed", Some(21_000_000)),
        status(101, "Rejected", Some(21_100_000)),
        status(102, "Killed", Some(20_500_000)),
    ];
    let locks: Vec<VoteLock> = query_at(
        &deps,
        mock_env(),
        QueryMsg::Locks {
            votes: votes.clone(),
            referenda: concluded.clone(),
        },
    );
    let refs: Vec<u32> = locks.iter().map(|l| l.ref_id).collect();
    assert_eq!(refs, vec![100, 101, 102]);

    // Winning aye at 1x: one lock period
    assert_eq!(locks[0].conviction, Conviction::Locked1x);
    assert_eq!(
        locks[0].unlock_at,
        UnlockAt::Block(21_000_000 + VOTE_LOCKING_PERIOD)
    );
    // Winning nay at 3x: four lock periods
    assert_eq!(locks[1].conviction, Conviction::Locked3x);
    assert_eq!(
        locks[1].unlock_at,
        UnlockAt::Block(21_100_000 + 4 * VOTE_LOCKING_PERIOD)
    );
    // Killed releases at the kill block with the full split balance
    assert_eq!(locks[2].unlock_at, UnlockAt::Block(20_500_000));
    assert_eq!(locks[2].total_balance, Uint128::new(250 * DOT));

    // 3. Shortly after: only the killed referendum is free
    let summary: LockSummary = query_at(
        &deps,
        env_at(NOW, 21_200_000),
        QueryMsg::UnlockSummary {
            votes: votes.clone(),
            referenda: concluded.clone(),
            current_block: None,
        },
    );
    assert_eq!(summary.unlockable_refs, vec![102]);
    assert_eq!(summary.still_locked, Uint128::new(1_000 * DOT));
    assert_eq!(summary.unlockable, Uint128::zero());
    assert_eq!(summary.next_unlock, Some(21_000_000 + VOTE_LOCKING_PERIOD));

    // 4. Once the 1x lock expires the 3x lock still holds the larger balance
    let summary: LockSummary = query_at(
        &deps,
        mock_env(),
        QueryMsg::UnlockSummary {
            votes: votes.clone(),
            referenda: concluded.clone(),
            current_block: Some(21_000_000 + VOTE_LOCKING_PERIOD),
        },
    );
    assert_eq!(summary.unlockable_refs, vec![100, 102]);
    assert_eq!(summary.unlockable, Uint128::zero());

    // 5. Everything expired
    let summary: LockSummary = query_at(
        &deps,
        mock_env(),
        QueryMsg::UnlockSummary {
            votes,
            referenda: concluded,
            current_block: Some(30_000_000),
        },
    );
    assert_eq!(summary.unlockable, Uint128::new(1_000 * DOT));
    assert_eq!(summary.still_locked, Uint128::zero());
    assert_eq!(summary.next_unlock, None);

    eprintln!("test_conviction_locks_follow_referendum_outcomes passed");
}

#[test]
fn test_losing_side_and_malformed_statuses() {
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let votes = vec![TrackVotes {
        track: 30,
        votes: vec![
            // Lost: no conviction extension
            ReferendumVote {
                ref_id: 7,
                vote: standard(10 * DOT, true, 6),
            },
            // Terminal status without a block is ignored
            ReferendumVote {
                ref_id: 8,
                vote: standard(10 * DOT, true, 6),
            },
            // Unknown status is ignored
            ReferendumVote {
                ref_id: 9,
                vote: standard(10 * DOT, true, 6),
            },
            // Zero balance commits nothing
            ReferendumVote {
                ref_id: 10,
                vote: standard(0, true, 6),
            },
        ],
    }];
    let referenda = vec![
        status(7, "Rejected", Some(5_000)),
        status(8, "Approved", None),
        status(9, "Frozen", Some(5_000)),
        status(10, "Approved", Some(5_000)),
    ];

    let locks: Vec<VoteLock> = query_at(&deps, mock_env(), QueryMsg::Locks { votes, referenda });
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].ref_id, 7);
    assert_eq!(locks[0].conviction, Conviction::None);
    assert_eq!(locks[0].unlock_at, UnlockAt::Block(5_000));

    eprintln!("test_losing_side_and_malformed_statuses passed");
}

#[test]
fn test_lock_period_update_applies_to_new_queries() {
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let lock_query = || QueryMsg::Lock {
        ref_id: 43,
        track: 0,
        vote: standard(1_000, true, 2),
        tally: TallyOutcome::Approved { block: 900_000 },
    };

    let lock: Option<VoteLock> = query_at(&deps, mock_env(), lock_query());
    assert_eq!(
        lock.unwrap().unlock_at,
        UnlockAt::Block(900_000 + 2 * VOTE_LOCKING_PERIOD)
    );

    // Switch to Kusama-style 7 day locks and doubled multipliers
    let admin = deps.api.addr_make("admin");
    opengov_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        ExecuteMsg::UpdateConfig {
            admin: None,
            block_time_ms: None,
            vote_locking_period: Some(201_600),
            conviction_multipliers: Some(vec![0, 2, 4, 8, 16, 32, 64]),
        },
    )
    .unwrap();

    let lock: Option<VoteLock> = query_at(&deps, mock_env(), lock_query());
    assert_eq!(lock.unwrap().unlock_at, UnlockAt::Block(900_000 + 201_600 * 4));

    // Non-admin cannot change it back
    let random = deps.api.addr_make("random");
    let err = opengov_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&random, &[]),
        ExecuteMsg::UpdateConfig {
            admin: None,
            block_time_ms: None,
            vote_locking_period: Some(VOTE_LOCKING_PERIOD),
            conviction_multipliers: None,
        },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("Unauthorized"),
        "Expected unauthorized error, got: {:?}",
        err
    );

    eprintln!("test_lock_period_update_applies_to_new_queries passed");
}

#[test]
fn test_lifecycle_period_progress() {
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    // Decision period of root: 28 days, ending in 17 days
    let res: ProgressResponse = query_at(
        &deps,
        env_at(NOW, 1),
        QueryMsg::PeriodProgress {
            track_id: 0,
            period: LifecyclePeriod::Decision,
            end_at: Some(Timestamp::from_seconds(NOW + 17 * 86_400)),
        },
    );
    assert_eq!(res.label_text, "11/28 days");
    assert!(res.percent > Decimal::from_ratio(39u128, 1u128));
    assert!(res.percent < Decimal::from_ratio(40u128, 1u128));

    // Confirm period of small tipper: 100 blocks, 10 minutes
    let res: ProgressResponse = query_at(
        &deps,
        env_at(NOW, 1),
        QueryMsg::PeriodProgress {
            track_id: 30,
            period: LifecyclePeriod::Confirm,
            end_at: Some(Timestamp::from_seconds(NOW + 240)),
        },
    );
    assert_eq!(res.label_text, "6/10 minutes");
    assert_eq!(res.percent, Decimal::from_ratio(60u128, 1u128));

    // Enactment already over
    let res: ProgressResponse = query_at(
        &deps,
        env_at(NOW, 1),
        QueryMsg::PeriodProgress {
            track_id: 0,
            period: LifecyclePeriod::Enactment,
            end_at: Some(Timestamp::from_seconds(NOW - 1)),
        },
    );
    assert_eq!(res.percent, Decimal::from_ratio(100u128, 1u128));
    assert_eq!(res.label_text, "1/1 days");

    eprintln!("test_lifecycle_period_progress passed");
}

#[test]
fn test_delegated_cohort_vote() {
    // A split-abstain delegate carrying two delegators.
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let record: VoteRecord = serde_json::from_str(
        r#"{
            "voter": "1delegate",
            "decision": "abstain",
            "balance": {"aye": "30000000000", "nay": "20000000000", "abstain": "50000000000"},
            "lock_period": 0,
            "self_voting_power": "10000000000",
            "delegated_votes": [
                {"voter": "1alice", "voting_power": "60000000000", "balance": {"value": "20000000000"}, "lock_period": 2},
                {"voter": "1bob", "voting_power": "5000000000", "balance": {"value": "50000000000"}, "lock_period": 0}
            ],
            "created_at_block": 22000000
        }"#,
    )
    .unwrap();
    assert_eq!(record.shape(), Some(VoteShape::SplitAbstain));

    // Fan-out keeps each branch on its own side
    let ballots: Vec<AccountVote> = query_at(
        &deps,
        mock_env(),
        QueryMsg::NormalizeVote {
            vote: record.clone(),
        },
    );
    assert_eq!(ballots.len(), 3);
    let sides = tally_by_side(&ballots).unwrap();
    assert_eq!(sides.aye, Uint128::new(3 * DOT));
    assert_eq!(sides.nay, Uint128::new(2 * DOT));
    assert_eq!(sides.abstain, Uint128::new(5 * DOT));
    assert_eq!(normalize_vote(&record), ballots);

    let cohort: DelegatedCohortVote =
        query_at(&deps, mock_env(), QueryMsg::CohortVote { vote: record });
    assert!(cohort.is_split_abstain);
    assert_eq!(cohort.balance, Uint128::new(10 * DOT));
    assert_eq!(cohort.delegated_votes_count, 2);
    assert_eq!(cohort.delegated_capital, Uint128::new(7 * DOT));
    assert_eq!(cohort.delegated_voting_power, Uint128::new(65_000_000_000));
    assert_eq!(cohort.total_voting_power, Uint128::new(75_000_000_000));
    // Branch votes use the fixed divisor
    assert_eq!(cohort.aye_votes, Uint128::new(3_000_000_000));
    assert_eq!(cohort.abstain_votes, Uint128::new(5_000_000_000));

    eprintln!("test_delegated_cohort_vote passed");
}

#[test]
fn test_tally_outcome_transitions() {
    let approved = TallyOutcome::Ongoing
        .conclude(TallyOutcome::Approved { block: 900_000 })
        .unwrap();
    assert_eq!(approved.concluded_at(), Some(900_000));

    let err = approved
        .conclude(TallyOutcome::Cancelled { block: 900_001 })
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));

    eprintln!("test_tally_outcome_transitions passed");
}

#[test]
fn test_removed_track_is_no_longer_queryable() {
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let admin = deps.api.addr_make("admin");
    opengov_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        ExecuteMsg::RemoveTrack { track_id: 11 },
    )
    .unwrap();

    let err = opengov_engine::contract::query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Thresholds {
            track_id: 11,
            fraction: Decimal::zero(),
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("not found"));

    let tracks: TracksResponse = query_at(
        &deps,
        mock_env(),
        QueryMsg::Tracks {
            start_after: None,
            limit: None,
        },
    );
    assert_eq!(tracks.tracks.len(), 2);

    eprintln!("test_removed_track_is_no_longer_queryable passed");
}
