//! Facade tests: panic gating, authorization, minimum stakes, atomicity
//! against ledger failures, and end-to-end proposal flows.

use std::sync::Arc;

use agora_dao::{CallContext, Dao, DaoConfig, DaoError, ParamsConfig};
use agora_governance::{GovernableParam, QuorumMajorityStrategy, VotingStrategy};
use agora_ledger::{CreditLedger, LedgerError};
use agora_nullables::{LedgerCall, NullClock, NullLedger};
use agora_types::{
    AccountId, Clock, ErrorCode, Event, ProposalState, StakePurpose, Timestamp, VoteType,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const WEEK: u64 = 604_800;

fn owner() -> AccountId {
    AccountId::from_low_u64(1)
}

fn operator() -> AccountId {
    AccountId::from_low_u64(2)
}

fn dao_address() -> AccountId {
    AccountId::from_low_u64(0xda0)
}

fn user(n: u64) -> AccountId {
    AccountId::from_low_u64(100 + n)
}

fn at(caller: AccountId, secs: u64) -> CallContext {
    CallContext::new(caller, Timestamp::new(secs))
}

fn config() -> DaoConfig {
    DaoConfig {
        params: ParamsConfig {
            token_price: 2,
            tokens_per_voting_power: 100,
            min_stake_for_voting: 100,
            min_stake_for_proposing: 1_000,
            staking_lock_time_secs: WEEK,
            proposal_duration_secs: WEEK,
        },
        ..DaoConfig::default()
    }
}

fn make_dao() -> Dao<NullLedger> {
    Dao::new(&config(), NullLedger::new()).unwrap()
}

/// Mint `amount` to `account` and let the dao burn all of it.
fn fund(dao: &mut Dao<NullLedger>, account: AccountId, amount: u128) {
    dao.mint_tokens(at(owner(), 0), account, amount).unwrap();
    dao.approve(at(account, 0), u128::MAX).unwrap();
}

fn code<T>(result: Result<T, DaoError>) -> ErrorCode {
    match result {
        Ok(_) => panic!("operation should have failed"),
        Err(e) => e.code(),
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn construction_rejects_null_identities() {
    let null_owner = DaoConfig {
        owner: AccountId::ZERO,
        ..config()
    };
    assert_eq!(
        code(Dao::new(&null_owner, NullLedger::new())),
        ErrorCode::InvalidAddress
    );

    let null_operator = DaoConfig {
        panic_operator: AccountId::ZERO,
        ..config()
    };
    assert_eq!(
        code(Dao::new(&null_operator, NullLedger::new())),
        ErrorCode::InvalidAddress
    );

    let mut zero_duration = config();
    zero_duration.params.proposal_duration_secs = 0;
    assert_eq!(
        code(Dao::new(&zero_duration, NullLedger::new())),
        ErrorCode::InvalidDuration
    );
}

// ---------------------------------------------------------------------------
// Panic gating
// ---------------------------------------------------------------------------

type Op = Box<dyn Fn(&mut Dao<NullLedger>) -> Result<(), DaoError>>;

fn op(f: impl Fn(&mut Dao<NullLedger>) -> Result<(), DaoError> + 'static) -> Op {
    Box::new(f)
}

fn gated_ops() -> Vec<(&'static str, Op)> {
    let voter = user(1);
    let ctx = at(voter, 10);
    let admin = at(owner(), 10);
    vec![
        ("buy_tokens", op(move |d| d.buy_tokens(ctx, 10).map(|_| ()))),
        ("create_proposal", op(move |d| d.create_proposal(ctx, "t", "d").map(|_| ()))),
        ("vote", op(move |d| d.vote(at(user(2), 10), 0, VoteType::For))),
        ("change_vote", op(move |d| d.change_vote(ctx, 0, VoteType::Against))),
        ("stake_for_voting", op(move |d| d.stake_for_voting(ctx, 100).map(|_| ()))),
        ("stake_for_proposing", op(move |d| d.stake_for_proposing(ctx, 1_000).map(|_| ()))),
        ("unstake_voting", op(move |d| d.unstake_voting(at(voter, 2 * WEEK)).map(|_| ()))),
        ("unstake_proposing", op(move |d| d.unstake_proposing(at(voter, 2 * WEEK)).map(|_| ()))),
        ("mint_tokens", op(move |d| d.mint_tokens(admin, voter, 5))),
        (
            "change_strategy",
            op(move |d| {
                d.change_strategy(admin, Some(Arc::new(QuorumMajorityStrategy::new(1_000))))
            }),
        ),
        ("withdraw_eth", op(move |d| d.withdraw_eth(admin, owner(), 1))),
        ("finalize_proposal", op(move |d| d.finalize_proposal(ctx, 0).map(|_| ()))),
        ("expire_proposal", op(move |d| d.expire_proposal(at(voter, 2 * WEEK), 0))),
        (
            "set_parameter",
            op(move |d| d.set_parameter(admin, GovernableParam::TokenPrice, 3).map(|_| ())),
        ),
        ("approve", op(move |d| d.approve(at(user(3), 10), 500))),
        ("set_panic_operator", op(move |d| d.set_panic_operator(admin, user(9)))),
    ]
}

/// A dao where every gated operation would succeed if it were not panicked.
fn ready_dao() -> Dao<NullLedger> {
    let mut dao = make_dao();
    fund(&mut dao, user(1), 100_000);
    fund(&mut dao, user(2), 100_000);
    dao.buy_tokens(at(user(1), 0), 10).unwrap();
    dao.stake_for_voting(at(user(1), 0), 1_000).unwrap();
    dao.stake_for_proposing(at(user(1), 0), 1_000).unwrap();
    dao.stake_for_voting(at(user(2), 0), 1_000).unwrap();
    dao.create_proposal(at(user(1), 0), "Seed", "Proposal zero").unwrap();
    dao.vote(at(user(1), 0), 0, VoteType::For).unwrap();
    dao
}

#[test]
fn every_mutating_operation_fails_while_panicked() {
    for (name, run) in gated_ops() {
        let mut dao = ready_dao();
        dao.panic(at(operator(), 5)).unwrap();
        let journal_len = dao.events().len();
        let calls = dao.ledger().calls().len();

        let err = run(&mut dao).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PanicActive, "{name} ran while panicked");
        assert_eq!(dao.events().len(), journal_len, "{name} left notifications");
        assert_eq!(dao.ledger().calls().len(), calls, "{name} touched the ledger");
    }
}

#[test]
fn every_mutating_operation_succeeds_after_calm() {
    for (name, run) in gated_ops() {
        let mut dao = ready_dao();
        dao.panic(at(operator(), 5)).unwrap();
        dao.calm(at(operator(), 6)).unwrap();
        assert!(!dao.is_panicked());
        if let Err(e) = run(&mut dao) {
            panic!("{name} failed after calm: {e}");
        }
    }
}

#[test]
fn panic_controls_belong_to_the_operator() {
    let mut dao = make_dao();
    assert_eq!(code(dao.panic(at(owner(), 0))), ErrorCode::NotPanicOperator);
    assert_eq!(code(dao.calm(at(operator(), 0))), ErrorCode::PanicNotActive);
    dao.panic(at(operator(), 0)).unwrap();
    assert_eq!(code(dao.panic(at(operator(), 0))), ErrorCode::PanicActive);

    // The operator cannot be swapped out mid-incident.
    let new_operator = user(9);
    assert_eq!(
        code(dao.set_panic_operator(at(owner(), 1), new_operator)),
        ErrorCode::PanicActive
    );
    dao.calm(at(operator(), 2)).unwrap();

    // Once reassigned, the old operator loses its rights.
    dao.set_panic_operator(at(owner(), 3), new_operator).unwrap();
    assert_eq!(dao.panic_operator(), &new_operator);
    assert_eq!(code(dao.panic(at(operator(), 4))), ErrorCode::NotPanicOperator);
    dao.panic(at(new_operator, 4)).unwrap();
    dao.calm(at(new_operator, 5)).unwrap();

    assert_eq!(
        code(dao.set_panic_operator(at(user(1), 3), user(1))),
        ErrorCode::NotOwner
    );
    assert_eq!(
        code(dao.set_panic_operator(at(owner(), 3), AccountId::ZERO)),
        ErrorCode::InvalidAddress
    );

    let toggles: Vec<_> = dao
        .events()
        .iter()
        .filter(|e| matches!(e, Event::Panicked { .. } | Event::Calmed { .. }))
        .collect();
    assert_eq!(toggles.len(), 4);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn voting_power_is_stake_over_ratio() {
    let mut cfg = config();
    cfg.params.min_stake_for_voting = 0;
    let mut dao = Dao::new(&cfg, NullLedger::new()).unwrap();
    fund(&mut dao, user(1), 10_000);
    fund(&mut dao, user(2), 10_000);

    dao.stake_for_voting(at(user(1), 0), 1_000).unwrap();
    dao.stake_for_voting(at(user(2), 0), 99).unwrap();
    assert_eq!(dao.voting_power(&user(1)).unwrap(), 10);
    assert_eq!(dao.voting_power(&user(2)).unwrap(), 0);
    assert_eq!(dao.total_voting_power(), 10);
    assert_eq!(code(dao.voting_power(&AccountId::ZERO)), ErrorCode::InvalidAddress);

    // A zero ratio degrades everyone to zero power.
    dao.set_parameter(at(owner(), 1), GovernableParam::TokensPerVotingPower, 0)
        .unwrap();
    assert_eq!(dao.voting_power(&user(1)).unwrap(), 0);
}

fn proposal_with_votes(for_stake: u128, against_stake: u128) -> Dao<NullLedger> {
    let mut dao = make_dao();
    let (proposer, yes, no) = (user(1), user(2), user(3));
    for account in [proposer, yes, no] {
        fund(&mut dao, account, 1_000_000);
    }
    dao.stake_for_proposing(at(proposer, 0), 1_000).unwrap();
    dao.stake_for_voting(at(yes, 0), for_stake).unwrap();
    dao.stake_for_voting(at(no, 0), against_stake).unwrap();
    let id = dao
        .create_proposal(at(proposer, 0), "Fund the commons", "Allocate the treasury")
        .unwrap();
    dao.vote(at(yes, 10), id, VoteType::For).unwrap();
    dao.vote(at(no, 10), id, VoteType::Against).unwrap();
    dao
}

#[test]
fn majority_before_deadline_is_accepted() {
    let mut dao = proposal_with_votes(600_000, 200_000);
    assert_eq!(dao.proposal_results(0).unwrap(), (6_000, 2_000));
    assert_eq!(
        dao.finalize_proposal(at(user(4), 100), 0).unwrap(),
        ProposalState::Accepted
    );
    assert_eq!(
        dao.events().last(),
        Some(&Event::ProposalStateChanged {
            id: 0,
            old: ProposalState::Active,
            new: ProposalState::Accepted
        })
    );
}

#[test]
fn finalizing_after_deadline_expires() {
    let mut dao = proposal_with_votes(600_000, 200_000);
    assert!(dao
        .has_proposal_deadline_passed(0, Timestamp::new(WEEK + 1))
        .unwrap());
    assert_eq!(
        dao.finalize_proposal(at(user(4), WEEK + 1), 0).unwrap(),
        ProposalState::Expired
    );
    assert_eq!(
        code(dao.finalize_proposal(at(user(4), WEEK + 2), 0)),
        ErrorCode::ProposalNotActive
    );
}

#[test]
fn tie_is_rejected() {
    let mut dao = proposal_with_votes(300_000, 300_000);
    assert_eq!(
        dao.finalize_proposal(at(user(4), 100), 0).unwrap(),
        ProposalState::Rejected
    );
}

#[test]
fn buy_tokens_checks_price() {
    let mut dao = make_dao();
    assert_eq!(code(dao.buy_tokens(at(user(1), 0), 1)), ErrorCode::InsufficientEth);

    // Remainder is kept.
    assert_eq!(dao.buy_tokens(at(user(1), 0), 7).unwrap(), 3);
    assert_eq!(dao.token_balance(&user(1)), 3);
    assert_eq!(dao.eth_balance(), 7);

    dao.set_parameter(at(owner(), 1), GovernableParam::TokenPrice, 0)
        .unwrap();
    assert_eq!(code(dao.buy_tokens(at(user(1), 2), 100)), ErrorCode::ZeroPrice);
    assert_eq!(dao.eth_balance(), 7);
}

#[test]
fn stake_stays_locked_for_the_full_lock_time() {
    let clock = NullClock::new(1_000);
    let mut dao = make_dao();
    let holder = user(1);
    fund(&mut dao, holder, 5_000);

    dao.stake_for_voting(CallContext::new(holder, clock.now()), 1_000)
        .unwrap();
    assert_eq!(dao.token_balance(&holder), 4_000);
    assert_eq!(dao.voting_unlock_at(&holder), Timestamp::new(1_000 + WEEK));

    clock.advance(WEEK - 1);
    assert_eq!(
        dao.lock_remaining(&holder, StakePurpose::Voting, clock.now()),
        1
    );
    assert_eq!(
        code(dao.unstake_voting(CallContext::new(holder, clock.now()))),
        ErrorCode::StakeLocked
    );

    clock.advance(1);
    assert_eq!(
        dao.unstake_voting(CallContext::new(holder, clock.now()))
            .unwrap(),
        1_000
    );
    assert_eq!(dao.token_balance(&holder), 5_000);
    assert_eq!(dao.voting_stake(&holder), 0);
    assert_eq!(
        code(dao.unstake_voting(CallContext::new(holder, clock.now()))),
        ErrorCode::InsufficientStake
    );
}

// ---------------------------------------------------------------------------
// Minimum stakes and authorization
// ---------------------------------------------------------------------------

#[test]
fn minimum_stakes_are_enforced_at_the_facade() {
    let mut dao = make_dao();
    let holder = user(1);
    fund(&mut dao, holder, 10_000);

    assert_eq!(code(dao.stake_for_voting(at(holder, 0), 0)), ErrorCode::ZeroAmount);
    assert_eq!(code(dao.stake_for_voting(at(holder, 0), 99)), ErrorCode::MinStakeNotMet);
    assert_eq!(
        code(dao.stake_for_proposing(at(holder, 0), 999)),
        ErrorCode::MinStakeNotMet
    );
    assert_eq!(
        code(dao.create_proposal(at(holder, 0), "t", "d")),
        ErrorCode::MinStakeNotMet
    );

    // Top-ups count the existing stake.
    dao.stake_for_voting(at(holder, 0), 100).unwrap();
    dao.stake_for_voting(at(holder, 1), 1).unwrap();
    assert_eq!(dao.voting_stake(&holder), 101);

    dao.stake_for_proposing(at(holder, 2), 1_000).unwrap();
    let id = dao.create_proposal(at(holder, 3), "t", "d").unwrap();
    assert_eq!(
        code(dao.vote(at(user(2), 4), id, VoteType::For)),
        ErrorCode::MinStakeNotMet
    );
    dao.vote(at(holder, 4), id, VoteType::For).unwrap();
    assert_eq!(
        code(dao.vote(at(holder, 5), id, VoteType::Against)),
        ErrorCode::AlreadyVoted
    );
}

#[test]
fn component_checks_surface_through_the_facade() {
    let mut dao = make_dao();
    let holder = user(1);
    fund(&mut dao, holder, 10_000);
    dao.stake_for_proposing(at(holder, 0), 1_000).unwrap();
    dao.stake_for_voting(at(holder, 0), 1_000).unwrap();

    assert_eq!(code(dao.create_proposal(at(holder, 1), " ", "d")), ErrorCode::EmptyTitle);
    assert_eq!(code(dao.create_proposal(at(holder, 1), "t", "")), ErrorCode::EmptyDescription);

    dao.set_min_voting_power_to_propose(at(owner(), 1), 11).unwrap();
    assert_eq!(
        code(dao.create_proposal(at(holder, 2), "t", "d")),
        ErrorCode::InsufficientVotingPower
    );
    dao.set_min_voting_power_to_propose(at(owner(), 2), 10).unwrap();
    let id = dao.create_proposal(at(holder, 3), "t", "d").unwrap();

    assert_eq!(code(dao.vote(at(holder, 4), id + 1, VoteType::For)), ErrorCode::ProposalNotFound);
    assert_eq!(code(dao.vote(at(holder, 4), id, VoteType::None)), ErrorCode::InvalidVoteType);
    assert_eq!(
        code(dao.change_vote(at(holder, 4), id, VoteType::Against)),
        ErrorCode::NotVotedYet
    );
    assert_eq!(code(dao.expire_proposal(at(holder, 5), id)), ErrorCode::DeadlineNotPassed);
}

#[test]
fn change_vote_moves_recorded_weight() {
    let mut dao = proposal_with_votes(600_000, 200_000);
    dao.change_vote(at(user(2), 20), 0, VoteType::Against).unwrap();
    assert_eq!(dao.proposal_results(0).unwrap(), (0, 8_000));
    assert_eq!(dao.user_vote(0, &user(2)).vote, VoteType::Against);
    assert_eq!(
        dao.finalize_proposal(at(user(4), 30), 0).unwrap(),
        ProposalState::Rejected
    );
}

#[test]
fn owner_only_operations_reject_others() {
    let mut dao = make_dao();
    let intruder = at(user(7), 0);
    assert_eq!(code(dao.mint_tokens(intruder, user(7), 1)), ErrorCode::NotOwner);
    assert_eq!(code(dao.withdraw_eth(intruder, user(7), 1)), ErrorCode::NotOwner);
    assert_eq!(
        code(dao.change_strategy(intruder, Some(Arc::new(QuorumMajorityStrategy::new(1))))),
        ErrorCode::NotOwner
    );
    assert_eq!(
        code(dao.set_parameter(intruder, GovernableParam::TokenPrice, 1)),
        ErrorCode::NotOwner
    );
    assert_eq!(
        code(dao.set_min_voting_power_to_propose(intruder, 1)),
        ErrorCode::NotOwner
    );

    let admin = at(owner(), 0);
    assert_eq!(code(dao.mint_tokens(admin, AccountId::ZERO, 1)), ErrorCode::InvalidAddress);
    assert_eq!(code(dao.mint_tokens(admin, user(1), 0)), ErrorCode::ZeroAmount);
    assert_eq!(code(dao.withdraw_eth(admin, AccountId::ZERO, 1)), ErrorCode::InvalidAddress);
    assert_eq!(code(dao.withdraw_eth(admin, user(1), 0)), ErrorCode::ZeroAmount);
    assert!(dao.events().is_empty());
}

#[test]
fn withdraw_eth_is_bounded_by_held_value() {
    let mut dao = make_dao();
    dao.buy_tokens(at(user(1), 0), 10).unwrap();
    assert_eq!(
        code(dao.withdraw_eth(at(owner(), 1), owner(), 11)),
        ErrorCode::InsufficientEth
    );
    dao.withdraw_eth(at(owner(), 1), owner(), 4).unwrap();
    assert_eq!(dao.eth_balance(), 6);
    assert_eq!(
        dao.events().last(),
        Some(&Event::EthWithdrawn {
            to: owner(),
            amount: 4
        })
    );
}

#[test]
fn strategy_changes_apply_to_the_next_finalization() {
    let mut dao = proposal_with_votes(600_000, 200_000);
    let admin = at(owner(), 50);

    assert_eq!(code(dao.change_strategy(admin, None)), ErrorCode::InvalidStrategy);
    let current = dao.active_strategy().clone();
    assert_eq!(code(dao.change_strategy(admin, Some(current))), ErrorCode::SameStrategy);

    // 8000 of 8000 total power voted, so a 90% quorum is met.
    let quorum: Arc<dyn VotingStrategy> = Arc::new(QuorumMajorityStrategy::new(9_000));
    dao.change_strategy(admin, Some(quorum)).unwrap();
    assert_eq!(dao.active_strategy().name(), "quorum_majority");

    // Extra unvoted stake drops turnout below quorum.
    fund(&mut dao, user(5), 10_000_000);
    dao.stake_for_voting(at(user(5), 60), 1_000_000).unwrap();
    assert_eq!(dao.total_voting_power(), 18_000);
    assert_eq!(
        dao.finalize_proposal(at(user(4), 70), 0).unwrap(),
        ProposalState::Rejected
    );
}

#[test]
fn proposal_duration_parameter_drives_new_deadlines() {
    let mut dao = make_dao();
    let holder = user(1);
    fund(&mut dao, holder, 10_000);
    dao.stake_for_proposing(at(holder, 0), 1_000).unwrap();

    assert_eq!(
        code(dao.set_parameter(at(owner(), 0), GovernableParam::ProposalDuration, 0)),
        ErrorCode::InvalidDuration
    );
    assert_eq!(dao.parameter(GovernableParam::ProposalDuration), u128::from(WEEK));

    let old = dao
        .set_parameter(at(owner(), 0), GovernableParam::ProposalDuration, 3_600)
        .unwrap();
    assert_eq!(old, u128::from(WEEK));
    assert_eq!(dao.default_proposal_duration(), 3_600);

    let id = dao.create_proposal(at(holder, 100), "t", "d").unwrap();
    assert_eq!(dao.proposal(id).unwrap().deadline, Timestamp::new(3_700));
}

// ---------------------------------------------------------------------------
// Atomicity against the external ledger
// ---------------------------------------------------------------------------

#[test]
fn failed_burn_leaves_no_stake() {
    let mut dao = make_dao();
    let holder = user(1);
    fund(&mut dao, holder, 5_000);
    let journal_len = dao.events().len();

    dao.ledger()
        .fail_next(LedgerError::Other("ledger unavailable".into()));
    let err = dao.stake_for_voting(at(holder, 0), 1_000).unwrap_err();
    assert!(matches!(err, DaoError::Staking(_)));

    assert_eq!(dao.voting_stake(&holder), 0);
    assert_eq!(dao.total_staked(StakePurpose::Voting), 0);
    assert_eq!(dao.voting_unlock_at(&holder), Timestamp::EPOCH);
    assert_eq!(dao.token_balance(&holder), 5_000);
    assert_eq!(dao.events().len(), journal_len);
}

#[test]
fn missing_allowance_fails_cleanly() {
    let mut dao = make_dao();
    let holder = user(1);
    dao.mint_tokens(at(owner(), 0), holder, 5_000).unwrap();
    assert_eq!(
        code(dao.stake_for_voting(at(holder, 0), 1_000)),
        ErrorCode::InsufficientAllowance
    );
    assert_eq!(dao.voting_stake(&holder), 0);

    dao.approve(at(holder, 0), 10_000).unwrap();
    assert_eq!(
        code(dao.stake_for_voting(at(holder, 0), 6_000)),
        ErrorCode::InsufficientBalance
    );
}

#[test]
fn failed_mint_on_unstake_restores_the_stake() {
    let mut dao = make_dao();
    let holder = user(1);
    fund(&mut dao, holder, 5_000);
    dao.stake_for_proposing(at(holder, 0), 2_000).unwrap();
    let journal_len = dao.events().len();

    dao.ledger()
        .fail_next(LedgerError::Other("ledger unavailable".into()));
    assert!(dao.unstake_proposing(at(holder, WEEK)).is_err());
    assert_eq!(dao.proposing_stake(&holder), 2_000);
    assert_eq!(dao.total_staked(StakePurpose::Proposing), 2_000);
    assert_eq!(dao.token_balance(&holder), 3_000);
    assert_eq!(dao.events().len(), journal_len);

    assert_eq!(dao.unstake_proposing(at(holder, WEEK)).unwrap(), 2_000);
    assert_eq!(dao.token_balance(&holder), 5_000);
}

#[test]
fn failed_mint_on_purchase_keeps_native_balance() {
    let mut dao = make_dao();
    dao.ledger()
        .fail_next(LedgerError::Other("ledger unavailable".into()));
    assert!(dao.buy_tokens(at(user(1), 0), 10).is_err());
    assert_eq!(dao.eth_balance(), 0);
    assert!(dao.events().is_empty());
}

#[test]
fn stake_burns_through_the_dao_allowance() {
    let mut dao = make_dao();
    let holder = user(1);
    fund(&mut dao, holder, 5_000);
    dao.ledger().clear_calls();

    dao.stake_for_voting(at(holder, 0), 1_000).unwrap();
    assert_eq!(
        dao.ledger().calls(),
        vec![LedgerCall::BurnFrom {
            owner: holder,
            spender: dao_address(),
            amount: 1_000
        }]
    );
}

#[test]
fn approve_grants_the_dao_allowance_for_the_caller_only() {
    let mut dao = make_dao();
    let holder = user(1);
    dao.mint_tokens(at(owner(), 0), holder, 5_000).unwrap();

    dao.approve(at(holder, 1), 2_000).unwrap();
    assert_eq!(dao.ledger().allowance(&holder, &dao_address()), 2_000);
    assert_eq!(dao.ledger().allowance(&user(2), &dao_address()), 0);
    assert_eq!(
        dao.events().last(),
        Some(&Event::AllowanceApproved {
            holder,
            spender: dao_address(),
            amount: 2_000,
        })
    );

    // Holder-side calls go through the panic gate like everything else.
    dao.panic(at(operator(), 2)).unwrap();
    assert_eq!(code(dao.approve(at(holder, 3), 0)), ErrorCode::PanicActive);
    assert_eq!(dao.ledger().allowance(&holder, &dao_address()), 2_000);

    dao.calm(at(operator(), 4)).unwrap();
    dao.approve(at(holder, 5), 0).unwrap();
    assert_eq!(
        code(dao.stake_for_voting(at(holder, 6), 1_000)),
        ErrorCode::InsufficientAllowance
    );
}

#[test]
fn journal_serializes_as_tagged_json() {
    let mut dao = make_dao();
    dao.buy_tokens(at(user(1), 0), 4).unwrap();
    let json = serde_json::to_value(dao.events()).unwrap();
    assert_eq!(json[0]["event"], "tokens_purchased");

    let drained = dao.drain_journal();
    assert_eq!(drained.len(), 1);
    assert!(dao.events().is_empty());
}
