#![allow(clippy::unwrap_used, clippy::expect_used)]
extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    vec, Address, Env, String, Vec,
};

use crate::{
    ActionPayload, ActionStatus, ActionType, ContractError, EngineConfig, LpStakingContract,
    LpStakingContractClient, MAX_PAGE_SIZE,
};

const TTL: u64 = 86_400;

fn setup() -> (
    Env,
    LpStakingContractClient<'static>,
    Address,
    Address,
    Address,
    Address,
) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let contract_id = env.register(LpStakingContract, ());
    let client = LpStakingContractClient::new(&env, &contract_id);

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &50_000i128);

    let a = Address::generate(&env);
    let b = Address::generate(&env);
    let c = Address::generate(&env);
    client.initialize(&EngineConfig {
        reward_token: reward_token.clone(),
        signers: vec![&env, a.clone(), b.clone(), c.clone()],
        required_approvals: 2,
        max_weight: 100,
        hourly_reward_rate: 3_600,
        action_ttl: TTL,
    });

    (env, client, reward_token, a, b, c)
}

fn token(env: &Env) -> Address {
    env.register_stellar_asset_contract_v2(Address::generate(env))
        .address()
}

fn propose_pair(
    env: &Env,
    client: &LpStakingContractClient,
    proposer: &Address,
    token: &Address,
    weight: u64,
) -> u64 {
    client.propose_add_pair(
        proposer,
        token,
        &String::from_str(env, "n"),
        &String::from_str(env, "p"),
        &weight,
    )
}

fn pass(client: &LpStakingContractClient, a: &Address, b: &Address, id: u64) {
    client.approve_action(a, &id);
    client.approve_action(b, &id);
    client.execute_action(a, &id);
}

// ── Quorum ────────────────────────────────────────────────────────────────────

#[test]
fn test_quorum_scenario() {
    let (env, client, _, a, b, c) = setup();
    let tok = token(&env);

    let id = propose_pair(&env, &client, &c, &tok, 10);
    assert_eq!(id, 1);
    assert_eq!(client.get_action(&id).approvals, 0);

    assert_eq!(client.approve_action(&a, &id), 1);
    assert_eq!(
        client.try_execute_action(&a, &id),
        Err(Ok(ContractError::QuorumNotMet))
    );
    assert!(!client.get_action(&id).executed);

    assert_eq!(client.approve_action(&b, &id), 2);
    client.execute_action(&a, &id);

    let action = client.get_action(&id);
    assert!(action.executed);
    assert_eq!(action.status(), ActionStatus::Executed);
    assert_eq!(action.approved_by, vec![&env, a, b]);
    assert_eq!(client.get_total_weight(), 10);
    assert!(client.get_pair(&tok).active);
}

#[test]
fn test_proposal_records_payload() {
    let (env, client, _, a, _, _) = setup();

    let id = client.propose_set_hourly_rate(&a, &900);
    let action = client.get_action(&id);
    assert_eq!(action.action_type, ActionType::SetHourlyRate);
    assert_eq!(action.payload, ActionPayload::SetHourlyRate(900));
    assert_eq!(action.proposer, a);
    assert_eq!(action.proposed_time, 1_000);
    assert_eq!(action.approved_by, Vec::new(&env));
    assert_eq!(action.status(), ActionStatus::Proposed);
    assert_eq!(client.get_action_counter(), 1);
}

#[test]
fn test_double_approve_fails() {
    let (_, client, _, a, _, _) = setup();
    let id = client.propose_set_hourly_rate(&a, &1);

    client.approve_action(&a, &id);
    assert_eq!(
        client.try_approve_action(&a, &id),
        Err(Ok(ContractError::AlreadyApproved))
    );
    assert_eq!(client.get_action(&id).approvals, 1);
}

#[test]
fn test_double_execute_fails() {
    let (env, client, _, a, b, c) = setup();
    let tok = token(&env);
    let id = propose_pair(&env, &client, &a, &tok, 30);
    pass(&client, &a, &b, id);

    assert_eq!(
        client.try_execute_action(&c, &id),
        Err(Ok(ContractError::AlreadyExecuted))
    );
    assert_eq!(
        client.try_approve_action(&c, &id),
        Err(Ok(ContractError::AlreadyExecuted))
    );
    assert_eq!(
        client.try_reject_action(&c, &id),
        Err(Ok(ContractError::AlreadyExecuted))
    );
    assert_eq!(client.get_total_weight(), 30);
}

#[test]
fn test_outsiders_cannot_govern() {
    let (env, client, _, a, _, _) = setup();
    let outsider = Address::generate(&env);

    assert_eq!(
        client.try_propose_set_hourly_rate(&outsider, &5),
        Err(Ok(ContractError::NotASigner))
    );
    assert_eq!(client.get_action_counter(), 0);

    let id = client.propose_set_hourly_rate(&a, &5);
    assert_eq!(
        client.try_approve_action(&outsider, &id),
        Err(Ok(ContractError::NotASigner))
    );
    assert_eq!(
        client.try_reject_action(&outsider, &id),
        Err(Ok(ContractError::NotASigner))
    );
    assert_eq!(
        client.try_execute_action(&outsider, &id),
        Err(Ok(ContractError::NotASigner))
    );
}

#[test]
fn test_unknown_action() {
    let (_, client, _, a, _, _) = setup();

    assert_eq!(client.try_get_action(&7), Err(Ok(ContractError::ActionNotFound)));
    assert_eq!(
        client.try_approve_action(&a, &7),
        Err(Ok(ContractError::ActionNotFound))
    );
    assert_eq!(client.try_expire_action(&7), Err(Ok(ContractError::ActionNotFound)));
}

// ── Rejection ─────────────────────────────────────────────────────────────────

#[test]
fn test_rejected_action_is_final() {
    let (env, client, _, a, b, c) = setup();
    let id = client.propose_set_hourly_rate(&a, &10);
    client.approve_action(&b, &id);

    client.reject_action(&c, &id);
    assert_eq!(
        client.try_approve_action(&a, &id),
        Err(Ok(ContractError::ActionRejected))
    );
    assert_eq!(
        client.try_execute_action(&a, &id),
        Err(Ok(ContractError::ActionRejected))
    );
    assert_eq!(
        client.try_reject_action(&a, &id),
        Err(Ok(ContractError::ActionRejected))
    );
    assert_eq!(
        client.try_expire_action(&id),
        Err(Ok(ContractError::ActionRejected))
    );

    let action = client.get_action(&id);
    assert!(action.rejected);
    assert!(!action.executed && !action.expired);
    assert_eq!(action.approved_by, vec![&env, b]);

    // Still rejected, not expired, long after the TTL.
    env.ledger().set_timestamp(1_000 + TTL * 10);
    assert_eq!(client.get_action(&id).status(), ActionStatus::Rejected);
    assert_eq!(client.get_hourly_reward_rate(), 3_600);
}

// ── Expiry ────────────────────────────────────────────────────────────────────

#[test]
fn test_action_expires_after_ttl() {
    let (_, client, _, a, b, _) = setup();
    let id = client.propose_set_hourly_rate(&a, &10);
    client.approve_action(&a, &id);
    client.approve_action(&b, &id);

    // Exactly at the TTL boundary the action is still open.
    client.env.ledger().set_timestamp(1_000 + TTL);
    assert_eq!(client.get_action(&id).status(), ActionStatus::Proposed);
    assert_eq!(
        client.try_expire_action(&id),
        Err(Ok(ContractError::ActionNotExpired))
    );

    client.env.ledger().set_timestamp(1_000 + TTL + 1);
    let seen = client.get_action(&id);
    assert!(seen.expired);
    assert_eq!(
        client.try_execute_action(&a, &id),
        Err(Ok(ContractError::ActionExpired))
    );
    assert_eq!(client.get_hourly_reward_rate(), 3_600);

    client.expire_action(&id);
    assert_eq!(
        client.try_expire_action(&id),
        Err(Ok(ContractError::ActionExpired))
    );
    let stored = client.get_action(&id);
    assert!(stored.expired && !stored.executed && !stored.rejected);
    assert_eq!(stored.approvals, 2);
}

#[test]
fn test_expiry_check_precedes_approval() {
    let (_, client, _, a, b, _) = setup();
    let id = client.propose_set_hourly_rate(&a, &10);

    client.env.ledger().set_timestamp(1_000 + TTL + 1);
    assert_eq!(
        client.try_approve_action(&b, &id),
        Err(Ok(ContractError::ActionExpired))
    );
    assert_eq!(client.get_action(&id).approvals, 0);
}

// ── Payload validation at proposal ───────────────────────────────────────────

#[test]
fn test_remove_unknown_pair_rejected_at_proposal() {
    let (env, client, _, a, b, _) = setup();
    let tok = token(&env);
    pass(&client, &a, &b, propose_pair(&env, &client, &a, &tok, 40));
    let counter = client.get_action_counter();

    assert_eq!(
        client.try_propose_remove_pair(&a, &token(&env)),
        Err(Ok(ContractError::PairNotFound))
    );
    assert_eq!(client.get_total_weight(), 40);
    assert_eq!(client.get_action_counter(), counter);
}

#[test]
fn test_overweight_pair_rejected_at_proposal() {
    let (env, client, _, a, _, _) = setup();
    let tok = token(&env);

    let result = client.try_propose_add_pair(
        &a,
        &tok,
        &String::from_str(&env, "n"),
        &String::from_str(&env, "p"),
        &101,
    );
    assert_eq!(result, Err(Ok(ContractError::WeightOutOfRange)));
    assert_eq!(client.get_action_counter(), 0);
    assert_eq!(client.list_pairs().len(), 0);
    assert_eq!(client.try_get_pair(&tok), Err(Ok(ContractError::PairNotFound)));
}

#[test]
fn test_add_pair_field_validation() {
    let (env, client, reward_token, a, b, _) = setup();
    let tok = token(&env);
    let add = |name: &str, platform: &str, token: &Address| {
        client.try_propose_add_pair(
            &a,
            token,
            &String::from_str(&env, name),
            &String::from_str(&env, platform),
            &10,
        )
    };

    assert_eq!(add("", "p", &tok), Err(Ok(ContractError::InvalidName)));
    assert_eq!(
        add("n", "platform-tag-longer-than-32-bytes", &tok),
        Err(Ok(ContractError::PlatformTooLong))
    );
    assert_eq!(add("n", "p", &reward_token), Err(Ok(ContractError::InvalidToken)));
    assert_eq!(
        add("n", "p", &client.address),
        Err(Ok(ContractError::InvalidToken))
    );

    // A 32-byte platform tag is accepted.
    let id = add("n", "0123456789abcdef0123456789abcdef", &tok).unwrap().unwrap();
    pass(&client, &a, &b, id);
    assert_eq!(add("n", "p", &tok), Err(Ok(ContractError::PairAlreadyRegistered)));
}

#[test]
fn test_invalid_rate_and_withdrawal_rejected() {
    let (_, client, _, a, _, _) = setup();

    assert_eq!(
        client.try_propose_set_hourly_rate(&a, &-1),
        Err(Ok(ContractError::InvalidAmount))
    );
    assert_eq!(
        client.try_propose_withdraw(&a, &a, &0),
        Err(Ok(ContractError::InvalidAmount))
    );
    assert_eq!(
        client.try_propose_withdraw(&a, &client.address, &10),
        Err(Ok(ContractError::InvalidRecipient))
    );
    assert_eq!(client.get_action_counter(), 0);
}

// ── Weights ───────────────────────────────────────────────────────────────────

#[test]
fn test_update_weights_keeps_total_in_sync() {
    let (env, client, _, a, b, _) = setup();
    let x = token(&env);
    let y = token(&env);
    let z = token(&env);
    pass(&client, &a, &b, propose_pair(&env, &client, &a, &x, 10));
    pass(&client, &a, &b, propose_pair(&env, &client, &a, &y, 20));
    pass(&client, &a, &b, propose_pair(&env, &client, &a, &z, 30));
    assert_eq!(client.get_total_weight(), 60);

    let id = client.propose_update_weights(
        &a,
        &vec![&env, x.clone(), z.clone()],
        &vec![&env, 100u64, 0u64],
    );
    pass(&client, &a, &b, id);
    assert_eq!(client.get_pair(&x).weight, 100);
    assert_eq!(client.get_pair(&z).weight, 0);
    assert_eq!(client.get_total_weight(), 120);

    pass(&client, &a, &b, client.propose_remove_pair(&a, &y));
    assert_eq!(client.get_total_weight(), 100);

    let sum: u64 = client
        .list_pairs()
        .iter()
        .filter(|p| p.active)
        .map(|p| p.weight)
        .sum();
    assert_eq!(sum, client.get_total_weight());
}

#[test]
fn test_update_weights_validation_is_all_or_nothing() {
    let (env, client, _, a, b, _) = setup();
    let x = token(&env);
    pass(&client, &a, &b, propose_pair(&env, &client, &a, &x, 10));

    assert_eq!(
        client.try_propose_update_weights(&a, &vec![&env, x.clone()], &vec![&env, 1u64, 2u64]),
        Err(Ok(ContractError::LengthMismatch))
    );
    assert_eq!(
        client.try_propose_update_weights(&a, &Vec::new(&env), &Vec::new(&env)),
        Err(Ok(ContractError::LengthMismatch))
    );
    assert_eq!(
        client.try_propose_update_weights(
            &a,
            &vec![&env, x.clone(), x.clone()],
            &vec![&env, 1u64, 2u64]
        ),
        Err(Ok(ContractError::DuplicateToken))
    );
    assert_eq!(
        client.try_propose_update_weights(
            &a,
            &vec![&env, x.clone(), token(&env)],
            &vec![&env, 5u64, 5u64]
        ),
        Err(Ok(ContractError::PairNotFound))
    );
    assert_eq!(
        client.try_propose_update_weights(&a, &vec![&env, x.clone()], &vec![&env, 101u64]),
        Err(Ok(ContractError::WeightOutOfRange))
    );
    assert_eq!(client.get_pair(&x).weight, 10);
    assert_eq!(client.get_action_counter(), 1);
}

#[test]
fn test_stale_action_fails_at_execution() {
    let (env, client, _, a, b, _) = setup();
    let x = token(&env);
    pass(&client, &a, &b, propose_pair(&env, &client, &a, &x, 10));

    let update = client.propose_update_weights(&a, &vec![&env, x.clone()], &vec![&env, 50u64]);
    client.approve_action(&a, &update);
    client.approve_action(&b, &update);

    pass(&client, &a, &b, client.propose_remove_pair(&a, &x));

    assert_eq!(
        client.try_execute_action(&a, &update),
        Err(Ok(ContractError::PairInactive))
    );
    // The failed execution rolled back, so the action is still open.
    let action = client.get_action(&update);
    assert!(!action.executed);
    assert_eq!(client.get_pair(&x).weight, 10);
    assert_eq!(client.get_total_weight(), 0);
}

// ── Signers ───────────────────────────────────────────────────────────────────

#[test]
fn test_change_signer() {
    let (env, client, _, a, b, c) = setup();
    let d = Address::generate(&env);

    let pending = client.propose_set_hourly_rate(&a, &1);
    client.approve_action(&c, &pending);

    pass(&client, &a, &b, client.propose_change_signer(&a, &c, &d));
    assert_eq!(client.list_signers(), vec![&env, a.clone(), b.clone(), d.clone()]);

    // c's approval no longer counts.
    client.approve_action(&d, &pending);
    assert_eq!(client.get_action(&pending).approvals, 2);
    assert_eq!(
        client.try_execute_action(&d, &pending),
        Err(Ok(ContractError::QuorumNotMet))
    );
    assert_eq!(
        client.try_propose_set_hourly_rate(&c, &1),
        Err(Ok(ContractError::NotASigner))
    );

    client.approve_action(&a, &pending);
    client.execute_action(&d, &pending);
    assert_eq!(client.get_hourly_reward_rate(), 1);
}

#[test]
fn test_change_signer_validation() {
    let (env, client, _, a, b, _) = setup();
    let outsider = Address::generate(&env);

    assert_eq!(
        client.try_propose_change_signer(&a, &outsider, &Address::generate(&env)),
        Err(Ok(ContractError::NotASigner))
    );
    assert_eq!(
        client.try_propose_change_signer(&a, &a, &b),
        Err(Ok(ContractError::AlreadyASigner))
    );
}

// ── Withdrawals ───────────────────────────────────────────────────────────────

#[test]
fn test_withdraw_rewards() {
    let (env, client, reward_token, a, b, _) = setup();
    let treasury = Address::generate(&env);

    pass(&client, &a, &b, client.propose_withdraw(&a, &treasury, &20_000));
    assert_eq!(TokenClient::new(&env, &reward_token).balance(&treasury), 20_000);
    assert_eq!(client.get_reward_reserve(), 30_000);

    let id = client.propose_withdraw(&a, &treasury, &30_001);
    client.approve_action(&a, &id);
    client.approve_action(&b, &id);
    assert_eq!(
        client.try_execute_action(&a, &id),
        Err(Ok(ContractError::InsufficientRewardReserve))
    );
    assert!(!client.get_action(&id).executed);
    assert_eq!(client.get_reward_reserve(), 30_000);
}

// ── Paging ────────────────────────────────────────────────────────────────────

#[test]
fn test_list_actions_page() {
    let (_, client, _, a, _, _) = setup();
    for rate in 1..=3i128 {
        client.propose_set_hourly_rate(&a, &rate);
    }

    let page = client.list_actions_page(&2, &10);
    assert_eq!(page.len(), 2);
    assert_eq!(page.get(0).unwrap().id, 2);
    assert_eq!(page.get(1).unwrap().id, 3);

    let first = client.list_actions_page(&0, &1);
    assert_eq!(first.len(), 1);
    assert_eq!(first.get(0).unwrap().id, 1);

    assert_eq!(client.list_actions_page(&4, &10).len(), 0);
}

#[test]
fn test_list_actions_page_is_capped() {
    let (_, client, _, a, _, _) = setup();
    for _ in 0..(MAX_PAGE_SIZE + 5) {
        client.propose_set_hourly_rate(&a, &1);
    }
    assert_eq!(client.list_actions_page(&1, &1_000).len(), MAX_PAGE_SIZE);
}
