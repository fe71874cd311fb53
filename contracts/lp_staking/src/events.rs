#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Vec};

use crate::governance::ActionType;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub reward_token: Address,
    pub signers: Vec<Address>,
    pub required_approvals: u32,
    pub max_weight: u64,
    pub hourly_reward_rate: i128,
    pub action_ttl: u64,
    pub timestamp: u64,
}

/// Fired when a user deposits into a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeAddedEvent {
    pub user: Address,
    pub pair: Address,
    pub amount: i128,
    pub staked_amount: i128,
    pub pool_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a user withdraws from a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeRemovedEvent {
    pub user: Address,
    pub pair: Address,
    pub amount: i128,
    pub staked_amount: i128,
    pub pool_total_staked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimedEvent {
    pub user: Address,
    pub pair: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionProposedEvent {
    pub id: u64,
    pub action_type: ActionType,
    pub proposer: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionApprovedEvent {
    pub id: u64,
    pub signer: Address,
    pub approvals: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionExecutedEvent {
    pub id: u64,
    pub action_type: ActionType,
    pub executor: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionRejectedEvent {
    pub id: u64,
    pub signer: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionExpiredEvent {
    pub id: u64,
    pub proposed_time: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairAddedEvent {
    pub token: Address,
    pub weight: u64,
    pub total_weight: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairRemovedEvent {
    pub token: Address,
    pub weight: u64,
    pub total_weight: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeightsUpdatedEvent {
    pub tokens: Vec<Address>,
    pub weights: Vec<u64>,
    pub total_weight: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HourlyRateSetEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignerChangedEvent {
    pub old_signer: Address,
    pub new_signer: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsWithdrawnEvent {
    pub recipient: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    reward_token: Address,
    signers: Vec<Address>,
    required_approvals: u32,
    max_weight: u64,
    hourly_reward_rate: i128,
    action_ttl: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            reward_token,
            signers,
            required_approvals,
            max_weight,
            hourly_reward_rate,
            action_ttl,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_added(
    env: &Env,
    user: Address,
    pair: Address,
    amount: i128,
    staked_amount: i128,
    pool_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), user.clone(), pair.clone()),
        StakeAddedEvent {
            user,
            pair,
            amount,
            staked_amount,
            pool_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_removed(
    env: &Env,
    user: Address,
    pair: Address,
    amount: i128,
    staked_amount: i128,
    pool_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("UNSTAKED"), user.clone(), pair.clone()),
        StakeRemovedEvent {
            user,
            pair,
            amount,
            staked_amount,
            pool_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_claimed(env: &Env, user: Address, pair: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), user.clone(), pair.clone()),
        RewardsClaimedEvent {
            user,
            pair,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_action_proposed(env: &Env, id: u64, action_type: ActionType, proposer: Address) {
    env.events().publish(
        (symbol_short!("PROPOSED"), id),
        ActionProposedEvent {
            id,
            action_type,
            proposer,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_action_approved(env: &Env, id: u64, signer: Address, approvals: u32) {
    env.events().publish(
        (symbol_short!("APPROVED"), id),
        ActionApprovedEvent {
            id,
            signer,
            approvals,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_action_executed(env: &Env, id: u64, action_type: ActionType, executor: Address) {
    env.events().publish(
        (symbol_short!("EXECUTED"), id),
        ActionExecutedEvent {
            id,
            action_type,
            executor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_action_rejected(env: &Env, id: u64, signer: Address) {
    env.events().publish(
        (symbol_short!("REJECTED"), id),
        ActionRejectedEvent {
            id,
            signer,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_action_expired(env: &Env, id: u64, proposed_time: u64) {
    env.events().publish(
        (symbol_short!("EXPIRED"), id),
        ActionExpiredEvent {
            id,
            proposed_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pair_added(env: &Env, token: Address, weight: u64, total_weight: u64) {
    env.events().publish(
        (symbol_short!("PAIR_ADD"), token.clone()),
        PairAddedEvent {
            token,
            weight,
            total_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pair_removed(env: &Env, token: Address, weight: u64, total_weight: u64) {
    env.events().publish(
        (symbol_short!("PAIR_RM"), token.clone()),
        PairRemovedEvent {
            token,
            weight,
            total_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_weights_updated(
    env: &Env,
    tokens: Vec<Address>,
    weights: Vec<u64>,
    total_weight: u64,
) {
    env.events().publish(
        (symbol_short!("WEIGHTS"),),
        WeightsUpdatedEvent {
            tokens,
            weights,
            total_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_hourly_rate_set(env: &Env, old_rate: i128, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_SET"),),
        HourlyRateSetEvent {
            old_rate,
            new_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_signer_changed(env: &Env, old_signer: Address, new_signer: Address) {
    env.events().publish(
        (symbol_short!("SIGNER"), new_signer.clone()),
        SignerChangedEvent {
            old_signer,
            new_signer,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_withdrawn(env: &Env, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), recipient.clone()),
        RewardsWithdrawnEvent {
            recipient,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
