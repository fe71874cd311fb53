//! Per-pool aggregates and per-(user, pool) stake records.

use soroban_sdk::{contracttype, Address, Env};

use crate::storage;

/// Aggregate accounting for one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Sum of every user's `staked_amount` in this pool.
    pub total_staked: i128,
    /// Cumulative reward per staked unit, scaled by `REWARD_PRECISION`.
    pub reward_per_share: i128,
    /// Ledger timestamp up to which `reward_per_share` is settled.
    pub last_update: u64,
}

/// A user's position in one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserStake {
    pub user: Address,
    pub pair: Address,
    pub staked_amount: i128,
    /// Timestamp of the last settlement into `unclaimed_reward`.
    pub last_accrual_time: u64,
    pub unclaimed_reward: i128,
    /// Pool `reward_per_share` at the last settlement.
    pub reward_per_share_paid: i128,
}

impl PoolState {
    pub fn new(now: u64) -> Self {
        PoolState {
            total_staked: 0,
            reward_per_share: 0,
            last_update: now,
        }
    }
}

pub fn load_pool(env: &Env, token: &Address) -> Option<PoolState> {
    storage::get(env, &storage::pool_key(token))
}

pub fn store_pool(env: &Env, token: &Address, pool: &PoolState) {
    storage::put(env, &storage::pool_key(token), pool);
}

pub fn find_stake(env: &Env, user: &Address, token: &Address) -> Option<UserStake> {
    storage::get(env, &storage::stake_key(user, token))
}

/// Load the user's record, or a zeroed one anchored at the current pool
/// accumulator if the user has never staked here.
pub fn load_stake(env: &Env, user: &Address, token: &Address, pool: &PoolState) -> UserStake {
    find_stake(env, user, token).unwrap_or_else(|| UserStake {
        user: user.clone(),
        pair: token.clone(),
        staked_amount: 0,
        last_accrual_time: env.ledger().timestamp(),
        unclaimed_reward: 0,
        reward_per_share_paid: pool.reward_per_share,
    })
}

pub fn store_stake(env: &Env, stake: &UserStake) {
    storage::put(env, &storage::stake_key(&stake.user, &stake.pair), stake);
}
