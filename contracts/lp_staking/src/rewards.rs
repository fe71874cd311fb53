//! Reward accrual arithmetic and settlement.
//!
//! Over an interval with constant parameters a pool earns
//!
//! ```text
//! pool_reward = hourly_rate * elapsed * weight / (3600 * total_weight)
//! ```
//!
//! which is spread over its stakers pro rata through a reward-per-share
//! accumulator scaled by [`REWARD_PRECISION`]:
//!
//! ```text
//! reward_per_share += hourly_rate * elapsed * weight * REWARD_PRECISION
//!                     / (3600 * total_weight * total_staked)
//! user_reward       = staked * (reward_per_share - paid) / REWARD_PRECISION
//! ```
//!
//! The increment is one 256-bit division, so `pool_reward` is never rounded
//! on its own and frequent settlement loses at most one accumulator unit per
//! settlement. Every division truncates toward zero and dust stays in the
//! contract.
//!
//! Accrual never fails. A result that does not fit `i128` saturates at
//! `i128::MAX`, so settlement (and with it `unstake` and every governance
//! action) keeps working whatever the accumulator reaches.

use soroban_sdk::{Address, Env, I256};

use crate::errors::ContractError;
use crate::ledger::{self, PoolState, UserStake};
use crate::registry;
use crate::storage;

/// Fixed-point scale of `reward_per_share`.
pub const REWARD_PRECISION: i128 = 1_000_000_000_000_000_000;

pub const SECONDS_PER_HOUR: u64 = 3_600;

/// Largest hourly rate governance may set: 1e9 whole tokens per hour at 18
/// decimals.
pub const MAX_HOURLY_RATE: i128 = 1_000_000_000_000_000_000_000_000_000;

/// Rates must be non-negative and at most [`MAX_HOURLY_RATE`].
pub fn validate_rate(rate: i128) -> Result<(), ContractError> {
    if rate < 0 {
        return Err(ContractError::InvalidAmount);
    }
    if rate > MAX_HOURLY_RATE {
        return Err(ContractError::RateTooHigh);
    }
    Ok(())
}

fn wide(env: &Env, v: i128) -> I256 {
    I256::from_i128(env, v)
}

/// Narrow a non-negative 256-bit value, saturating at `i128::MAX`.
fn saturate(v: I256) -> i128 {
    v.to_i128().unwrap_or(i128::MAX)
}

// ── Pure arithmetic ──────────────────────────────────────────────────────────

/// Accumulator growth of one pool over `elapsed` seconds.
///
/// Returns 0 when there is no weight in the system or nobody is staked.
pub fn share_increment(
    env: &Env,
    hourly_rate: i128,
    elapsed: u64,
    weight: u64,
    total_weight: u64,
    total_staked: i128,
) -> i128 {
    if total_weight == 0 || weight == 0 || elapsed == 0 || hourly_rate <= 0 || total_staked <= 0 {
        return 0;
    }
    let numerator = wide(env, hourly_rate)
        .mul(&wide(env, elapsed as i128))
        .mul(&wide(env, weight as i128))
        .mul(&wide(env, REWARD_PRECISION));
    let denominator = wide(env, SECONDS_PER_HOUR as i128)
        .mul(&wide(env, total_weight as i128))
        .mul(&wide(env, total_staked));
    saturate(numerator.div(&denominator))
}

/// Total owed to a staker: previously settled rewards plus the accumulator
/// growth since their last settlement.
pub fn earned(env: &Env, staked: i128, current_rps: i128, paid_rps: i128, unclaimed: i128) -> i128 {
    let delta = current_rps.saturating_sub(paid_rps);
    if staked <= 0 || delta <= 0 {
        return unclaimed;
    }
    let owed = saturate(
        wide(env, staked)
            .mul(&wide(env, delta))
            .div(&wide(env, REWARD_PRECISION)),
    );
    unclaimed.saturating_add(owed)
}

/// Advance a pool to `now` under the given parameters.
pub fn accrue(
    env: &Env,
    pool: &PoolState,
    weight: u64,
    total_weight: u64,
    hourly_rate: i128,
    now: u64,
) -> PoolState {
    let elapsed = now.saturating_sub(pool.last_update);
    let increment = share_increment(
        env,
        hourly_rate,
        elapsed,
        weight,
        total_weight,
        pool.total_staked,
    );
    PoolState {
        total_staked: pool.total_staked,
        reward_per_share: pool.reward_per_share.saturating_add(increment),
        last_update: now.max(pool.last_update),
    }
}

// ── Settlement ───────────────────────────────────────────────────────────────

/// Pool state as of the current ledger time, without writing it back.
pub fn current_pool(env: &Env, token: &Address) -> Result<PoolState, ContractError> {
    let pair = registry::load_pair(env, token)?;
    let pool = ledger::load_pool(env, token).ok_or(ContractError::PairNotFound)?;
    Ok(accrue(
        env,
        &pool,
        pair.effective_weight(),
        storage::total_weight(env),
        storage::hourly_rate(env),
        env.ledger().timestamp(),
    ))
}

/// Settle a pool's accumulator up to now and persist it.
pub fn settle_pool(env: &Env, token: &Address) -> Result<PoolState, ContractError> {
    let pool = current_pool(env, token)?;
    ledger::store_pool(env, token, &pool);
    Ok(pool)
}

/// Settle every registered pool at the current parameters.
///
/// Must run before any change to the hourly rate, a pair weight, or the
/// total weight so already-elapsed time is priced at the old values.
pub fn settle_all_pools(env: &Env) -> Result<(), ContractError> {
    for token in registry::pair_tokens(env).iter() {
        settle_pool(env, &token)?;
    }
    Ok(())
}

/// Settle the pool and fold the user's accrued reward into their record.
///
/// The updated record is persisted and returned together with the pool.
pub fn settle_user(
    env: &Env,
    user: &Address,
    token: &Address,
) -> Result<(UserStake, PoolState), ContractError> {
    let pool = settle_pool(env, token)?;
    let mut stake = ledger::load_stake(env, user, token, &pool);

    stake.unclaimed_reward = earned(
        env,
        stake.staked_amount,
        pool.reward_per_share,
        stake.reward_per_share_paid,
        stake.unclaimed_reward,
    );
    stake.reward_per_share_paid = pool.reward_per_share;
    stake.last_accrual_time = pool.last_update;

    ledger::store_stake(env, &stake);
    Ok((stake, pool))
}

/// Reward the user could claim right now. Read-only.
pub fn pending_reward(env: &Env, user: &Address, token: &Address) -> Result<i128, ContractError> {
    let pool = current_pool(env, token)?;
    match ledger::find_stake(env, user, token) {
        Some(stake) => Ok(earned(
            env,
            stake.staked_amount,
            pool.reward_per_share,
            stake.reward_per_share_paid,
            stake.unclaimed_reward,
        )),
        None => Ok(0),
    }
}
