//! Storage keys, TTL management and accessors for global parameters.

use soroban_sdk::{symbol_short, Address, Env, IntoVal, Symbol, TryFromVal, Val};

use crate::errors::ContractError;

// ── Instance keys ────────────────────────────────────────────────────────────

pub const INITIALIZED: Symbol = symbol_short!("INIT");
pub const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
pub const HOURLY_RATE: Symbol = symbol_short!("HR_RATE");
pub const TOTAL_WEIGHT: Symbol = symbol_short!("TOT_WGT");
pub const MAX_WEIGHT: Symbol = symbol_short!("MAX_WGT");
pub const ACTION_CTR: Symbol = symbol_short!("ACT_CTR");
pub const ACTION_TTL: Symbol = symbol_short!("ACT_TTL");
pub const PAIR_LIST: Symbol = symbol_short!("PAIRS");
pub const STATE_VERSION: Symbol = symbol_short!("VERSION");

// ── Persistent key prefixes ──────────────────────────────────────────────────

pub const PAIR: Symbol = symbol_short!("PAIR");
pub const POOL: Symbol = symbol_short!("POOL");
pub const USER_STAKE: Symbol = symbol_short!("STK");
pub const ACTION: Symbol = symbol_short!("ACTION");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

pub fn pair_key(token: &Address) -> (Symbol, Address) {
    (PAIR, token.clone())
}

pub fn pool_key(token: &Address) -> (Symbol, Address) {
    (POOL, token.clone())
}

pub fn stake_key(user: &Address, token: &Address) -> (Symbol, Address, Address) {
    (USER_STAKE, user.clone(), token.clone())
}

pub fn action_key(id: u64) -> (Symbol, u64) {
    (ACTION, id)
}

// ── Persistent helpers ───────────────────────────────────────────────────────

/// Write a persistent entry and push its TTL out.
pub fn put<K, V>(env: &Env, key: &K, value: &V)
where
    K: IntoVal<Env, Val>,
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn get<K, V>(env: &Env, key: &K) -> Option<V>
where
    K: IntoVal<Env, Val>,
    V: TryFromVal<Env, Val>,
{
    env.storage().persistent().get(key)
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Global parameters ────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn require_initialized(env: &Env) -> Result<(), ContractError> {
    if !is_initialized(env) {
        return Err(ContractError::NotInitialized);
    }
    Ok(())
}

pub fn reward_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&REWARD_TOKEN)
        .ok_or(ContractError::NotInitialized)
}

pub fn hourly_rate(env: &Env) -> i128 {
    env.storage().instance().get(&HOURLY_RATE).unwrap_or(0)
}

pub fn set_hourly_rate(env: &Env, rate: i128) {
    env.storage().instance().set(&HOURLY_RATE, &rate);
}

pub fn total_weight(env: &Env) -> u64 {
    env.storage().instance().get(&TOTAL_WEIGHT).unwrap_or(0)
}

pub fn set_total_weight(env: &Env, weight: u64) {
    env.storage().instance().set(&TOTAL_WEIGHT, &weight);
}

pub fn max_weight(env: &Env) -> u64 {
    env.storage().instance().get(&MAX_WEIGHT).unwrap_or(0)
}

pub fn action_counter(env: &Env) -> u64 {
    env.storage().instance().get(&ACTION_CTR).unwrap_or(0)
}

pub fn next_action_id(env: &Env) -> u64 {
    let next = action_counter(env).saturating_add(1);
    env.storage().instance().set(&ACTION_CTR, &next);
    next
}

pub fn action_ttl(env: &Env) -> u64 {
    env.storage().instance().get(&ACTION_TTL).unwrap_or(0)
}

pub fn state_version(env: &Env) -> u64 {
    env.storage().instance().get(&STATE_VERSION).unwrap_or(0)
}

/// Advance the snapshot version. Called once per committed mutation.
pub fn bump_version(env: &Env) -> u64 {
    let next = state_version(env).saturating_add(1);
    env.storage().instance().set(&STATE_VERSION, &next);
    extend_instance_ttl(env);
    next
}
