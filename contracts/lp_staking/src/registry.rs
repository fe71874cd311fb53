//! Pool metadata, weights, and the `total_weight` invariant.
//!
//! `total_weight` always equals the sum of the weights of active pairs. Every
//! mutation here validates the whole request before its first write, and
//! settles all pools first so elapsed time is priced at the old weights.

use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::errors::ContractError;
use crate::ledger::{self, PoolState};
use crate::rewards;
use crate::storage;

pub const MAX_NAME_LEN: u32 = 64;
pub const MAX_PLATFORM_LEN: u32 = 32;
/// Upper bound on registered pairs; keeps whole-registry settlement bounded.
pub const MAX_PAIRS: u32 = 64;

/// A stakeable pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pair {
    pub token: Address,
    pub name: String,
    pub platform: String,
    pub weight: u64,
    pub active: bool,
}

impl Pair {
    /// Weight this pair contributes to reward distribution.
    pub fn effective_weight(&self) -> u64 {
        if self.active {
            self.weight
        } else {
            0
        }
    }
}

/// Descriptor of a pair to be registered.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewPair {
    pub token: Address,
    pub name: String,
    pub platform: String,
    pub weight: u64,
}

/// A batch of weight assignments, applied all-or-nothing.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeightBatch {
    pub tokens: Vec<Address>,
    pub weights: Vec<u64>,
}

// ── Reads ────────────────────────────────────────────────────────────────────

pub fn find_pair(env: &Env, token: &Address) -> Option<Pair> {
    storage::get(env, &storage::pair_key(token))
}

pub fn load_pair(env: &Env, token: &Address) -> Result<Pair, ContractError> {
    find_pair(env, token).ok_or(ContractError::PairNotFound)
}

fn store_pair(env: &Env, pair: &Pair) {
    storage::put(env, &storage::pair_key(&pair.token), pair);
}

/// Tokens of every registered pair, active or not, in registration order.
pub fn pair_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&storage::PAIR_LIST)
        .unwrap_or(Vec::new(env))
}

pub fn list_pairs(env: &Env) -> Vec<Pair> {
    let mut pairs = Vec::new(env);
    for token in pair_tokens(env).iter() {
        if let Some(pair) = find_pair(env, &token) {
            pairs.push_back(pair);
        }
    }
    pairs
}

/// Sum of active weights, recomputed from the registry.
pub fn active_weight_sum(env: &Env) -> u64 {
    list_pairs(env)
        .iter()
        .fold(0u64, |acc, p| acc.saturating_add(p.effective_weight()))
}

// ── Validation ───────────────────────────────────────────────────────────────

fn check_weight(env: &Env, weight: u64) -> Result<(), ContractError> {
    if weight > storage::max_weight(env) {
        return Err(ContractError::WeightOutOfRange);
    }
    Ok(())
}

pub fn validate_new_pair(env: &Env, new_pair: &NewPair) -> Result<(), ContractError> {
    if new_pair.token == env.current_contract_address()
        || new_pair.token == storage::reward_token(env)?
    {
        return Err(ContractError::InvalidToken);
    }
    if new_pair.name.is_empty() || new_pair.name.len() > MAX_NAME_LEN {
        return Err(ContractError::InvalidName);
    }
    if new_pair.platform.len() > MAX_PLATFORM_LEN {
        return Err(ContractError::PlatformTooLong);
    }
    check_weight(env, new_pair.weight)?;
    if find_pair(env, &new_pair.token).is_some() {
        return Err(ContractError::PairAlreadyRegistered);
    }
    if pair_tokens(env).len() >= MAX_PAIRS {
        return Err(ContractError::TooManyPairs);
    }
    Ok(())
}

pub fn validate_removal(env: &Env, token: &Address) -> Result<Pair, ContractError> {
    let pair = load_pair(env, token)?;
    if !pair.active {
        return Err(ContractError::PairInactive);
    }
    Ok(pair)
}

pub fn validate_weight_batch(env: &Env, batch: &WeightBatch) -> Result<(), ContractError> {
    if batch.tokens.is_empty() || batch.tokens.len() != batch.weights.len() {
        return Err(ContractError::LengthMismatch);
    }
    for i in 0..batch.tokens.len() {
        let token = batch.tokens.get_unchecked(i);
        for j in (i + 1)..batch.tokens.len() {
            if batch.tokens.get_unchecked(j) == token {
                return Err(ContractError::DuplicateToken);
            }
        }
        check_weight(env, batch.weights.get_unchecked(i))?;
        if !load_pair(env, &token)?.active {
            return Err(ContractError::PairInactive);
        }
    }
    Ok(())
}

// ── Mutations ────────────────────────────────────────────────────────────────

pub fn add_pair(env: &Env, new_pair: &NewPair) -> Result<Pair, ContractError> {
    validate_new_pair(env, new_pair)?;
    rewards::settle_all_pools(env)?;

    let pair = Pair {
        token: new_pair.token.clone(),
        name: new_pair.name.clone(),
        platform: new_pair.platform.clone(),
        weight: new_pair.weight,
        active: true,
    };
    store_pair(env, &pair);
    ledger::store_pool(env, &pair.token, &PoolState::new(env.ledger().timestamp()));

    let mut tokens = pair_tokens(env);
    tokens.push_back(pair.token.clone());
    env.storage().instance().set(&storage::PAIR_LIST, &tokens);

    let total = storage::total_weight(env)
        .checked_add(pair.weight)
        .ok_or(ContractError::ArithmeticOverflow)?;
    storage::set_total_weight(env, total);
    Ok(pair)
}

/// Deactivate a pair. Its stakers keep what they accrued up to now and may
/// still unstake and claim; the pool earns nothing further.
pub fn remove_pair(env: &Env, token: &Address) -> Result<Pair, ContractError> {
    let mut pair = validate_removal(env, token)?;
    rewards::settle_all_pools(env)?;

    pair.active = false;
    store_pair(env, &pair);
    storage::set_total_weight(
        env,
        storage::total_weight(env).saturating_sub(pair.weight),
    );
    Ok(pair)
}

pub fn update_weights(env: &Env, batch: &WeightBatch) -> Result<u64, ContractError> {
    validate_weight_batch(env, batch)?;
    rewards::settle_all_pools(env)?;

    for (token, weight) in batch.tokens.iter().zip(batch.weights.iter()) {
        let mut pair = load_pair(env, &token)?;
        pair.weight = weight;
        store_pair(env, &pair);
    }
    let total = active_weight_sum(env);
    storage::set_total_weight(env, total);
    Ok(total)
}
