//! Multi-signature governance over every privileged mutation.
//!
//! An [`Action`] moves `Proposed → Executed | Rejected | Expired`; the three
//! terminal flags are mutually exclusive and a terminal action accepts no
//! further approve, reject or execute. Payloads are validated with the same
//! rules as the mutation they describe both when proposed and again when
//! executed, since registry or signer state may have moved in between.
//!
//! The proposer is not counted as an approval; they approve explicitly like
//! any other signer.

use common::multisig;
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::custody::TokenLedger;
use crate::errors::ContractError;
use crate::events;
use crate::registry::{self, NewPair, WeightBatch};
use crate::rewards;
use crate::storage;

/// Largest page returned by `list_page`.
pub const MAX_PAGE_SIZE: u32 = 50;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ActionType {
    SetHourlyRate = 0,
    UpdateWeights = 1,
    AddPair = 2,
    RemovePair = 3,
    ChangeSigner = 4,
    WithdrawRewards = 5,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignerChange {
    pub old_signer: Address,
    pub new_signer: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub recipient: Address,
    pub amount: i128,
}

/// What an action does when executed. Each variant carries only its own fields.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ActionPayload {
    SetHourlyRate(i128),
    UpdateWeights(WeightBatch),
    AddPair(NewPair),
    RemovePair(Address),
    ChangeSigner(SignerChange),
    WithdrawRewards(Withdrawal),
}

impl ActionPayload {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionPayload::SetHourlyRate(_) => ActionType::SetHourlyRate,
            ActionPayload::UpdateWeights(_) => ActionType::UpdateWeights,
            ActionPayload::AddPair(_) => ActionType::AddPair,
            ActionPayload::RemovePair(_) => ActionType::RemovePair,
            ActionPayload::ChangeSigner(_) => ActionType::ChangeSigner,
            ActionPayload::WithdrawRewards(_) => ActionType::WithdrawRewards,
        }
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ActionStatus {
    Proposed = 0,
    Executed = 1,
    Rejected = 2,
    Expired = 3,
}

/// A governance proposal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Action {
    pub id: u64,
    pub action_type: ActionType,
    pub payload: ActionPayload,
    pub proposer: Address,
    /// Distinct signers that approved, in approval order.
    pub approved_by: Vec<Address>,
    /// Always `approved_by.len()`.
    pub approvals: u32,
    pub executed: bool,
    pub rejected: bool,
    pub expired: bool,
    pub proposed_time: u64,
}

impl Action {
    pub fn status(&self) -> ActionStatus {
        if self.executed {
            ActionStatus::Executed
        } else if self.rejected {
            ActionStatus::Rejected
        } else if self.expired {
            ActionStatus::Expired
        } else {
            ActionStatus::Proposed
        }
    }

    pub fn has_approved(&self, signer: &Address) -> bool {
        self.approved_by.iter().any(|s| s == *signer)
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

fn load_action(env: &Env, id: u64) -> Result<Action, ContractError> {
    storage::get(env, &storage::action_key(id)).ok_or(ContractError::ActionNotFound)
}

fn store_action(env: &Env, action: &Action) {
    storage::put(env, &storage::action_key(action.id), action);
}

/// An open action whose TTL has run out, whether or not that was persisted.
fn is_time_expired(env: &Env, action: &Action) -> bool {
    !action.executed
        && !action.rejected
        && env.ledger().timestamp() > action.proposed_time.saturating_add(storage::action_ttl(env))
}

/// The action as callers should see it: TTL expiry is reported even before
/// `expire` persists it.
fn view(env: &Env, mut action: Action) -> Action {
    if is_time_expired(env, &action) {
        action.expired = true;
    }
    action
}

fn ensure_open(env: &Env, action: &Action) -> Result<(), ContractError> {
    if action.executed {
        return Err(ContractError::AlreadyExecuted);
    }
    if action.rejected {
        return Err(ContractError::ActionRejected);
    }
    if action.expired || is_time_expired(env, action) {
        return Err(ContractError::ActionExpired);
    }
    Ok(())
}

// ── Reads ────────────────────────────────────────────────────────────────────

pub fn get_action(env: &Env, id: u64) -> Result<Action, ContractError> {
    Ok(view(env, load_action(env, id)?))
}

/// Up to `count` actions starting at `from_id` (ids start at 1).
pub fn list_page(env: &Env, from_id: u64, count: u32) -> Vec<Action> {
    let mut page = Vec::new(env);
    let last = storage::action_counter(env);
    let mut id = from_id.max(1);
    while id <= last && page.len() < count.min(MAX_PAGE_SIZE) {
        if let Ok(action) = get_action(env, id) {
            page.push_back(action);
        }
        id += 1;
    }
    page
}

// ── Validation ───────────────────────────────────────────────────────────────

pub fn validate_payload(env: &Env, payload: &ActionPayload) -> Result<(), ContractError> {
    match payload {
        ActionPayload::SetHourlyRate(rate) => rewards::validate_rate(*rate)?,
        ActionPayload::UpdateWeights(batch) => registry::validate_weight_batch(env, batch)?,
        ActionPayload::AddPair(new_pair) => registry::validate_new_pair(env, new_pair)?,
        ActionPayload::RemovePair(token) => {
            registry::validate_removal(env, token)?;
        }
        ActionPayload::ChangeSigner(change) => {
            let cfg = multisig::load_config(env)?;
            multisig::validate_replacement(&cfg, &change.old_signer, &change.new_signer)?;
        }
        ActionPayload::WithdrawRewards(withdrawal) => {
            if withdrawal.amount <= 0 {
                return Err(ContractError::InvalidAmount);
            }
            if withdrawal.recipient == env.current_contract_address() {
                return Err(ContractError::InvalidRecipient);
            }
        }
    }
    Ok(())
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Record a new action. Invalid payloads never enter the log.
pub fn propose(env: &Env, proposer: &Address, payload: ActionPayload) -> Result<u64, ContractError> {
    multisig::require_signer(env, proposer)?;
    validate_payload(env, &payload)?;

    let id = storage::next_action_id(env);
    let action_type = payload.action_type();
    let action = Action {
        id,
        action_type,
        payload,
        proposer: proposer.clone(),
        approved_by: Vec::new(env),
        approvals: 0,
        executed: false,
        rejected: false,
        expired: false,
        proposed_time: env.ledger().timestamp(),
    };
    store_action(env, &action);

    events::publish_action_proposed(env, id, action_type, proposer.clone());
    Ok(id)
}

/// Add `signer`'s approval. Returns the new approval count.
pub fn approve(env: &Env, signer: &Address, id: u64) -> Result<u32, ContractError> {
    let mut action = load_action(env, id)?;
    ensure_open(env, &action)?;
    if action.has_approved(signer) {
        return Err(ContractError::AlreadyApproved);
    }
    multisig::require_signer(env, signer)?;

    action.approved_by.push_back(signer.clone());
    action.approvals = action.approved_by.len();
    store_action(env, &action);

    events::publish_action_approved(env, id, signer.clone(), action.approvals);
    Ok(action.approvals)
}

/// Permanently block an open action.
pub fn reject(env: &Env, signer: &Address, id: u64) -> Result<(), ContractError> {
    let mut action = load_action(env, id)?;
    ensure_open(env, &action)?;
    multisig::require_signer(env, signer)?;

    action.rejected = true;
    store_action(env, &action);

    events::publish_action_rejected(env, id, signer.clone());
    Ok(())
}

/// Apply an approved action.
///
/// Only approvals from signers that are still in the signer set count
/// towards quorum. The action is marked executed before the payload runs; a
/// failing payload fails the whole invocation, which rolls both back.
pub fn execute(env: &Env, executor: &Address, id: u64) -> Result<Action, ContractError> {
    let mut action = load_action(env, id)?;
    ensure_open(env, &action)?;
    multisig::require_signer(env, executor)?;

    let cfg = multisig::load_config(env)?;
    if !multisig::threshold_met(&cfg, &action.approved_by) {
        return Err(ContractError::QuorumNotMet);
    }

    action.executed = true;
    store_action(env, &action);

    apply(env, &action.payload)?;

    events::publish_action_executed(env, id, action.action_type, executor.clone());
    Ok(action)
}

/// Persist TTL expiry of an open action. Anyone may call this.
pub fn expire(env: &Env, id: u64) -> Result<Action, ContractError> {
    let mut action = load_action(env, id)?;
    if action.executed {
        return Err(ContractError::AlreadyExecuted);
    }
    if action.rejected {
        return Err(ContractError::ActionRejected);
    }
    if action.expired {
        return Err(ContractError::ActionExpired);
    }
    if !is_time_expired(env, &action) {
        return Err(ContractError::ActionNotExpired);
    }

    action.expired = true;
    store_action(env, &action);

    events::publish_action_expired(env, id, action.proposed_time);
    Ok(action)
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

fn apply(env: &Env, payload: &ActionPayload) -> Result<(), ContractError> {
    validate_payload(env, payload)?;

    match payload {
        ActionPayload::SetHourlyRate(rate) => {
            rewards::settle_all_pools(env)?;
            let old_rate = storage::hourly_rate(env);
            storage::set_hourly_rate(env, *rate);
            events::publish_hourly_rate_set(env, old_rate, *rate);
        }
        ActionPayload::UpdateWeights(batch) => {
            let total = registry::update_weights(env, batch)?;
            events::publish_weights_updated(env, batch.tokens.clone(), batch.weights.clone(), total);
        }
        ActionPayload::AddPair(new_pair) => {
            let pair = registry::add_pair(env, new_pair)?;
            events::publish_pair_added(env, pair.token, pair.weight, storage::total_weight(env));
        }
        ActionPayload::RemovePair(token) => {
            let pair = registry::remove_pair(env, token)?;
            events::publish_pair_removed(env, pair.token, pair.weight, storage::total_weight(env));
        }
        ActionPayload::ChangeSigner(change) => {
            multisig::replace_signer(env, &change.old_signer, &change.new_signer)?;
            events::publish_signer_changed(
                env,
                change.old_signer.clone(),
                change.new_signer.clone(),
            );
        }
        ActionPayload::WithdrawRewards(withdrawal) => {
            let ledger = TokenLedger::new(env, &storage::reward_token(env)?);
            if ledger.custody_balance()? < withdrawal.amount {
                return Err(ContractError::InsufficientRewardReserve);
            }
            ledger.push(&withdrawal.recipient, withdrawal.amount)?;
            events::publish_rewards_withdrawn(env, withdrawal.recipient.clone(), withdrawal.amount);
        }
    }
    Ok(())
}
