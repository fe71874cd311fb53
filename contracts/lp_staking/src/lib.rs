#![no_std]

pub mod custody;
pub mod errors;
pub mod events;
pub mod governance;
pub mod ledger;
pub mod registry;
pub mod rewards;
pub mod storage;

use common::multisig;
use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String, Vec};

use custody::TokenLedger;
pub use errors::{ContractError, ErrorInfo};
pub use governance::{
    Action, ActionPayload, ActionStatus, ActionType, SignerChange, Withdrawal, MAX_PAGE_SIZE,
};
pub use ledger::{PoolState, UserStake};
pub use registry::{NewPair, Pair, WeightBatch};

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Bootstrap parameters passed once to `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Token paid out as staking rewards and by `WithdrawRewards` actions.
    pub reward_token: Address,
    pub signers: Vec<Address>,
    pub required_approvals: u32,
    /// Upper bound for any single pair weight.
    pub max_weight: u64,
    /// Reward emitted per hour across all active pools, in reward-token units.
    /// At most `rewards::MAX_HOURLY_RATE`.
    pub hourly_reward_rate: i128,
    /// Seconds after proposal at which an open action expires.
    pub action_ttl: u64,
}

/// Consistent view of the global parameters, tagged with the state version.
///
/// `version` increases with every committed mutation, so a client can tell
/// whether anything changed since its last snapshot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineSnapshot {
    pub version: u64,
    pub hourly_reward_rate: i128,
    pub total_weight: u64,
    pub max_weight: u64,
    pub required_approvals: u32,
    pub action_counter: u64,
    pub signers: Vec<Address>,
    pub pair_count: u32,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct LpStakingContract;

#[contractimpl]
impl LpStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract. Pairs are added afterwards through governance.
    pub fn initialize(env: Env, config: EngineConfig) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        rewards::validate_rate(config.hourly_reward_rate)?;
        if config.max_weight == 0 || config.action_ttl == 0 {
            return Err(ContractError::InvalidConfig);
        }
        if config.reward_token == env.current_contract_address() {
            return Err(ContractError::InvalidToken);
        }
        multisig::configure(&env, config.signers.clone(), config.required_approvals)?;

        env.storage().instance().set(&storage::INITIALIZED, &true);
        env.storage()
            .instance()
            .set(&storage::REWARD_TOKEN, &config.reward_token);
        env.storage()
            .instance()
            .set(&storage::MAX_WEIGHT, &config.max_weight);
        env.storage()
            .instance()
            .set(&storage::ACTION_TTL, &config.action_ttl);
        storage::set_hourly_rate(&env, config.hourly_reward_rate);
        storage::set_total_weight(&env, 0);
        storage::bump_version(&env);

        events::publish_initialized(
            &env,
            config.reward_token,
            config.signers,
            config.required_approvals,
            config.max_weight,
            config.hourly_reward_rate,
            config.action_ttl,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` pair tokens into the pool.
    ///
    /// Accrual is settled first so the new tokens earn only from now on. The
    /// deposit is one transfer authorised by the user; if it fails nothing is
    /// recorded.
    pub fn stake(env: Env, user: Address, pair: Address, amount: i128) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        user.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if !registry::load_pair(&env, &pair)?.active {
            return Err(ContractError::PairInactive);
        }

        let (mut stake, mut pool) = rewards::settle_user(&env, &user, &pair)?;

        TokenLedger::new(&env, &pair).pull(&user, amount)?;

        stake.staked_amount = stake
            .staked_amount
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        ledger::store_stake(&env, &stake);
        ledger::store_pool(&env, &pair, &pool);
        storage::bump_version(&env);

        events::publish_stake_added(
            &env,
            user,
            pair,
            amount,
            stake.staked_amount,
            pool.total_staked,
        );

        Ok(())
    }

    /// Withdraw `amount` pair tokens. Works for inactive pools too.
    pub fn unstake(env: Env, user: Address, pair: Address, amount: i128) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        user.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        registry::load_pair(&env, &pair)?;
        let staked = ledger::find_stake(&env, &user, &pair)
            .map(|s| s.staked_amount)
            .unwrap_or(0);
        if staked < amount {
            return Err(ContractError::InsufficientStake);
        }

        let (mut stake, mut pool) = rewards::settle_user(&env, &user, &pair)?;
        stake.staked_amount -= amount;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        ledger::store_stake(&env, &stake);
        ledger::store_pool(&env, &pair, &pool);

        TokenLedger::new(&env, &pair).push(&user, amount)?;
        storage::bump_version(&env);

        events::publish_stake_removed(
            &env,
            user,
            pair,
            amount,
            stake.staked_amount,
            pool.total_staked,
        );

        Ok(())
    }

    /// Pay out everything `user` has accrued in `pair`. Returns the amount.
    ///
    /// Returns 0 without a transfer when nothing is owed. A failed payout
    /// returns `Err`, and the host rollback leaves the owed balance in place.
    pub fn claim(env: Env, user: Address, pair: Address) -> Result<i128, ContractError> {
        storage::require_initialized(&env)?;
        user.require_auth();

        registry::load_pair(&env, &pair)?;
        if ledger::find_stake(&env, &user, &pair).is_none() {
            return Ok(0);
        }

        let (mut stake, _) = rewards::settle_user(&env, &user, &pair)?;
        let owed = stake.unclaimed_reward;
        if owed <= 0 {
            return Ok(0);
        }

        let rewards_ledger = TokenLedger::new(&env, &storage::reward_token(&env)?);
        if rewards_ledger.custody_balance()? < owed {
            return Err(ContractError::InsufficientRewardReserve);
        }

        stake.unclaimed_reward = 0;
        ledger::store_stake(&env, &stake);

        rewards_ledger.push(&user, owed)?;
        storage::bump_version(&env);

        events::publish_rewards_claimed(&env, user, pair, owed);

        Ok(owed)
    }

    // ── Governance ──────────────────────────────────────────────────────────

    pub fn propose_set_hourly_rate(
        env: Env,
        proposer: Address,
        rate: i128,
    ) -> Result<u64, ContractError> {
        Self::propose(&env, proposer, ActionPayload::SetHourlyRate(rate))
    }

    pub fn propose_update_weights(
        env: Env,
        proposer: Address,
        tokens: Vec<Address>,
        weights: Vec<u64>,
    ) -> Result<u64, ContractError> {
        Self::propose(
            &env,
            proposer,
            ActionPayload::UpdateWeights(WeightBatch { tokens, weights }),
        )
    }

    pub fn propose_add_pair(
        env: Env,
        proposer: Address,
        token: Address,
        name: String,
        platform: String,
        weight: u64,
    ) -> Result<u64, ContractError> {
        Self::propose(
            &env,
            proposer,
            ActionPayload::AddPair(NewPair {
                token,
                name,
                platform,
                weight,
            }),
        )
    }

    pub fn propose_remove_pair(
        env: Env,
        proposer: Address,
        token: Address,
    ) -> Result<u64, ContractError> {
        Self::propose(&env, proposer, ActionPayload::RemovePair(token))
    }

    pub fn propose_change_signer(
        env: Env,
        proposer: Address,
        old_signer: Address,
        new_signer: Address,
    ) -> Result<u64, ContractError> {
        Self::propose(
            &env,
            proposer,
            ActionPayload::ChangeSigner(SignerChange {
                old_signer,
                new_signer,
            }),
        )
    }

    pub fn propose_withdraw(
        env: Env,
        proposer: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<u64, ContractError> {
        Self::propose(
            &env,
            proposer,
            ActionPayload::WithdrawRewards(Withdrawal { recipient, amount }),
        )
    }

    /// Returns the approval count after this approval.
    pub fn approve_action(env: Env, signer: Address, id: u64) -> Result<u32, ContractError> {
        storage::require_initialized(&env)?;
        signer.require_auth();
        let approvals = governance::approve(&env, &signer, id)?;
        storage::bump_version(&env);
        Ok(approvals)
    }

    pub fn execute_action(env: Env, executor: Address, id: u64) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        executor.require_auth();
        governance::execute(&env, &executor, id)?;
        storage::bump_version(&env);
        Ok(())
    }

    pub fn reject_action(env: Env, signer: Address, id: u64) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        signer.require_auth();
        governance::reject(&env, &signer, id)?;
        storage::bump_version(&env);
        Ok(())
    }

    /// Persist the expiry of an action past its TTL.
    pub fn expire_action(env: Env, id: u64) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        governance::expire(&env, id)?;
        storage::bump_version(&env);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn list_pairs(env: Env) -> Vec<Pair> {
        registry::list_pairs(&env)
    }

    pub fn get_pair(env: Env, token: Address) -> Result<Pair, ContractError> {
        registry::load_pair(&env, &token)
    }

    /// Pool aggregates as of the current ledger time.
    pub fn get_pool(env: Env, token: Address) -> Result<PoolState, ContractError> {
        rewards::current_pool(&env, &token)
    }

    /// The stored stake record, as of its last settlement.
    pub fn get_user_stake(env: Env, user: Address, pair: Address) -> Option<UserStake> {
        ledger::find_stake(&env, &user, &pair)
    }

    /// Reward claimable right now, including accrual since the last settlement.
    pub fn get_pending_reward(env: Env, user: Address, pair: Address) -> Result<i128, ContractError> {
        rewards::pending_reward(&env, &user, &pair)
    }

    pub fn get_hourly_reward_rate(env: Env) -> i128 {
        storage::hourly_rate(&env)
    }

    pub fn get_total_weight(env: Env) -> u64 {
        storage::total_weight(&env)
    }

    pub fn get_max_weight(env: Env) -> u64 {
        storage::max_weight(&env)
    }

    pub fn get_required_approvals(env: Env) -> u32 {
        multisig::get_config(&env).map(|c| c.threshold).unwrap_or(0)
    }

    pub fn list_signers(env: Env) -> Vec<Address> {
        multisig::get_config(&env)
            .map(|c| c.signers)
            .unwrap_or(Vec::new(&env))
    }

    pub fn get_action_counter(env: Env) -> u64 {
        storage::action_counter(&env)
    }

    pub fn get_action_ttl(env: Env) -> u64 {
        storage::action_ttl(&env)
    }

    pub fn get_action(env: Env, id: u64) -> Result<Action, ContractError> {
        governance::get_action(&env, id)
    }

    /// At most `MAX_PAGE_SIZE` actions with ids from `from_id` upwards.
    pub fn list_actions_page(env: Env, from_id: u64, count: u32) -> Vec<Action> {
        governance::list_page(&env, from_id, count)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        storage::reward_token(&env)
    }

    /// Total value locked: pair tokens held by the contract.
    pub fn get_tvl(env: Env, pair: Address) -> Result<i128, ContractError> {
        registry::load_pair(&env, &pair)?;
        TokenLedger::new(&env, &pair).custody_balance()
    }

    /// Reward tokens held by the contract.
    pub fn get_reward_reserve(env: Env) -> Result<i128, ContractError> {
        TokenLedger::new(&env, &storage::reward_token(&env)?).custody_balance()
    }

    pub fn get_state_version(env: Env) -> u64 {
        storage::state_version(&env)
    }

    pub fn get_snapshot(env: Env) -> Result<EngineSnapshot, ContractError> {
        storage::require_initialized(&env)?;
        let cfg = multisig::load_config(&env)?;
        Ok(EngineSnapshot {
            version: storage::state_version(&env),
            hourly_reward_rate: storage::hourly_rate(&env),
            total_weight: storage::total_weight(&env),
            max_weight: storage::max_weight(&env),
            required_approvals: cfg.threshold,
            action_counter: storage::action_counter(&env),
            signers: cfg.signers,
            pair_count: registry::pair_tokens(&env).len(),
        })
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    /// Kind and message for a raw error code, for clients that only see the number.
    pub fn describe_error(env: Env, code: u32) -> Option<ErrorInfo> {
        ContractError::from_code(code).map(|e| e.info(&env))
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn propose(env: &Env, proposer: Address, payload: ActionPayload) -> Result<u64, ContractError> {
        storage::require_initialized(env)?;
        proposer.require_auth();
        let id = governance::propose(env, &proposer, payload)?;
        storage::bump_version(env);
        Ok(id)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_governance;
