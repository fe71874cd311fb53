//! Adapter over the external token ledger.
//!
//! Token calls go through the generated `try_*` client methods so a failing
//! or misbehaving token surfaces as a [`ContractError`] instead of trapping.

use soroban_sdk::{token, Address, Env};

use crate::errors::ContractError;

/// The operations the engine needs from a fungible-token ledger.
pub trait ExternalLedger {
    fn balance_of(&self, holder: &Address) -> Result<i128, ContractError>;

    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), ContractError>;
}

/// [`ExternalLedger`] backed by a Soroban token contract.
pub struct TokenLedger<'a> {
    env: &'a Env,
    client: token::Client<'a>,
}

impl<'a> TokenLedger<'a> {
    pub fn new(env: &'a Env, token: &Address) -> Self {
        TokenLedger {
            env,
            client: token::Client::new(env, token),
        }
    }

    /// Balance held by this contract.
    pub fn custody_balance(&self) -> Result<i128, ContractError> {
        self.balance_of(&self.env.current_contract_address())
    }

    /// Move `amount` from `from` into custody after checking `from` can cover it.
    pub fn pull(&self, from: &Address, amount: i128) -> Result<(), ContractError> {
        if self.balance_of(from)? < amount {
            return Err(ContractError::InsufficientBalance);
        }
        self.transfer(from, &self.env.current_contract_address(), amount)
    }

    /// Pay `amount` out of custody to `to`.
    pub fn push(&self, to: &Address, amount: i128) -> Result<(), ContractError> {
        self.transfer(&self.env.current_contract_address(), to, amount)
    }
}

impl ExternalLedger for TokenLedger<'_> {
    fn balance_of(&self, holder: &Address) -> Result<i128, ContractError> {
        match self.client.try_balance(holder) {
            Ok(Ok(balance)) => Ok(balance),
            _ => Err(ContractError::BalanceUnavailable),
        }
    }

    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
        match self.client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}
