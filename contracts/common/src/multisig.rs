//! M-of-N signer set for Soroban contracts.
//!
//! Stores the authorised signers and the number of distinct approvals a
//! governance action needs before it may execute. The signer list is kept
//! duplicate-free and `1 <= threshold <= signers.len()` holds after every
//! successful mutation.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const MSIG_CFG: Symbol = symbol_short!("MSIG_CFG");

// ── Types ────────────────────────────────────────────────────────────────────

/// Multisig configuration: M-of-N threshold and the set of signers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MultisigConfig {
    /// Minimum number of distinct approvals required.
    pub threshold: u32,
    /// The set of authorised signers, in insertion order.
    pub signers: Vec<Address>,
}

/// Errors specific to signer-set operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MultisigError {
    /// No configuration has been stored yet.
    NotConfigured,
    /// Threshold must be > 0 and ≤ number of signers.
    InvalidThreshold,
    /// The signer list is empty or contains the same address twice.
    InvalidSigners,
    /// The address is not one of the configured signers.
    NotASigner,
    /// The address is already a configured signer.
    AlreadyASigner,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Store the multisig configuration.
///
/// # Errors
/// - `InvalidSigners` if `signers` is empty or has duplicates.
/// - `InvalidThreshold` if `threshold` is zero or exceeds the signer count.
pub fn configure(env: &Env, signers: Vec<Address>, threshold: u32) -> Result<(), MultisigError> {
    if signers.is_empty() || has_duplicates(&signers) {
        return Err(MultisigError::InvalidSigners);
    }
    if threshold == 0 || threshold > signers.len() {
        return Err(MultisigError::InvalidThreshold);
    }
    let cfg = MultisigConfig { threshold, signers };
    env.storage().instance().set(&MSIG_CFG, &cfg);
    Ok(())
}

/// Return the current multisig configuration, if any.
pub fn get_config(env: &Env) -> Option<MultisigConfig> {
    env.storage().instance().get(&MSIG_CFG)
}

/// Load the configuration or fail with `NotConfigured`.
pub fn load_config(env: &Env) -> Result<MultisigConfig, MultisigError> {
    get_config(env).ok_or(MultisigError::NotConfigured)
}

/// Returns `true` if `addr` is in the signer set.
pub fn is_signer(cfg: &MultisigConfig, addr: &Address) -> bool {
    cfg.signers.iter().any(|s| s == *addr)
}

/// Fail with `NotASigner` unless `addr` is a current signer.
pub fn require_signer(env: &Env, addr: &Address) -> Result<(), MultisigError> {
    let cfg = load_config(env)?;
    if !is_signer(&cfg, addr) {
        return Err(MultisigError::NotASigner);
    }
    Ok(())
}

/// Check that `old` can be swapped for `new` without mutating anything.
pub fn validate_replacement(
    cfg: &MultisigConfig,
    old: &Address,
    new: &Address,
) -> Result<(), MultisigError> {
    if !is_signer(cfg, old) {
        return Err(MultisigError::NotASigner);
    }
    if is_signer(cfg, new) {
        return Err(MultisigError::AlreadyASigner);
    }
    Ok(())
}

/// Atomically replace `old` with `new`, keeping its position in the list.
///
/// The signer count is unchanged, so the threshold stays valid.
pub fn replace_signer(env: &Env, old: &Address, new: &Address) -> Result<(), MultisigError> {
    let mut cfg = load_config(env)?;
    validate_replacement(&cfg, old, new)?;

    let mut signers = Vec::new(env);
    for s in cfg.signers.iter() {
        if s == *old {
            signers.push_back(new.clone());
        } else {
            signers.push_back(s);
        }
    }
    cfg.signers = signers;
    env.storage().instance().set(&MSIG_CFG, &cfg);
    Ok(())
}

/// Number of addresses in `approvals` that are still current signers.
pub fn count_current_approvals(cfg: &MultisigConfig, approvals: &Vec<Address>) -> u32 {
    approvals.iter().filter(|a| is_signer(cfg, a)).count() as u32
}

/// Returns `true` when `approvals` contains at least `threshold` current signers.
pub fn threshold_met(cfg: &MultisigConfig, approvals: &Vec<Address>) -> bool {
    count_current_approvals(cfg, approvals) >= cfg.threshold
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn has_duplicates(signers: &Vec<Address>) -> bool {
    for i in 0..signers.len() {
        for j in (i + 1)..signers.len() {
            if signers.get(i) == signers.get(j) {
                return true;
            }
        }
    }
    false
}
