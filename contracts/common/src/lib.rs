//! Shared building blocks for the LP staking contract suite.
//!
//! This crate provides:
//! - [`ErrorKind`]: the error taxonomy every contract error code maps into.
//! - [`multisig`]: the M-of-N signer set that gates privileged mutations.
//!
//! Contract error enums allocate their codes inside the ranges documented on
//! [`ErrorKind`] so that a client can classify any code without knowing the
//! contract that produced it.

#![no_std]

use soroban_sdk::contracttype;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod multisig;

pub use multisig::*;

// ── Error taxonomy ───────────────────────────────────────────────────────────

/// Coarse classification of a contract error.
///
/// # Code ranges
/// | Range   | Kind                |
/// |---------|---------------------|
/// | 1 – 9   | `Lifecycle`         |
/// | 10 – 29 | `Validation`        |
/// | 30 – 39 | `NotFound`          |
/// | 40 – 59 | `State`             |
/// | 60 – 69 | `InsufficientFunds` |
/// | 70 – 79 | `Dependency`        |
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorKind {
    /// Initialisation ordering problems.
    Lifecycle = 1,
    /// Malformed identifier, out-of-range value or oversized text.
    /// Raised before any state change.
    Validation = 2,
    /// Unknown pair or action.
    NotFound = 3,
    /// The operation conflicts with the current state (double approval,
    /// terminal action, quorum not met, inactive pool, non-signer caller).
    State = 4,
    /// Stake, balance or reward reserve is too small for the request.
    InsufficientFunds = 5,
    /// A call into the token ledger failed.
    Dependency = 6,
}

impl ErrorKind {
    /// Classify a raw contract error code. Returns `None` for codes outside
    /// every documented range.
    pub fn from_code(code: u32) -> Option<ErrorKind> {
        match code {
            1..=9 => Some(ErrorKind::Lifecycle),
            10..=29 => Some(ErrorKind::Validation),
            30..=39 => Some(ErrorKind::NotFound),
            40..=59 => Some(ErrorKind::State),
            60..=69 => Some(ErrorKind::InsufficientFunds),
            70..=79 => Some(ErrorKind::Dependency),
            _ => None,
        }
    }
}
