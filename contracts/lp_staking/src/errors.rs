use common::{ErrorKind, MultisigError};
use soroban_sdk::{contracttype, Env, String};

/// Every failure the staking engine can report.
///
/// Codes are grouped by [`ErrorKind`] range so clients can classify an error
/// from its number alone.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    NotInitialized = 1,
    AlreadyInitialized = 2,

    // ── Validation (10–29) ───────────────────────────────────
    InvalidAmount = 10,
    InvalidToken = 11,
    InvalidName = 12,
    PlatformTooLong = 13,
    WeightOutOfRange = 14,
    LengthMismatch = 15,
    DuplicateToken = 16,
    PairAlreadyRegistered = 17,
    TooManyPairs = 18,
    InvalidSigners = 19,
    InvalidThreshold = 20,
    InvalidConfig = 21,
    InvalidRecipient = 22,
    ArithmeticOverflow = 23,
    RateTooHigh = 24,

    // ── Not found (30–39) ────────────────────────────────────
    PairNotFound = 30,
    ActionNotFound = 31,

    // ── State (40–59) ────────────────────────────────────────
    NotASigner = 40,
    AlreadyASigner = 41,
    AlreadyApproved = 42,
    AlreadyExecuted = 43,
    ActionRejected = 44,
    ActionExpired = 45,
    QuorumNotMet = 46,
    PairInactive = 47,
    ActionNotExpired = 48,

    // ── Insufficient funds (60–69) ───────────────────────────
    InsufficientStake = 60,
    InsufficientBalance = 61,
    InsufficientRewardReserve = 62,

    // ── Dependency (70–79) ───────────────────────────────────
    TransferFailed = 70,
    BalanceUnavailable = 71,
}

/// Structured description of an error code, returned by `describe_error`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorInfo {
    pub code: u32,
    pub kind: ErrorKind,
    pub message: String,
}

impl ContractError {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorKind::Lifecycle
            }
            ContractError::InvalidAmount
            | ContractError::InvalidToken
            | ContractError::InvalidName
            | ContractError::PlatformTooLong
            | ContractError::WeightOutOfRange
            | ContractError::LengthMismatch
            | ContractError::DuplicateToken
            | ContractError::PairAlreadyRegistered
            | ContractError::TooManyPairs
            | ContractError::InvalidSigners
            | ContractError::InvalidThreshold
            | ContractError::InvalidConfig
            | ContractError::InvalidRecipient
            | ContractError::ArithmeticOverflow
            | ContractError::RateTooHigh => ErrorKind::Validation,
            ContractError::PairNotFound | ContractError::ActionNotFound => ErrorKind::NotFound,
            ContractError::NotASigner
            | ContractError::AlreadyASigner
            | ContractError::AlreadyApproved
            | ContractError::AlreadyExecuted
            | ContractError::ActionRejected
            | ContractError::ActionExpired
            | ContractError::QuorumNotMet
            | ContractError::PairInactive
            | ContractError::ActionNotExpired => ErrorKind::State,
            ContractError::InsufficientStake
            | ContractError::InsufficientBalance
            | ContractError::InsufficientRewardReserve => ErrorKind::InsufficientFunds,
            ContractError::TransferFailed | ContractError::BalanceUnavailable => {
                ErrorKind::Dependency
            }
        }
    }

    /// Returns a human-readable error message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::InvalidAmount => "Amount must be positive (rates must be non-negative)",
            ContractError::InvalidToken => "Token address cannot be used as a pool token",
            ContractError::InvalidName => "Pair name must be between 1 and 64 bytes",
            ContractError::PlatformTooLong => "Platform tag exceeds 32 bytes",
            ContractError::WeightOutOfRange => "Weight exceeds the maximum pair weight",
            ContractError::LengthMismatch => "Token and weight lists must be non-empty and equal length",
            ContractError::DuplicateToken => "Token appears more than once in the batch",
            ContractError::PairAlreadyRegistered => "Pair is already registered",
            ContractError::TooManyPairs => "Pair registry is full",
            ContractError::InvalidSigners => "Signer list is empty or contains duplicates",
            ContractError::InvalidThreshold => "Required approvals must be between 1 and the signer count",
            ContractError::InvalidConfig => "Max weight and action TTL must be positive",
            ContractError::InvalidRecipient => "Recipient cannot be the staking contract",
            ContractError::ArithmeticOverflow => "Reward arithmetic overflowed",
            ContractError::RateTooHigh => "Hourly reward rate exceeds the maximum",
            ContractError::PairNotFound => "Pair not found",
            ContractError::ActionNotFound => "Action not found",
            ContractError::NotASigner => "Caller is not an authorized signer",
            ContractError::AlreadyASigner => "Address is already a signer",
            ContractError::AlreadyApproved => "Signer has already approved this action",
            ContractError::AlreadyExecuted => "Action has already been executed",
            ContractError::ActionRejected => "Action has been rejected",
            ContractError::ActionExpired => "Action has expired",
            ContractError::QuorumNotMet => "Action does not have enough approvals",
            ContractError::PairInactive => "Pair is no longer active",
            ContractError::ActionNotExpired => "Action has not reached its expiry",
            ContractError::InsufficientStake => "Unstake amount exceeds staked balance",
            ContractError::InsufficientBalance => "Token balance is below the requested amount",
            ContractError::InsufficientRewardReserve => "Contract reward reserve cannot cover the transfer",
            ContractError::TransferFailed => "Token transfer failed",
            ContractError::BalanceUnavailable => "Token balance query failed",
        }
    }

    /// Maps a raw code back to its variant.
    pub fn from_code(code: u32) -> Option<ContractError> {
        let err = match code {
            1 => ContractError::NotInitialized,
            2 => ContractError::AlreadyInitialized,
            10 => ContractError::InvalidAmount,
            11 => ContractError::InvalidToken,
            12 => ContractError::InvalidName,
            13 => ContractError::PlatformTooLong,
            14 => ContractError::WeightOutOfRange,
            15 => ContractError::LengthMismatch,
            16 => ContractError::DuplicateToken,
            17 => ContractError::PairAlreadyRegistered,
            18 => ContractError::TooManyPairs,
            19 => ContractError::InvalidSigners,
            20 => ContractError::InvalidThreshold,
            21 => ContractError::InvalidConfig,
            22 => ContractError::InvalidRecipient,
            23 => ContractError::ArithmeticOverflow,
            24 => ContractError::RateTooHigh,
            30 => ContractError::PairNotFound,
            31 => ContractError::ActionNotFound,
            40 => ContractError::NotASigner,
            41 => ContractError::AlreadyASigner,
            42 => ContractError::AlreadyApproved,
            43 => ContractError::AlreadyExecuted,
            44 => ContractError::ActionRejected,
            45 => ContractError::ActionExpired,
            46 => ContractError::QuorumNotMet,
            47 => ContractError::PairInactive,
            48 => ContractError::ActionNotExpired,
            60 => ContractError::InsufficientStake,
            61 => ContractError::InsufficientBalance,
            62 => ContractError::InsufficientRewardReserve,
            70 => ContractError::TransferFailed,
            71 => ContractError::BalanceUnavailable,
            _ => return None,
        };
        Some(err)
    }

    pub fn info(&self, env: &Env) -> ErrorInfo {
        ErrorInfo {
            code: *self as u32,
            kind: self.kind(),
            message: String::from_str(env, self.message()),
        }
    }
}

impl From<MultisigError> for ContractError {
    fn from(err: MultisigError) -> Self {
        match err {
            MultisigError::NotConfigured => ContractError::NotInitialized,
            MultisigError::InvalidThreshold => ContractError::InvalidThreshold,
            MultisigError::InvalidSigners => ContractError::InvalidSigners,
            MultisigError::NotASigner => ContractError::NotASigner,
            MultisigError::AlreadyASigner => ContractError::AlreadyASigner,
        }
    }
}
