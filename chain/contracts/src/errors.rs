//! Contract-specific error types
//!
//! Error taxonomy for address derivation, the account ledger, token movement,
//! habit creation, judgement, and reads. Every precondition violation has its
//! own variant so callers can tell rejections apart.

use thiserror::Error;
use types::ids::{Address, Pubkey};
use types::numeric::AmountError;

/// Program-derived address errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdaError {
    #[error("Too many seeds: {count} (max {max})")]
    MaxSeedsExceeded { count: usize, max: usize },

    #[error("Seed {index} is {len} bytes (max {max})")]
    MaxSeedLengthExceeded { index: usize, len: usize, max: usize },

    #[error("Derived address lies on the ed25519 curve")]
    OnCurve,

    #[error("No viable bump seed found")]
    NoViableBump,
}

/// Account ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account not found: {address}")]
    AccountNotFound { address: Address },

    #[error("Address already in use: {address}")]
    AddressInUse { address: Address },

    #[error("Account {address} is not a {expected}")]
    AccountTypeMismatch {
        address: Address,
        expected: &'static str,
    },
}

/// Token movement errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token account {account} does not hold mint {mint}")]
    MintMismatch { account: Address, mint: Address },

    #[error("Decimals mismatch: mint has {expected}, caller passed {actual}")]
    DecimalsMismatch { expected: u8, actual: u8 },

    #[error("Authority {authority} does not own token account {account}")]
    OwnerMismatch { account: Address, authority: Address },

    #[error("Only the mint authority may mint")]
    MintAuthorityMismatch,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Program signer seeds do not reproduce {expected}")]
    InvalidProgramSigner { expected: Address },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Derivation error: {0}")]
    Pda(#[from] PdaError),
}

/// Habit creation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Amount can not be zero")]
    InvalidAmount,

    #[error("The deadline must be in the future: deadline {deadline}, now {now}")]
    DeadlinePassed { deadline: i64, now: i64 },

    #[error("Description is {len} bytes (max {max})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("A habit already exists at {address}")]
    DuplicateCommitment { address: Address },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Wrong token account: {account}")]
    WrongTokenAccount { account: Address },

    #[error("Payout destination {destination} is the habit's own address")]
    InvalidDestination { destination: Pubkey },

    #[error("Vault {vault} already holds {balance} tokens")]
    VaultNotEmpty { vault: Address, balance: u64 },

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Derivation error: {0}")]
    Pda(#[from] PdaError),
}

/// Judgement errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JudgementError {
    #[error("Habit not found: {address}")]
    NotFound { address: Address },

    #[error("Habit already resolved")]
    AlreadyResolved,

    #[error("Not authorized")]
    Unauthorized,

    #[error("No judgement can be cast before the deadline has passed: deadline {deadline}, now {now}")]
    DeadlineNotReached { deadline: i64, now: i64 },

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Derivation error: {0}")]
    Pda(#[from] PdaError),
}

/// Read-path errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Not found: {address}")]
    NotFound { address: Address },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Derivation error: {0}")]
    Pda(#[from] PdaError),
}

/// Top-level program error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Judgement error: {0}")]
    Judgement(#[from] JudgementError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}
