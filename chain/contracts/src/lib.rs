//! Contract logic for habit commitment escrow
//!
//! A creator stakes tokens on a habit, names a judge and two payout
//! destinations, and picks a deadline. Once the deadline passes the judge
//! resolves the habit exactly once, and the whole stake moves to the
//! destination matching the verdict.
//!
//! # Modules
//! - `program`: Entry points (`HabitProgram`) over an injected clock
//! - `registry`: Habit creation and vault funding
//! - `judgement`: One-shot resolution and payout
//! - `security`: Validation and authorization checks
//! - `token`: Mints, associated token accounts, checked transfers
//! - `ledger`: Account store with all-or-nothing transactions
//! - `pda`: Program-derived address derivation
//! - `state`: Account layouts (habit, mint, token account)
//! - `events`: Events emitted by successful operations
//! - `clock`: Time sources
//! - `config`: Deployment configuration
//! - `errors`: Error taxonomy

pub mod clock;
pub mod config;
pub mod errors;
pub mod events;
pub mod judgement;
pub mod ledger;
pub mod pda;
pub mod program;
pub mod registry;
pub mod security;
pub mod state;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ProgramConfig;
pub use program::HabitProgram;
pub use registry::{CreatedHabit, FundingAccounts, NewHabit};
pub use state::{Habit, Outcome, Verdict};

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
