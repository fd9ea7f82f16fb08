//! Contract events
//!
//! Immutable records emitted by successful operations. Failed operations emit
//! nothing. Each event carries the id of the transaction that produced it.

use serde::{Deserialize, Serialize};
use types::ids::{Address, Pubkey, TransactionId};

use crate::state::Outcome;

/// Emitted when a new habit is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCreated {
    /// The habit record address
    pub habit: Address,
    /// User creating the habit
    pub creator: Pubkey,
    /// User that gets to do the judging
    pub judge: Pubkey,
    /// The time at which the judge can do their job
    pub deadline: i64,
    /// Amount locked in the vault
    pub amount: u64,
}

/// Emitted when a habit is judged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitJudged {
    pub habit: Address,
    pub creator: Pubkey,
    pub judge: Pubkey,
    /// The outcome according to the judge
    pub outcome: Outcome,
    /// Who received the vault balance
    pub destination: Pubkey,
    pub amount: u64,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContractEvent {
    HabitCreated(HabitCreated),
    HabitJudged(HabitJudged),
}

/// An event together with the transaction that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub tx_id: TransactionId,
    pub event: ContractEvent,
}
