//! Stored account layouts
//!
//! Everything the ledger holds is one of three account kinds sharing a single
//! address space: habit records, token accounts, and mints.

use serde::{Deserialize, Serialize};
use std::fmt;
use types::ids::{Address, Pubkey};

/// Resolution state of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No judgement recorded yet
    #[default]
    Unresolved,
    /// Judged as kept; funds go to `to_success`
    Success,
    /// Judged as broken; funds go to `to_failure`
    Failure,
}

impl Outcome {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Outcome::Unresolved)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Unresolved => write!(f, "unresolved"),
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

/// A judge's declared result. Cannot express "unresolved".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    Failure,
}

impl From<bool> for Verdict {
    fn from(success: bool) -> Self {
        if success {
            Verdict::Success
        } else {
            Verdict::Failure
        }
    }
}

impl From<Verdict> for Outcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Success => Outcome::Success,
            Verdict::Failure => Outcome::Failure,
        }
    }
}

/// Holds data about a staked habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Bump seed that reproduces this record's address
    pub bump: u8,

    /// Who staked the funds
    pub creator: Pubkey,

    /// What the habit is; part of the address seeds
    pub description: Vec<u8>,

    /// Amount locked in the vault at creation
    pub amount: u64,

    /// Token mint of the staked funds
    pub mint: Address,

    /// Who will be able to judge the result
    pub judge: Pubkey,

    /// Who receives the tokens on success
    pub to_success: Pubkey,

    /// Who receives the tokens on failure
    pub to_failure: Pubkey,

    /// When the judge is first allowed to decide (unix seconds)
    pub deadline: i64,

    /// Outcome as judged by the judge
    pub outcome: Outcome,
}

impl Habit {
    /// Payout target for a verdict.
    pub fn destination_for(&self, verdict: Verdict) -> Pubkey {
        match verdict {
            Verdict::Success => self.to_success,
            Verdict::Failure => self.to_failure,
        }
    }

    /// Description as text, replacing invalid UTF-8.
    pub fn description_lossy(&self) -> String {
        String::from_utf8_lossy(&self.description).into_owned()
    }
}

/// A token mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    pub mint_authority: Pubkey,
    pub decimals: u8,
    pub supply: u64,
}

/// A token balance held for `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Address,
    pub owner: Pubkey,
    pub amount: u64,
}

/// Any stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Account {
    Habit(Habit),
    Token(TokenAccount),
    Mint(Mint),
}

impl Account {
    pub fn kind(&self) -> &'static str {
        match self {
            Account::Habit(_) => "habit",
            Account::Token(_) => "token account",
            Account::Mint(_) => "mint",
        }
    }
}
