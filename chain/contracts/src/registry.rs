//! Habit registry: creation of habit records and their funded vaults
//!
//! A habit lives at the address derived from `("habit", creator, description)`
//! under the program id. Creation validates the request, claims that address,
//! opens the vault (the habit's associated token account), and moves the
//! stake out of the creator's funding account. All of this runs inside one
//! ledger transaction, so either everything lands or nothing does.

use tracing::{info, warn};
use types::ids::{Address, Pubkey};

use crate::config::ProgramConfig;
use crate::errors::RegistryError;
use crate::ledger::Transaction;
use crate::pda::find_habit_address;
use crate::security::{ensure_description_len, ensure_future_deadline, ensure_positive_amount};
use crate::state::{Account, Habit, Outcome};
use crate::token::{Authority, TransferChecked};

/// Caller-chosen terms of a new habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub description: Vec<u8>,
    pub amount: u64,
    pub judge: Pubkey,
    pub to_success: Pubkey,
    pub to_failure: Pubkey,
    /// Unix seconds; must be in the future
    pub deadline: i64,
}

/// Accounts the creator funds the habit from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingAccounts {
    /// Token account owned by the creator
    pub token_source: Address,
    /// Mint of the staked tokens
    pub mint: Address,
}

/// A freshly created habit and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedHabit {
    pub address: Address,
    pub vault: Address,
    pub habit: Habit,
}

/// Create a habit record and lock `params.amount` in its vault.
pub fn new_habit(
    tx: &mut Transaction<'_>,
    config: &ProgramConfig,
    creator: Pubkey,
    funding: FundingAccounts,
    params: NewHabit,
    now: i64,
) -> Result<CreatedHabit, RegistryError> {
    ensure_positive_amount(params.amount)?;
    ensure_future_deadline(params.deadline, now)?;
    ensure_description_len(&params.description, config.max_description_len)?;

    let (address, bump) = find_habit_address(&config.program_id, &creator, &params.description)?;
    if tx.contains(&address) {
        warn!(%creator, %address, "Habit already exists");
        return Err(RegistryError::DuplicateCommitment { address });
    }
    for destination in [params.to_success, params.to_failure] {
        if destination == address {
            return Err(RegistryError::InvalidDestination { destination });
        }
    }

    let FundingAccounts { token_source, mint } = funding;
    let decimals = tx.mint(&mint)?.decimals;

    let source = tx.token_account(&token_source)?;
    if source.owner != creator || source.mint != mint {
        return Err(RegistryError::WrongTokenAccount {
            account: token_source,
        });
    }
    if source.amount < params.amount {
        return Err(RegistryError::InsufficientFunds {
            required: params.amount,
            available: source.amount,
        });
    }

    // The vault may already have been opened by anyone; it must still be empty.
    let token_program = config.token_program();
    let vault = token_program.create_associated_token_account_idempotent(tx, &address, &mint)?;
    let balance = tx.token_account(&vault)?.amount;
    if balance != 0 {
        warn!(%creator, habit = %address, %vault, balance, "Vault already funded");
        return Err(RegistryError::VaultNotEmpty { vault, balance });
    }

    let habit = Habit {
        bump,
        creator,
        description: params.description,
        amount: params.amount,
        mint,
        judge: params.judge,
        to_success: params.to_success,
        to_failure: params.to_failure,
        deadline: params.deadline,
        outcome: Outcome::Unresolved,
    };
    tx.create(address, Account::Habit(habit.clone()))?;

    token_program.transfer_checked(
        tx,
        TransferChecked {
            from: token_source,
            to: vault,
            mint,
        },
        Authority::Signer(creator),
        habit.amount,
        decimals,
    )?;

    info!(
        %creator,
        habit = %address,
        description = %habit.description_lossy(),
        judge = %habit.judge,
        deadline = habit.deadline,
        amount = habit.amount,
        "Habit created"
    );

    Ok(CreatedHabit {
        address,
        vault,
        habit,
    })
}
