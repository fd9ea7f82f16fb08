//! Judgement engine: resolves a habit exactly once and settles its vault
//!
//! Preconditions are checked in a fixed order (already resolved, caller is the
//! judge, deadline reached), then the whole vault balance moves to the payout
//! destination chosen by the verdict and the outcome is recorded. The
//! check-then-set on `outcome` happens inside one ledger transaction, so of
//! any number of attempts against the same habit at most one observes
//! `Unresolved`; every later attempt gets `AlreadyResolved` and moves nothing.

use tracing::{info, warn};
use types::ids::{Address, Pubkey};

use crate::config::ProgramConfig;
use crate::errors::{JudgementError, LedgerError};
use crate::ledger::Transaction;
use crate::pda::HABIT_SEED;
use crate::security::ensure_judgeable;
use crate::state::{Habit, Outcome, Verdict};
use crate::token::{Authority, TransferChecked};

/// Result of a successful judgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// The habit after resolution
    pub habit: Habit,
    /// Identity that received the funds
    pub destination: Pubkey,
    /// Token account credited
    pub destination_account: Address,
    /// Amount moved out of the vault
    pub amount: u64,
}

/// Record `verdict` on the habit at `address` and pay out its vault.
pub fn cast_judgement(
    tx: &mut Transaction<'_>,
    config: &ProgramConfig,
    caller: Pubkey,
    address: Address,
    verdict: Verdict,
    now: i64,
) -> Result<Settlement, JudgementError> {
    let habit = match tx.habit(&address) {
        Ok(habit) => habit.clone(),
        Err(LedgerError::AccountNotFound { .. }) => {
            return Err(JudgementError::NotFound { address })
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = ensure_judgeable(&habit, &caller, now) {
        warn!(habit = %address, %caller, error = %e, "Judgement rejected");
        return Err(e);
    }

    let token_program = config.token_program();
    let vault = token_program.associated_token_address(&address, &habit.mint)?;
    let amount = tx.token_account(&vault)?.amount;
    let decimals = tx.mint(&habit.mint)?.decimals;

    let destination = habit.destination_for(verdict);
    let destination_account =
        token_program.create_associated_token_account_idempotent(tx, &destination, &habit.mint)?;

    let bump = [habit.bump];
    let seeds: [&[u8]; 4] = [
        HABIT_SEED,
        habit.creator.as_ref(),
        &habit.description,
        &bump,
    ];
    token_program.transfer_checked(
        tx,
        TransferChecked {
            from: vault,
            to: destination_account,
            mint: habit.mint,
        },
        Authority::Program {
            program_id: config.program_id,
            seeds: &seeds,
        },
        amount,
        decimals,
    )?;

    let record = tx.habit_mut(&address)?;
    record.outcome = Outcome::from(verdict);
    let habit = record.clone();

    info!(
        habit = %address,
        judge = %caller,
        outcome = %habit.outcome,
        %destination,
        amount,
        "Habit judged"
    );

    Ok(Settlement {
        habit,
        destination,
        destination_account,
        amount,
    })
}
