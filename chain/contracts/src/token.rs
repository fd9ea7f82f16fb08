//! Token primitives: mints, associated token accounts, checked transfers
//!
//! The minimal token layer the escrow needs:
//! - Mint creation and supply issuance (mint authority only)
//! - Associated token accounts at addresses derived from `(owner, mint)`
//! - `transfer_checked` with mint, decimals, ownership, balance, and overflow
//!   checks
//!
//! Transfers out of an account owned by a program-derived address are
//! authorized by presenting the seeds that reproduce that address, the same
//! way a program signs for accounts it controls.

use tracing::debug;
use types::ids::{Address, Pubkey};

use crate::errors::TokenError;
use crate::ledger::Transaction;
use crate::pda::{associated_token_address, create_program_address};
use crate::state::{Account, Mint, TokenAccount};

/// Who authorizes a debit.
#[derive(Debug, Clone, Copy)]
pub enum Authority<'s> {
    /// A key holder that signed the transaction
    Signer(Pubkey),
    /// A program signing for one of its derived addresses; `seeds` include the bump
    Program {
        program_id: Pubkey,
        seeds: &'s [&'s [u8]],
    },
}

/// Accounts touched by a checked transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferChecked {
    pub from: Address,
    pub to: Address,
    pub mint: Address,
}

/// Token program handle, parameterised by the ids that namespace its accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenProgram {
    pub program_id: Pubkey,
    pub associated_token_program_id: Pubkey,
}

impl TokenProgram {
    pub fn new(program_id: Pubkey, associated_token_program_id: Pubkey) -> Self {
        Self {
            program_id,
            associated_token_program_id,
        }
    }

    /// Derive `owner`'s associated token account address for `mint`.
    pub fn associated_token_address(&self, owner: &Pubkey, mint: &Address) -> Result<Address, TokenError> {
        Ok(associated_token_address(
            owner,
            mint,
            &self.program_id,
            &self.associated_token_program_id,
        )?)
    }

    // ───────────────────────── Mints ─────────────────────────

    /// Create a mint with zero supply at `address`.
    pub fn initialize_mint(
        &self,
        tx: &mut Transaction<'_>,
        address: Address,
        mint_authority: Pubkey,
        decimals: u8,
    ) -> Result<(), TokenError> {
        tx.create(
            address,
            Account::Mint(Mint {
                mint_authority,
                decimals,
                supply: 0,
            }),
        )?;
        debug!(mint = %address, decimals, "Mint initialized");
        Ok(())
    }

    /// Issue new supply into `destination`. Mint authority only.
    pub fn mint_to(
        &self,
        tx: &mut Transaction<'_>,
        mint: &Address,
        destination: &Address,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<(), TokenError> {
        let mint_state = tx.mint(mint)?;
        if mint_state.mint_authority != *authority {
            return Err(TokenError::MintAuthorityMismatch);
        }
        let supply = mint_state
            .supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        let account = tx.token_account(destination)?;
        if account.mint != *mint {
            return Err(TokenError::MintMismatch {
                account: *destination,
                mint: *mint,
            });
        }
        let balance = account.amount.checked_add(amount).ok_or(TokenError::Overflow)?;

        tx.mint_mut(mint)?.supply = supply;
        tx.token_account_mut(destination)?.amount = balance;
        Ok(())
    }

    // ───────────────────────── Token Accounts ─────────────────────────

    /// Create `owner`'s associated token account for `mint`.
    ///
    /// Fails with `AddressInUse` if it already exists.
    pub fn create_associated_token_account(
        &self,
        tx: &mut Transaction<'_>,
        owner: &Pubkey,
        mint: &Address,
    ) -> Result<Address, TokenError> {
        tx.mint(mint)?;
        let address = self.associated_token_address(owner, mint)?;
        tx.create(
            address,
            Account::Token(TokenAccount {
                mint: *mint,
                owner: *owner,
                amount: 0,
            }),
        )?;
        debug!(%owner, %mint, account = %address, "Associated token account created");
        Ok(address)
    }

    /// Like `create_associated_token_account`, but returns the existing
    /// account when one is already in place.
    pub fn create_associated_token_account_idempotent(
        &self,
        tx: &mut Transaction<'_>,
        owner: &Pubkey,
        mint: &Address,
    ) -> Result<Address, TokenError> {
        let address = self.associated_token_address(owner, mint)?;
        if !tx.contains(&address) {
            return self.create_associated_token_account(tx, owner, mint);
        }

        let existing = tx.token_account(&address)?;
        if existing.mint != *mint {
            return Err(TokenError::MintMismatch {
                account: address,
                mint: *mint,
            });
        }
        if existing.owner != *owner {
            return Err(TokenError::OwnerMismatch {
                account: address,
                authority: *owner,
            });
        }
        Ok(address)
    }

    // ───────────────────────── Transfer ─────────────────────────

    /// Move `amount` from `accounts.from` to `accounts.to`.
    ///
    /// Both accounts must hold `accounts.mint`, `decimals` must match the
    /// mint, and `authority` must own the source. Neither balance changes
    /// unless every check passes.
    pub fn transfer_checked(
        &self,
        tx: &mut Transaction<'_>,
        accounts: TransferChecked,
        authority: Authority<'_>,
        amount: u64,
        decimals: u8,
    ) -> Result<(), TokenError> {
        let TransferChecked { from, to, mint } = accounts;

        let expected_decimals = tx.mint(&mint)?.decimals;
        if decimals != expected_decimals {
            return Err(TokenError::DecimalsMismatch {
                expected: expected_decimals,
                actual: decimals,
            });
        }

        let source = tx.token_account(&from)?;
        if source.mint != mint {
            return Err(TokenError::MintMismatch { account: from, mint });
        }
        let (source_owner, available) = (source.owner, source.amount);

        let destination = tx.token_account(&to)?;
        if destination.mint != mint {
            return Err(TokenError::MintMismatch { account: to, mint });
        }
        let destination_balance = destination.amount;

        authorize(&from, &source_owner, authority)?;

        if available < amount {
            return Err(TokenError::InsufficientFunds {
                required: amount,
                available,
            });
        }

        if from == to {
            return Ok(());
        }

        let credited = destination_balance
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        tx.token_account_mut(&from)?.amount = available - amount;
        tx.token_account_mut(&to)?.amount = credited;

        debug!(%from, %to, %mint, amount, "Tokens transferred");
        Ok(())
    }
}

fn authorize(account: &Address, owner: &Pubkey, authority: Authority<'_>) -> Result<(), TokenError> {
    match authority {
        Authority::Signer(signer) if signer == *owner => Ok(()),
        Authority::Signer(signer) => Err(TokenError::OwnerMismatch {
            account: *account,
            authority: signer,
        }),
        Authority::Program { program_id, seeds } => {
            let derived = create_program_address(seeds, &program_id)
                .map_err(|_| TokenError::InvalidProgramSigner { expected: *owner })?;
            if derived != *owner {
                return Err(TokenError::InvalidProgramSigner { expected: *owner });
            }
            Ok(())
        }
    }
}
